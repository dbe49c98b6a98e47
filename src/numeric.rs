use std::cmp::Ordering;
use std::fmt;

use crate::error::LispError;

// ============================================================================
// Numeric Type System
// ============================================================================

/// The interpreter's numeric tower: exact integers and inexact floats.
///
/// Any operation mixing the two variants promotes to `Float`; integer-only
/// operations stay exact. There are no shadow fields — the variant alone
/// says which representation is authoritative.
#[derive(Debug, Clone, Copy)]
pub enum NumericType {
    Int(i64),
    Float(f64),
}

impl NumericType {
    pub fn is_integer(&self) -> bool {
        matches!(self, NumericType::Int(_))
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            NumericType::Int(n) => *n as f64,
            NumericType::Float(f) => *f,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            NumericType::Int(n) => *n == 0,
            NumericType::Float(f) => *f == 0.0,
        }
    }

    pub fn add(&self, rhs: &NumericType) -> NumericType {
        match (self, rhs) {
            (NumericType::Int(a), NumericType::Int(b)) => NumericType::Int(a.wrapping_add(*b)),
            _ => NumericType::Float(self.as_f64() + rhs.as_f64()),
        }
    }

    pub fn sub(&self, rhs: &NumericType) -> NumericType {
        match (self, rhs) {
            (NumericType::Int(a), NumericType::Int(b)) => NumericType::Int(a.wrapping_sub(*b)),
            _ => NumericType::Float(self.as_f64() - rhs.as_f64()),
        }
    }

    pub fn mul(&self, rhs: &NumericType) -> NumericType {
        match (self, rhs) {
            (NumericType::Int(a), NumericType::Int(b)) => NumericType::Int(a.wrapping_mul(*b)),
            _ => NumericType::Float(self.as_f64() * rhs.as_f64()),
        }
    }

    /// Division. Integer operands divide exactly (truncating, wrapping on
    /// the `i64::MIN / -1` overflow like the other integer ops); mixing in
    /// a float promotes. A zero divisor is an error rather than NaN/Inf.
    pub fn div(&self, rhs: &NumericType) -> Result<NumericType, LispError> {
        if rhs.is_zero() {
            return Err(LispError::DivideByZero);
        }
        match (self, rhs) {
            (NumericType::Int(a), NumericType::Int(b)) => {
                Ok(NumericType::Int(a.wrapping_div(*b)))
            }
            _ => Ok(NumericType::Float(self.as_f64() / rhs.as_f64())),
        }
    }

    pub fn rem(&self, rhs: &NumericType) -> Result<NumericType, LispError> {
        if rhs.is_zero() {
            return Err(LispError::DivideByZero);
        }
        match (self, rhs) {
            (NumericType::Int(a), NumericType::Int(b)) => {
                Ok(NumericType::Int(a.wrapping_rem(*b)))
            }
            _ => Ok(NumericType::Float(self.as_f64() % rhs.as_f64())),
        }
    }
}

// ============================================================================
// Equality and Comparison
// ============================================================================

impl PartialEq for NumericType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NumericType::Int(a), NumericType::Int(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl PartialOrd for NumericType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (NumericType::Int(a), NumericType::Int(b)) => a.partial_cmp(b),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NumericType::Int(n) => write!(f, "{n}"),
            NumericType::Float(x) => {
                if x.is_nan() {
                    write!(f, "NaN")
                } else if x.is_infinite() {
                    write!(f, "{}", if *x > 0.0 { "+Inf" } else { "-Inf" })
                } else {
                    write!(f, "{x}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_arithmetic_stays_exact() {
        let a = NumericType::Int(7);
        let b = NumericType::Int(2);
        assert_eq!(a.add(&b), NumericType::Int(9));
        assert_eq!(a.sub(&b), NumericType::Int(5));
        assert_eq!(a.mul(&b), NumericType::Int(14));
        assert_eq!(a.div(&b).unwrap(), NumericType::Int(3));
        assert_eq!(a.rem(&b).unwrap(), NumericType::Int(1));
    }

    #[test]
    fn mixed_arithmetic_promotes_to_float() {
        let a = NumericType::Int(1);
        let b = NumericType::Float(2.5);
        assert_eq!(a.add(&b), NumericType::Float(3.5));
        assert!(!a.add(&b).is_integer());
    }

    #[test]
    fn zero_divisor_is_an_error() {
        let a = NumericType::Int(4);
        assert!(matches!(
            a.div(&NumericType::Int(0)),
            Err(LispError::DivideByZero)
        ));
        assert!(matches!(
            a.rem(&NumericType::Float(0.0)),
            Err(LispError::DivideByZero)
        ));
    }

    #[test]
    fn min_by_negative_one_wraps_instead_of_panicking() {
        let min = NumericType::Int(i64::MIN);
        let neg_one = NumericType::Int(-1);
        assert_eq!(min.div(&neg_one).unwrap(), NumericType::Int(i64::MIN));
        assert_eq!(min.rem(&neg_one).unwrap(), NumericType::Int(0));
    }

    #[test]
    fn cross_variant_comparison() {
        assert_eq!(NumericType::Int(2), NumericType::Float(2.0));
        assert!(NumericType::Int(1) < NumericType::Float(1.5));
    }
}
