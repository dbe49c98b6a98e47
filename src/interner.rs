use once_cell::sync::Lazy;
use std::fmt;
use std::sync::RwLock;
use string_interner::{DefaultBackend, DefaultSymbol, StringInterner};

static INTERNER: Lazy<RwLock<StringInterner<DefaultBackend>>> =
    Lazy::new(|| RwLock::new(StringInterner::default()));

/// A symbol that has been interned in the global string interner.
///
/// Identifier names, operator literals, and environment keys are all
/// `InternedSymbol`s, so comparing and hashing them is integer work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InternedSymbol(DefaultSymbol);

impl InternedSymbol {
    /// Intern a string and return its handle.
    pub fn new(s: &str) -> Self {
        let mut interner = INTERNER.write().unwrap();
        InternedSymbol(interner.get_or_intern(s))
    }

    /// Resolve the handle back to an owned string.
    pub fn resolve(&self) -> String {
        self.with_str(str::to_string)
    }

    /// Resolve the handle and run a function with the string slice,
    /// avoiding the allocation `resolve` makes.
    pub fn with_str<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        let interner = INTERNER.read().unwrap();
        let s = interner
            .resolve(self.0)
            .expect("interned symbol should always resolve");
        f(s)
    }
}

impl fmt::Display for InternedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| write!(f, "{s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_string_interns_to_same_symbol() {
        assert_eq!(InternedSymbol::new("foo"), InternedSymbol::new("foo"));
    }

    #[test]
    fn different_strings_intern_to_different_symbols() {
        assert_ne!(InternedSymbol::new("foo"), InternedSymbol::new("bar"));
    }

    #[test]
    fn resolve_round_trips() {
        assert_eq!(InternedSymbol::new("modulo").resolve(), "modulo");
    }
}
