use std::fs;
use std::process::ExitCode;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use skim::{Runtime, Value};

fn run_file(path: &str, rt: &mut Runtime) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    let (_, failures) = rt.run_source(&source);
    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn repl(rt: &mut Runtime) -> ExitCode {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("readline: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("skim. Ctrl-D to quit.");
    loop {
        match rl.readline("skim> ") {
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                return ExitCode::SUCCESS;
            }
            Err(e) => {
                eprintln!("readline: {e}");
                return ExitCode::FAILURE;
            }
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);
                match rt.run_source(&line) {
                    (Some(Value::Void), _) | (None, _) => {}
                    (Some(result), _) => println!("{result}"),
                }
            }
        }
    }
}

fn main() -> ExitCode {
    let mut rt = Runtime::new();
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first() {
        Some(path) => run_file(path, &mut rt),
        None => repl(&mut rt),
    }
}
