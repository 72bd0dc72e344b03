//! The interactive shell.
//!
//! A line-oriented read/evaluate/print loop over a persistent interpreter.
//! A line ending with `:` enters multi-line mode with a continuation prompt;
//! a line containing only `end` executes the buffered text as one unit.
//! Errors are printed classified and never terminate the session.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use jusu_interp::Interpreter;
use jusu_runtime::stdout_sink;

const BANNER_WIDTH: usize = 50;

/// Runs the shell until `exit` or end of input.
pub fn start() -> ExitCode {
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!("Jusu++ Interactive Shell v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' to quit, 'help' for help");
    println!("{}", "=".repeat(BANNER_WIDTH));

    let mut interpreter = Interpreter::new(stdout_sink());
    let mut buffer = String::new();
    let mut in_multiline = false;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let prompt = if in_multiline { "... " } else { "jusu> " };
        print!("{}", prompt);
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(_)) | None => {
                println!("\nGoodbye!");
                return ExitCode::SUCCESS;
            }
        };

        if in_multiline {
            if line.trim() == "end" {
                in_multiline = false;
                process_code(&buffer, &mut interpreter);
                buffer.clear();
            } else {
                buffer.push_str(&line);
                buffer.push('\n');
            }
            continue;
        }

        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "exit" | "quit" | "q" => {
                println!("Goodbye!");
                return ExitCode::SUCCESS;
            }
            "help" | "?" => {
                show_help();
                continue;
            }
            "clear" => {
                clear_screen();
                continue;
            }
            "vars" => {
                show_variables(&interpreter);
                continue;
            }
            "" => continue,
            _ => {}
        }

        if trimmed.ends_with(':') {
            in_multiline = true;
            buffer.push_str(trimmed);
            buffer.push('\n');
            continue;
        }

        process_code(trimmed, &mut interpreter);
    }
}

/// Parses and executes one buffered unit, printing classified errors.
fn process_code(code: &str, interpreter: &mut Interpreter) {
    let mut source = code.to_string();
    if !source.ends_with('\n') {
        source.push('\n');
    }

    let result =
        jusu_par::parse_source(&source).and_then(|program| interpreter.interpret(&program));
    if let Err(e) = result {
        println!("{}: {}", e.classification(), e);
    }
}

fn show_help() {
    println!(
        r#"
Jusu++ Shell Commands:
  exit, quit, q    Exit the shell
  help, ?          Show this help
  clear            Clear screen
  vars             Show all variables

Jusu++ Examples:
  name is "Alice"           # Create variable
  age = 25                  # Create variable with =
  say "Hello " + name       # Print with concatenation
  x = 10 + 5 * 2            # Math operations

Multi-line Mode:
  End a line with ':' (if, function) to keep typing the body.
  Type 'end' on its own line to run the buffered code.
"#
    );
}

fn clear_screen() {
    // ANSI: clear screen, cursor home.
    print!("\x1b[2J\x1b[H");
    let _ = io::stdout().flush();
}

fn show_variables(interpreter: &Interpreter) {
    let variables = interpreter.variables();
    if variables.is_empty() {
        println!("No variables defined");
        return;
    }
    println!("Variables:");
    for (name, value) in variables {
        println!("  {} = {}", name, value.repr());
    }
}
