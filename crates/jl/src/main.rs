use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use jl::{eval, Interpreter, Value};

#[derive(Parser)]
#[command(name = "jli", about = "JL: a small embeddable s-expression language", version)]
struct Cli {
    /// Script file to execute
    file: Option<String>,

    /// Evaluate an expression and print the result
    #[arg(short, long)]
    eval: Option<String>,

    /// Suppress the REPL banner
    #[arg(short, long)]
    quiet: bool,

    /// Enter the REPL after running a file or --eval
    #[arg(short, long)]
    interactive: bool,
}

fn main() {
    let cli = Cli::parse();

    let interpreter = Interpreter::new();
    register_print(&interpreter);

    if let Some(expr) = &cli.eval {
        match interpreter.eval_str(expr) {
            Ok(value) => println!("{value}"),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        if cli.interactive {
            repl(interpreter, cli.quiet);
        }
        return;
    }

    if let Some(file) = &cli.file {
        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("error reading {file}: {e}");
                std::process::exit(1);
            }
        };
        if let Err(e) = interpreter.eval_str(&source) {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
        if cli.interactive {
            repl(interpreter, cli.quiet);
        }
        return;
    }

    repl(interpreter, cli.quiet);
}

/// `print` is a host operation rather than a built-in: it belongs to the
/// front-end that owns stdout. Strings print raw; everything else prints
/// in reader form.
fn register_print(interpreter: &Interpreter) {
    interpreter.define_special("print", |ctx, form| {
        for expr in &form[1..] {
            let value = eval(ctx, expr)?;
            match value.as_str() {
                Some(s) => print!("{s}"),
                None => print!("{value}"),
            }
        }
        Ok(Value::Nil)
    });
}

fn repl(interpreter: Interpreter, quiet: bool) {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("error: failed to start line editor: {e}");
            std::process::exit(1);
        }
    };

    if !quiet {
        println!("JL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type ^D to exit\n");
    }

    let mut buffer = String::new();
    let mut in_multiline = false;

    loop {
        let prompt = if in_multiline { "  ... " } else { "jl> " };
        match rl.readline(prompt) {
            Ok(line) => {
                if in_multiline {
                    buffer.push('\n');
                    buffer.push_str(&line);
                } else {
                    buffer = line;
                }

                if !is_balanced(&buffer) {
                    in_multiline = true;
                    continue;
                }
                in_multiline = false;

                let input = std::mem::take(&mut buffer);
                if input.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&input);

                match interpreter.eval_str(&input) {
                    Ok(value) => println!("=> {value}"),
                    Err(e) => {
                        // An error surfaces as nil; the REPL carries on.
                        eprintln!("error: {e}");
                        println!("=> nil");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                in_multiline = false;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("error: {e}");
                break;
            }
        }
    }
}

/// Parens balanced, ignoring strings and comments? Used to decide whether
/// to keep reading continuation lines.
fn is_balanced(src: &str) -> bool {
    let mut depth = 0i32;
    let mut chars = src.chars();
    while let Some(c) = chars.next() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '"' => loop {
                match chars.next() {
                    None | Some('"') => break,
                    Some('\\') => {
                        chars.next();
                    }
                    Some(_) => {}
                }
            },
            ';' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    depth <= 0
}
