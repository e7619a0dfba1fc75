// File: src/main.rs
//
// Main entry point for the Hiss scripting language interpreter.
// Handles command-line argument parsing and dispatches to the appropriate
// subcommand (run or repl).

use clap::{Parser as ClapParser, Subcommand};
use hiss::{ast, interpreter::Interpreter, parser, repl::Repl};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser)]
#[command(
    name = "hiss",
    about = "Hiss: a small Python-flavored scripting language",
    version = env!("CARGO_PKG_VERSION"),
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[command(arg_required_else_help = true)]
enum Commands {
    /// Run a Hiss script file
    Run {
        /// Path to the .hiss file
        file: PathBuf,

        /// Print the parsed syntax tree instead of executing
        #[arg(long)]
        dump_ast: bool,
    },

    /// Launch the interactive Hiss REPL
    Repl,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, dump_ast } => {
            let source = match fs::read_to_string(&file) {
                Ok(source) => source,
                Err(err) => {
                    eprintln!("hiss: cannot read {}: {}", file.display(), err);
                    process::exit(1);
                }
            };

            let program = match parser::parse_source(&source) {
                Ok(program) => program,
                Err(err) => {
                    eprintln!("{}", err.report());
                    process::exit(1);
                }
            };

            if dump_ast {
                print!("{}", ast::dump_program(&program));
                return;
            }

            let mut interpreter = Interpreter::new();
            if let Err(err) = interpreter.run(&program) {
                eprintln!("{}", err.report());
                process::exit(1);
            }
        }

        Commands::Repl => {
            let mut repl = match Repl::new() {
                Ok(repl) => repl,
                Err(err) => {
                    eprintln!("hiss: cannot start REPL: {}", err);
                    process::exit(1);
                }
            };
            if let Err(err) = repl.run() {
                eprintln!("hiss: {}", err);
                process::exit(1);
            }
        }
    }
}
