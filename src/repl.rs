// File: src/repl.rs
//
// Interactive REPL (Read-Eval-Print Loop) for the Hiss scripting language.
// Provides an interactive shell for executing Hiss code with features like:
// - Multi-line input support for if/for/def blocks
// - Command history with up/down arrow navigation
// - Line editing capabilities
// - Special commands (:help, :clear, :quit, :vars, :reset)
// - Persistent state across inputs
// - Proper error handling and display

use crate::errors::HissError;
use crate::interpreter::Interpreter;
use crate::parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// REPL session that maintains interpreter state and handles user interaction
pub struct Repl {
    interpreter: Interpreter,
    editor: DefaultEditor,
}

impl Repl {
    /// Creates a new REPL session with a fresh interpreter
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let editor = DefaultEditor::new()?;
        Ok(Repl { interpreter: Interpreter::new(), editor })
    }

    /// Displays the welcome banner with version and help information
    fn show_banner(&self) {
        println!(
            "{}",
            format!("Hiss {} - Interactive Shell", env!("CARGO_PKG_VERSION")).bright_cyan()
        );
        println!(
            "  Type {}{} for commands, {}{} to leave.",
            ":".bright_blue(),
            "help".bright_yellow(),
            ":".bright_blue(),
            "quit".bright_yellow()
        );
        println!("  A line ending in ':' opens a block; a blank line closes it.");
        println!();
    }

    /// Starts the REPL loop
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.show_banner();

        let mut buffer = String::new();

        loop {
            // Continuation prompt while a block is still open
            let prompt = if buffer.is_empty() {
                "hiss> ".bright_green().to_string()
            } else {
                "....> ".bright_blue().to_string()
            };

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }

                    // Special commands only apply outside multi-line mode
                    if buffer.is_empty() && line.trim().starts_with(':') {
                        if self.handle_command(line.trim()) {
                            continue;
                        } else {
                            break; // :quit was called
                        }
                    }

                    buffer.push_str(&line);
                    buffer.push('\n');

                    if input_complete(&buffer, &line) {
                        self.eval_input(&buffer);
                        buffer.clear();
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C (input discarded, :quit to exit)".bright_yellow());
                    buffer.clear();
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "Goodbye!".bright_cyan());
                    break;
                }
                Err(err) => {
                    eprintln!("{} {}", "Error:".bright_red(), err);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handles special REPL commands starting with ':'
    /// Returns true to continue REPL, false to quit
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":help" | ":h" => {
                self.show_help();
                true
            }
            ":quit" | ":q" | ":exit" => {
                println!("{}", "Goodbye!".bright_cyan());
                false
            }
            ":clear" | ":c" => {
                print!("\x1B[2J\x1B[1;1H");
                self.show_banner();
                true
            }
            ":vars" | ":v" => {
                self.show_variables();
                true
            }
            ":reset" | ":r" => {
                self.interpreter = Interpreter::new();
                println!("{}", "Environment reset".bright_green());
                true
            }
            _ => {
                println!(
                    "{} Unknown command: {}. Type {}{} for available commands.",
                    "Error:".bright_red(),
                    cmd.bright_yellow(),
                    ":".bright_blue(),
                    "help".bright_yellow()
                );
                true
            }
        }
    }

    /// Displays help information about available commands
    fn show_help(&self) {
        println!();
        println!("{}", "REPL Commands:".bright_cyan().bold());
        println!();
        println!("  {} or :h   Display this help message", ":help".bright_yellow());
        println!("  {} or :q   Exit the REPL", ":quit".bright_yellow());
        println!("  {} or :c  Clear the screen", ":clear".bright_yellow());
        println!("  {} or :v   Show defined variables", ":vars".bright_yellow());
        println!("  {} or :r  Reset environment", ":reset".bright_yellow());
        println!();
        println!("{}", "Multi-line Input:".bright_cyan().bold());
        println!();
        println!("  End a line with ':' to open an if/for/def block, indent the");
        println!("  body, and enter a blank line to execute it.");
        println!();
        println!("{}", "Examples:".bright_cyan().bold());
        println!();
        println!("  {}", "hiss> x = 42".dimmed());
        println!("  {}", "hiss> for i in range(3):".dimmed());
        println!("  {}", "....>     print i".dimmed());
        println!("  {}", "....>".dimmed());
        println!();
    }

    /// Displays all variables defined in the global frame
    fn show_variables(&self) {
        let names = self.interpreter.env.global_names();
        if names.is_empty() {
            println!("  {}", "(no variables defined)".dimmed());
            return;
        }
        for name in names {
            if let Some(value) = self.interpreter.env.get(&name) {
                println!("  {} = {}", name.bright_yellow(), value);
            }
        }
    }

    /// Parses and runs one accumulated input, reporting errors without
    /// abandoning the session state.
    fn eval_input(&mut self, input: &str) {
        if input.trim().is_empty() {
            return;
        }

        let program = match parser::parse_source(input) {
            Ok(program) => program,
            Err(err) => {
                self.print_error(&err);
                return;
            }
        };

        if let Err(err) = self.interpreter.run(&program) {
            self.print_error(&err);
        }
    }

    fn print_error(&self, err: &HissError) {
        eprintln!("{}", err.report());
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new().expect("Failed to create REPL")
    }
}

/// A buffer is complete when it is a single line with no trailing ':'
/// (a simple statement), or when multi-line mode was closed by a blank
/// line. A trailing ':' always opens a block.
fn input_complete(buffer: &str, last_line: &str) -> bool {
    let in_block = buffer.trim_end().ends_with(':') || buffer.lines().count() > 1;
    if !in_block {
        return true;
    }
    last_line.trim().is_empty()
}
