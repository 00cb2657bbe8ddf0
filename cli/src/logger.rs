use colored::*;
use console::Term;
use std::fmt::Display;

/// Terminal output helpers. A namespace, never instantiated.
/// Brand colors: teal (38, 166, 154) for info and highlights, amber (255, 179, 0) for selections.
pub struct Logger;

impl Logger {
    pub fn info<T: Display>(msg: T) {
        println!("{} {}", "•".truecolor(38, 166, 154).bold(), msg);
    }

    pub fn success<T: Display>(msg: T) {
        println!("{} {}", "✔".green().bold(), msg);
    }

    /// Goes to stderr so scripts piping `boxes show` still get a clean grid.
    pub fn error<T: Display>(msg: T) {
        eprintln!("{} {}", "✖".red().bold(), msg);
    }

    pub fn warn<T: Display>(msg: T) {
        println!("{} {}", "⚠".yellow().bold(), msg);
    }

    /// Section header. The leading newline keeps it off the previous output.
    pub fn header<T: Display>(msg: T) {
        println!(
            "\n{}",
            msg.to_string().truecolor(38, 166, 154).bold().underline()
        );
    }

    pub fn highlight<T: Display>(msg: T) -> String {
        msg.to_string().truecolor(38, 166, 154).bold().to_string()
    }

    /// Used for selected boxes in the grid.
    pub fn selected<T: Display>(msg: T) -> String {
        msg.to_string().truecolor(255, 179, 0).bold().to_string()
    }

    pub fn dim<T: Display>(msg: T) -> String {
        msg.to_string().dimmed().to_string()
    }

    /// How many grid cells fit on one line of the current terminal.
    pub fn cells_per_row(cell_width: usize) -> usize {
        let columns = Term::stdout().size().1 as usize;
        (columns / (cell_width + 1)).clamp(1, 20)
    }
}
