//! Terminal messages printed before and after the browser runs.

use console::{Term, style};

/// Prints success, warning and error lines to the plain terminal.
#[derive(Debug, Clone)]
pub struct Formatter {
    colors: bool,
}

impl Formatter {
    pub fn new() -> Self {
        Self {
            colors: Term::stderr().features().colors_supported(),
        }
    }

    /// Formatter that never emits ANSI escapes.
    pub fn plain() -> Self {
        Self { colors: false }
    }

    pub fn colors_enabled(&self) -> bool {
        self.colors
    }

    pub fn success(&self, message: &str) {
        println!("{}", self.success_line(message));
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.error_line(message));
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.warning_line(message));
    }

    /// Indented follow-up line under an error or warning.
    pub fn hint(&self, message: &str) {
        if self.colors {
            eprintln!("  {}", style(message).dim());
        } else {
            eprintln!("  {message}");
        }
    }

    fn success_line(&self, message: &str) -> String {
        self.decorate("✓", message, |s| style(s).green().to_string())
    }

    fn error_line(&self, message: &str) -> String {
        self.decorate("✗", message, |s| style(s).red().to_string())
    }

    fn warning_line(&self, message: &str) -> String {
        self.decorate("⚠", message, |s| style(s).yellow().to_string())
    }

    fn decorate(&self, symbol: &str, message: &str, paint: impl Fn(&str) -> String) -> String {
        if self.colors {
            format!("{} {message}", paint(symbol))
        } else {
            format!("{symbol} {message}")
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}
