//! Status lines for the beadalize CLI.
//!
//! Progress goes to stderr as right-aligned verbs ("Sampling", "Filled",
//! "Wrote"). stdout carries only what a script would capture: palette
//! listings, bead counts and the SVG itself when no output file is given.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Verbs are padded to this width so messages line up.
const VERB_WIDTH: usize = 12;

/// Writes status lines to stderr, in colour when stderr is a terminal.
pub struct Printer {
    color: bool,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// Progress through a build, e.g. `    Sampling rocket.png`.
    pub fn status(&self, verb: &str, message: &str) {
        self.emit(GREEN, verb, message);
    }

    /// Facts about the run: platform, palette, filled beads.
    pub fn info(&self, verb: &str, message: &str) {
        self.emit(CYAN, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.emit(YELLOW, verb, message);
    }

    /// Dim secondary text such as hex codes next to a colour name.
    pub fn dim(&self, text: &str) -> String {
        if self.color {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn line(&self, color: &str, verb: &str, message: &str) -> String {
        if self.color {
            format!("{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}")
        } else {
            format!("{verb:>VERB_WIDTH$} {message}")
        }
    }

    fn emit(&self, color: &str, verb: &str, message: &str) {
        // A closed stderr is not worth failing a build over.
        let _ = writeln!(io::stderr().lock(), "{}", self.line(color, verb, message));
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// `plural(1, "bead", "beads")` is "1 bead", anything else takes the plural.
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    let word = if n == 1 { singular } else { pluralized };
    format!("{} {}", n, word)
}

/// Show `path` relative to the working directory when it lies inside it.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));
    match relative {
        Some(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Some(rel) => rel.display().to_string(),
        None => path.display().to_string(),
    }
}
