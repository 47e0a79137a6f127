//! Pure formatting functions for terminal output.
//!
//! Functions here only build strings; callers decide where they are written.

use console::{measure_text_width, style};

/// Width of the horizontal rule and step lines.
const LINE_WIDTH: usize = 65;

/// Format an error line in red.
pub fn error_line(message: &str) -> String {
    format!("{} {}", style("Error:").red(), message)
}

/// Format a warning line in yellow.
pub fn warning(message: &str) -> String {
    format!("{} {}", style("Warning:").yellow(), message)
}

/// Format a step announcement, padded so the trailing "done" marker lines up.
///
/// Styled fragments are measured without their color codes.
pub fn start(message: &str) -> String {
    let width = measure_text_width(message);
    let padding = LINE_WIDTH.saturating_sub(4).saturating_sub(width);
    format!("{}{}", message, " ".repeat(padding))
}

/// The green "done" marker closing a step line.
pub fn done() -> String {
    style("done").green().to_string()
}

/// A full-width horizontal rule.
pub fn rule() -> String {
    "-".repeat(LINE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_width() {
        assert_eq!(rule().len(), 65);
    }

    #[test]
    fn test_start_pads_to_fixed_width() {
        let line = start("Committing changes...");
        assert_eq!(line.len(), 61);
        assert!(line.starts_with("Committing changes..."));
    }

    #[test]
    fn test_start_ignores_color_codes_when_measuring() {
        let plain = start("Cloning repo...");
        let styled = start(&format!("Cloning {}...", console::style("repo").cyan().force_styling(true)));
        assert_eq!(
            measure_text_width(&plain),
            measure_text_width(&styled)
        );
    }

    #[test]
    fn test_start_never_underflows() {
        let long = "x".repeat(200);
        assert_eq!(start(&long), long);
    }

    #[test]
    fn test_error_line_contains_message() {
        assert!(error_line("bad branch").contains("bad branch"));
    }
}
