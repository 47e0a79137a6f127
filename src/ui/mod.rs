//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling
//!
//! Prompts are generic over the input/output streams so tests can drive
//! them with in-memory buffers.

use std::io::{self, BufRead, Write};

use console::style;

use crate::error::{ReleaseError, Result};
use crate::version::Version;

pub mod formatter;

/// Reads one trimmed line, failing on end of input.
fn read_trimmed<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(ReleaseError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed during prompt",
        )));
    }
    Ok(line.trim().to_string())
}

/// Interprets a version-menu entry as either a 1-based index into the
/// candidate list or a literal version string.
///
/// # Returns
/// * `Ok(Version)` - The chosen version
/// * `Err(Selection)` - Index out of range, or neither index nor version
pub fn parse_selection(entry: &str, candidates: &[Version]) -> Result<Version> {
    if entry.chars().all(|c| c.is_ascii_digit()) && !entry.is_empty() {
        let index: usize = entry
            .parse()
            .map_err(|_| ReleaseError::selection(format!("'{}'", entry)))?;
        return if index >= 1 && index <= candidates.len() {
            Ok(candidates[index - 1].clone())
        } else {
            Err(ReleaseError::selection(format!(
                "'{}' is not between 1 and {}",
                entry,
                candidates.len()
            )))
        };
    }

    entry
        .parse::<Version>()
        .map_err(|_| ReleaseError::selection(format!("'{}'", entry)))
}

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Accepts "y" or "yes" (case-insensitive) as confirmation; anything else,
/// including an empty line, declines.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<bool> {
    write!(out, "{} {} ", prompt, style("[yes/no]").cyan())?;
    out.flush()?;
    let response = read_trimmed(input)?.to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Prompts the operator for the new release version.
///
/// Presents the candidate versions as a numbered menu; accepts a menu
/// index, a literal `MAJOR.MINOR.PATCH[-rcN]` string, or `q` to cancel.
/// Invalid entries re-prompt. A stable choice is offered an optional `-rc1`
/// suffix, and the final choice must be confirmed; declining the
/// confirmation restarts the menu.
///
/// # Returns
/// * `Ok(Some(version))` - The confirmed new version
/// * `Ok(None)` - The operator quit the prompt
/// * `Err` - Input/output failure
pub fn choose_version<R: BufRead, W: Write>(
    current: &Version,
    input: &mut R,
    out: &mut W,
) -> Result<Option<Version>> {
    let candidates = current.candidates();

    loop {
        writeln!(out)?;
        writeln!(out, "The current version is {}.", style(current).cyan())?;
        writeln!(out)?;
        writeln!(out, "What type of release is this?")?;
        for (i, candidate) in candidates.iter().enumerate() {
            writeln!(out, "{}) {}", i + 1, style(candidate).cyan())?;
        }
        writeln!(out)?;
        write!(
            out,
            "Please select a new version (1-{}, an explicit version, or 'q' to quit): ",
            candidates.len()
        )?;
        out.flush()?;

        let entry = read_trimmed(input)?;
        if entry.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        let mut version = match parse_selection(&entry, &candidates) {
            Ok(version) => version,
            Err(e) => {
                writeln!(out, "{}", formatter::error_line(&e.to_string()))?;
                continue;
            }
        };

        if !version.is_rc() {
            writeln!(out)?;
            if confirm(input, out, "Is this a release candidate?")? {
                version = version.as_release_candidate();
            }
        }

        writeln!(out)?;
        writeln!(out, "The new version will be {}.", style(&version).cyan())?;
        if confirm(input, out, "Is this correct?")? {
            return Ok(Some(version));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    fn choose(current: &str, script: &str) -> (Result<Option<Version>>, String) {
        let mut input = Cursor::new(script.to_string());
        let mut out = Vec::new();
        let result = choose_version(&v(current), &mut input, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_selection_menu_index() {
        let candidates = v("0.9.6").candidates();
        assert_eq!(parse_selection("1", &candidates).unwrap(), v("0.9.7"));
        assert_eq!(parse_selection("2", &candidates).unwrap(), v("0.10.0"));
        assert_eq!(parse_selection("3", &candidates).unwrap(), v("1.0.0"));
    }

    #[test]
    fn test_parse_selection_literal_version() {
        let candidates = v("0.9.6").candidates();
        assert_eq!(
            parse_selection("2.5.0-rc3", &candidates).unwrap(),
            v("2.5.0-rc3")
        );
    }

    #[test]
    fn test_parse_selection_rejects_out_of_range_index() {
        let candidates = v("0.9.6").candidates();
        assert!(parse_selection("0", &candidates).is_err());
        assert!(parse_selection("4", &candidates).is_err());
    }

    #[test]
    fn test_parse_selection_rejects_garbage() {
        let candidates = v("0.9.6").candidates();
        assert!(parse_selection("banana", &candidates).is_err());
        assert!(parse_selection("1.2", &candidates).is_err());
        assert!(parse_selection("", &candidates).is_err());
    }

    #[test]
    fn test_choose_version_menu_selection() {
        let (result, _) = choose("0.9.6", "1\nno\nyes\n");
        assert_eq!(result.unwrap(), Some(v("0.9.7")));
    }

    #[test]
    fn test_choose_version_appends_rc_suffix() {
        let (result, _) = choose("0.9.6", "2\nyes\nyes\n");
        assert_eq!(result.unwrap(), Some(v("0.10.0-rc1")));
    }

    #[test]
    fn test_choose_version_rc_current_skips_rc_prompt() {
        // Candidates for an rc are [rc+1, minor]; confirmation follows directly
        let (result, _) = choose("1.2.3-rc1", "1\nyes\n");
        assert_eq!(result.unwrap(), Some(v("1.2.3-rc2")));
    }

    #[test]
    fn test_choose_version_literal_entry() {
        let (result, _) = choose("0.9.6", "3.0.0\nno\nyes\n");
        assert_eq!(result.unwrap(), Some(v("3.0.0")));
    }

    #[test]
    fn test_choose_version_invalid_then_valid() {
        let (result, out) = choose("0.9.6", "wat\n1\nno\nyes\n");
        assert_eq!(result.unwrap(), Some(v("0.9.7")));
        assert!(out.contains("Invalid selection"));
    }

    #[test]
    fn test_choose_version_declined_confirmation_restarts() {
        let (result, out) = choose("0.9.6", "1\nno\nno\n2\nno\nyes\n");
        assert_eq!(result.unwrap(), Some(v("0.10.0")));
        // The menu is shown twice
        assert_eq!(out.matches("What type of release is this?").count(), 2);
    }

    #[test]
    fn test_choose_version_quit() {
        let (result, _) = choose("0.9.6", "q\n");
        assert_eq!(result.unwrap(), None);
    }

    #[test]
    fn test_choose_version_exhausted_input_is_error() {
        let (result, _) = choose("0.9.6", "");
        assert!(result.is_err());
    }
}
