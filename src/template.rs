//! Lazy command templating.
//!
//! Release steps accumulate shell commands as verbatim templates containing
//! `{{name}}` placeholders. Placeholders are resolved against an explicit
//! named map only when a command is about to be executed or written out, so
//! early steps may reference context fields (such as the new version) that
//! are assigned later in the run. Templates are data; nothing in them is
//! ever evaluated as code.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ReleaseError, Result};

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}").expect("placeholder pattern"))
}

/// Substitutes every `{{name}}` placeholder in `template` from `vars`.
///
/// # Returns
/// * `Ok(String)` - The template with all placeholders resolved
/// * `Err(Template)` - If a placeholder has no entry in `vars`
pub fn fill(template: &str, vars: &HashMap<String, String>) -> Result<String> {
    let mut filled = String::with_capacity(template.len());
    let mut last = 0;

    for captures in placeholder_pattern().captures_iter(template) {
        let whole = captures.get(0).expect("match group");
        let name = &captures[1];
        let value = vars
            .get(name)
            .ok_or_else(|| ReleaseError::Template(name.to_string()))?;
        filled.push_str(&template[last..whole.start()]);
        filled.push_str(value);
        last = whole.end();
    }
    filled.push_str(&template[last..]);

    Ok(filled)
}
