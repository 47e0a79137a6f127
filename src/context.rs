//! Per-run release state.

use std::collections::HashMap;

use crate::version::Version;

/// Mutable state for a single release run.
///
/// The three command lists are append-only and hold verbatim command
/// templates; they are resolved lazily (see [`crate::template`]) so that
/// commands registered before the new version is chosen may still refer to
/// it. `new_version` is assigned exactly once, after the operator confirms
/// the version prompt.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    pub old_version: Version,
    pub new_version: Option<Version>,
    pub abort_cmds: Vec<String>,
    pub push_cmds: Vec<String>,
    pub cleanup_cmds: Vec<String>,
}

impl ReleaseContext {
    /// Creates an empty context for a release starting from `old_version`.
    pub fn new(old_version: Version) -> Self {
        ReleaseContext {
            old_version,
            new_version: None,
            abort_cmds: Vec::new(),
            push_cmds: Vec::new(),
            cleanup_cmds: Vec::new(),
        }
    }

    /// Returns the template variables derived from this context.
    ///
    /// `new_version` is only present once it has been chosen; filling a
    /// template that references it earlier is a programming error and
    /// surfaces as an unknown-placeholder failure.
    pub fn vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("old_version".to_string(), self.old_version.to_string());
        if let Some(version) = &self.new_version {
            vars.insert("new_version".to_string(), version.to_string());
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_is_empty() {
        let ctx = ReleaseContext::new("0.9.6".parse().unwrap());
        assert!(ctx.new_version.is_none());
        assert!(ctx.abort_cmds.is_empty());
        assert!(ctx.push_cmds.is_empty());
        assert!(ctx.cleanup_cmds.is_empty());
    }

    #[test]
    fn test_vars_before_version_choice() {
        let ctx = ReleaseContext::new("0.9.6".parse().unwrap());
        let vars = ctx.vars();
        assert_eq!(vars.get("old_version").unwrap(), "0.9.6");
        assert!(!vars.contains_key("new_version"));
    }

    #[test]
    fn test_vars_after_version_choice() {
        let mut ctx = ReleaseContext::new("0.9.6".parse().unwrap());
        ctx.new_version = Some("0.9.7".parse().unwrap());
        let vars = ctx.vars();
        assert_eq!(vars.get("old_version").unwrap(), "0.9.6");
        assert_eq!(vars.get("new_version").unwrap(), "0.9.7");
    }
}
