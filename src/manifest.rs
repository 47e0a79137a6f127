//! Package manifest and docs-site index edits.
//!
//! Only the version-bearing fields are touched; every other field is
//! preserved through a parse/reserialize cycle (pretty-printed JSON, the
//! format the manifests are kept in).

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{ReleaseError, Result};
use crate::version::Version;

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| ReleaseError::manifest(format!("{}: {}", path.display(), e)))
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ReleaseError::manifest(format!("{}: {}", path.display(), e)))?;
    fs::write(path, text + "\n")?;
    Ok(())
}

/// Reads the `version` field of a JSON package manifest.
///
/// # Returns
/// * `Ok(Version)` - The parsed current version
/// * `Err` - If the file is unreadable, not JSON, or has no version field
pub fn read_version(path: &Path) -> Result<Version> {
    let manifest = read_json(path)?;
    let version = manifest
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ReleaseError::manifest(format!("{}: missing version field", path.display()))
        })?;
    version.parse()
}

/// Rewrites the `version` field of a JSON package manifest in place.
pub fn write_version(path: &Path, version: &Version) -> Result<()> {
    let mut manifest = read_json(path)?;
    let fields = manifest.as_object_mut().ok_or_else(|| {
        ReleaseError::manifest(format!("{}: not a JSON object", path.display()))
    })?;
    fields.insert("version".to_string(), Value::String(version.to_string()));
    write_json(path, &manifest)
}

/// Promotes `version` to the latest entry of a docs-site index.
///
/// The index file carries a `versions` array (newest first) and a `latest`
/// field; the new version is prepended and becomes latest.
pub fn promote_site_version(path: &Path, version: &Version) -> Result<()> {
    let mut index = read_json(path)?;
    let versions = index
        .get_mut("versions")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| {
            ReleaseError::manifest(format!("{}: missing versions list", path.display()))
        })?;
    versions.insert(0, Value::String(version.to_string()));
    index["latest"] = Value::String(version.to_string());
    write_json(path, &index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn test_read_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, r#"{ "name": "demo", "version": "0.9.6" }"#).unwrap();

        assert_eq!(read_version(&path).unwrap(), v("0.9.6"));
    }

    #[test]
    fn test_read_version_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, r#"{ "name": "demo" }"#).unwrap();

        let err = read_version(&path).unwrap_err();
        assert!(err.to_string().contains("missing version field"));
    }

    #[test]
    fn test_write_version_preserves_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(
            &path,
            r#"{ "name": "demo", "version": "0.9.6", "dependencies": { "left-pad": "1.0.0" } }"#,
        )
        .unwrap();

        write_version(&path, &v("0.9.7")).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let manifest: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(manifest["version"], "0.9.7");
        assert_eq!(manifest["name"], "demo");
        assert_eq!(manifest["dependencies"]["left-pad"], "1.0.0");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_write_version_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(write_version(&path, &v("1.0.0")).is_err());
    }

    #[test]
    fn test_promote_site_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        fs::write(
            &path,
            r#"{ "latest": "0.9.6", "versions": ["0.9.6", "0.9.5"] }"#,
        )
        .unwrap();

        promote_site_version(&path, &v("0.9.7")).unwrap();

        let index: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(index["latest"], "0.9.7");
        assert_eq!(index["versions"][0], "0.9.7");
        assert_eq!(index["versions"][1], "0.9.6");
        assert_eq!(index["versions"][2], "0.9.5");
    }

    #[test]
    fn test_promote_site_version_missing_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        fs::write(&path, r#"{ "latest": "0.9.6" }"#).unwrap();

        let err = promote_site_version(&path, &v("0.9.7")).unwrap_err();
        assert!(err.to_string().contains("missing versions list"));
    }
}
