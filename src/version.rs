use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ReleaseError, Result};

/// Represents a semantic version with optional release-candidate number.
///
/// `rc == 0` means a stable release; `rc > 0` means release candidate N.
/// Renders as `MAJOR.MINOR.PATCH` or `MAJOR.MINOR.PATCH-rcN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub rc: u32,
}

/// Represents the type of version increment to apply.
///
/// `Rc` is only valid on a version that is already a release candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Increment {
    Major,
    Minor,
    Patch,
    Rc,
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:-rc([1-9]\d*))?$").expect("version pattern")
    })
}

impl Version {
    /// Creates a new stable Version with the specified components.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
            rc: 0,
        }
    }

    /// Returns true if this version is a release candidate.
    pub fn is_rc(&self) -> bool {
        self.rc > 0
    }

    /// Returns this version marked as the first release candidate (`-rc1`).
    pub fn as_release_candidate(&self) -> Version {
        Version {
            rc: 1,
            ..self.clone()
        }
    }

    /// Bumps the named field and resets every lower-order field to zero.
    /// `Rc` assumes the version is already a release candidate.
    fn bumped(&self, kind: Increment) -> Version {
        let mut next = self.clone();
        match kind {
            Increment::Major => {
                next.major += 1;
                next.minor = 0;
                next.patch = 0;
                next.rc = 0;
            }
            Increment::Minor => {
                next.minor += 1;
                next.patch = 0;
                next.rc = 0;
            }
            Increment::Patch => {
                next.patch += 1;
                next.rc = 0;
            }
            Increment::Rc => {
                next.rc += 1;
            }
        }
        next
    }

    /// Computes the incremented version for the given increment type.
    ///
    /// Bumping major/minor/patch resets every lower-order field (including
    /// the rc number). Bumping `Rc` advances the candidate number and is
    /// only valid when the version is already a release candidate.
    ///
    /// # Returns
    /// * `Ok(Version)` - The incremented version
    /// * `Err(InvalidIncrement)` - If `Rc` is requested on a stable version
    pub fn increment(&self, kind: Increment) -> Result<Version> {
        if kind == Increment::Rc && !self.is_rc() {
            return Err(ReleaseError::invalid_increment(format!(
                "{} is not a release candidate",
                self
            )));
        }
        Ok(self.bumped(kind))
    }

    /// Computes the candidate versions offered at the release prompt.
    ///
    /// A release candidate offers the next candidate and the minor bump;
    /// a stable version offers patch, minor, and major bumps, in that order.
    pub fn candidates(&self) -> Vec<Version> {
        if self.is_rc() {
            vec![self.bumped(Increment::Rc), self.bumped(Increment::Minor)]
        } else {
            vec![
                self.bumped(Increment::Patch),
                self.bumped(Increment::Minor),
                self.bumped(Increment::Major),
            ]
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.is_rc() {
            write!(f, "-rc{}", self.rc)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = ReleaseError;

    /// Parses `MAJOR.MINOR.PATCH` or `MAJOR.MINOR.PATCH-rcN` (N >= 1).
    ///
    /// `-rc0` is rejected: a zero rc number denotes a stable version and
    /// would not survive a format round-trip.
    fn from_str(s: &str) -> Result<Self> {
        let captures = version_pattern()
            .captures(s)
            .ok_or_else(|| ReleaseError::malformed_version(format!("'{}'", s)))?;

        let field = |i: usize| -> Result<u32> {
            captures
                .get(i)
                .map_or("0", |m| m.as_str())
                .parse::<u32>()
                .map_err(|_| {
                    ReleaseError::malformed_version(format!("'{}': component out of range", s))
                })
        };

        Ok(Version {
            major: field(1)?,
            minor: field(2)?,
            patch: field(3)?,
            rc: field(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_stable() {
        assert_eq!(v("1.2.3"), Version::new(1, 2, 3));
    }

    #[test]
    fn test_parse_release_candidate() {
        let version = v("1.2.3-rc4");
        assert_eq!(version.major, 1);
        assert_eq!(version.minor, 2);
        assert_eq!(version.patch, 3);
        assert_eq!(version.rc, 4);
        assert!(version.is_rc());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "1.2",
            "1.2.3.4",
            "a.b.c",
            "1.2.3-rc",
            "1.2.3-rc0",
            "1.2.3-beta1",
            "v1.2.3",
            "",
            "1.2.3 ",
        ] {
            assert!(
                bad.parse::<Version>().is_err(),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_rejects_oversized_component() {
        assert!("99999999999.0.0".parse::<Version>().is_err());
    }

    #[test]
    fn test_format_round_trip() {
        for s in ["0.0.1", "1.2.3", "0.9.6", "1.2.3-rc1", "10.20.30-rc99"] {
            assert_eq!(v(s).to_string(), s);
        }
    }

    #[test]
    fn test_increment_stable() {
        assert_eq!(v("1.2.3").increment(Increment::Patch).unwrap(), v("1.2.4"));
        assert_eq!(v("1.2.3").increment(Increment::Minor).unwrap(), v("1.3.0"));
        assert_eq!(v("1.2.3").increment(Increment::Major).unwrap(), v("2.0.0"));
    }

    #[test]
    fn test_increment_release_candidate() {
        assert_eq!(
            v("1.2.3-rc1").increment(Increment::Rc).unwrap(),
            v("1.2.3-rc2")
        );
        // The rc number is cleared, not carried over
        assert_eq!(
            v("1.2.3-rc1").increment(Increment::Minor).unwrap(),
            v("1.3.0")
        );
        assert_eq!(
            v("1.2.3-rc1").increment(Increment::Major).unwrap(),
            v("2.0.0")
        );
    }

    #[test]
    fn test_increment_rc_on_stable_fails() {
        let err = v("1.0.0").increment(Increment::Rc).unwrap_err();
        assert!(err.to_string().contains("Invalid increment"));
    }

    #[test]
    fn test_candidates_stable() {
        let candidates: Vec<String> = v("1.2.3")
            .candidates()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(candidates, ["1.2.4", "1.3.0", "2.0.0"]);
    }

    #[test]
    fn test_candidates_release_candidate() {
        let candidates: Vec<String> = v("1.2.3-rc1")
            .candidates()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(candidates, ["1.2.3-rc2", "1.3.0"]);
    }

    #[test]
    fn test_as_release_candidate() {
        assert_eq!(v("0.9.7").as_release_candidate(), v("0.9.7-rc1"));
    }
}
