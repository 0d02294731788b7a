//! Version value type: dotted numeric versions with release lifecycle qualifiers
//!
//! A version is `<major>.<minor>.<patch>` optionally followed by `-SNAPSHOT`
//! (work in progress) or `-RC-<n>` (release candidate). Parsing is strict:
//! anything else is a typed error, never a partially populated value.
//!
//! The numeric triple is delegated to `semver`; the qualifier layer on top
//! defines the lifecycle ordering: a snapshot precedes its candidates, which
//! precede the final release of the same triple.

use crate::core::error::VersionError;
use std::fmt;
use std::str::FromStr;

const SNAPSHOT: &str = "SNAPSHOT";
const CANDIDATE_PREFIX: &str = "RC-";

/// Release lifecycle qualifier, ordered by maturity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Qualifier {
  /// Work in progress (`-SNAPSHOT`)
  Snapshot,
  /// Release candidate with a sequence number (`-RC-<n>`)
  Candidate(u64),
  /// Final release (no qualifier)
  Release,
}

/// A parsed version: numeric triple plus lifecycle qualifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
  numeric: semver::Version,
  qualifier: Qualifier,
}

impl Version {
  /// Parse a version string, rejecting anything outside the supported grammar
  pub fn parse(text: &str) -> Result<Self, VersionError> {
    let parsed = semver::Version::parse(text).map_err(|e| VersionError::new(text, e.to_string()))?;

    if !parsed.build.is_empty() {
      return Err(VersionError::new(text, "build metadata is not supported"));
    }

    let qualifier = match parsed.pre.as_str() {
      "" => Qualifier::Release,
      SNAPSHOT => Qualifier::Snapshot,
      pre => match pre.strip_prefix(CANDIDATE_PREFIX).and_then(|n| n.parse::<u64>().ok()) {
        Some(seq) => Qualifier::Candidate(seq),
        None => {
          return Err(VersionError::new(
            text,
            format!("unsupported qualifier '{}': expected SNAPSHOT or RC-<n>", pre),
          ));
        }
      },
    };

    Ok(Self {
      numeric: semver::Version::new(parsed.major, parsed.minor, parsed.patch),
      qualifier,
    })
  }

  fn with_qualifier(numeric: semver::Version, qualifier: Qualifier) -> Self {
    Self { numeric, qualifier }
  }

  pub fn qualifier(&self) -> Qualifier {
    self.qualifier
  }

  pub fn is_snapshot(&self) -> bool {
    self.qualifier == Qualifier::Snapshot
  }

  pub fn is_candidate(&self) -> bool {
    matches!(self.qualifier, Qualifier::Candidate(_))
  }

  pub fn is_release(&self) -> bool {
    self.qualifier == Qualifier::Release
  }

  /// Strip a snapshot qualifier; releases and candidates are returned unchanged
  pub fn release_of(&self) -> Version {
    match self.qualifier {
      Qualifier::Snapshot => Self::with_qualifier(self.numeric.clone(), Qualifier::Release),
      _ => self.clone(),
    }
  }

  /// The snapshot that development moves to after this version: patch bumped,
  /// snapshot qualifier (re-)applied
  pub fn next_snapshot_of(&self) -> Version {
    Self::with_qualifier(self.bumped_patch(), Qualifier::Snapshot)
  }

  fn bumped_patch(&self) -> semver::Version {
    semver::Version::new(self.numeric.major, self.numeric.minor, self.numeric.patch + 1)
  }

  fn bumped_minor(&self) -> semver::Version {
    semver::Version::new(self.numeric.major, self.numeric.minor + 1, 0)
  }

  fn bumped_major(&self) -> semver::Version {
    semver::Version::new(self.numeric.major + 1, 0, 0)
  }

  /// Plausible next release targets derived from this version, strictly
  /// ascending and deduplicated.
  ///
  /// For an in-progress version (snapshot or candidate) the series starts at
  /// its own finalized triple; for a finished release it starts at the next
  /// patch.
  pub fn candidate_series(&self) -> Vec<Version> {
    let mut series = if self.is_release() {
      vec![
        Self::with_qualifier(self.bumped_patch(), Qualifier::Release),
        Self::with_qualifier(self.bumped_minor(), Qualifier::Release),
        Self::with_qualifier(self.bumped_major(), Qualifier::Release),
      ]
    } else {
      vec![
        Self::with_qualifier(self.numeric.clone(), Qualifier::Release),
        Self::with_qualifier(self.bumped_minor(), Qualifier::Release),
        Self::with_qualifier(self.bumped_major(), Qualifier::Release),
      ]
    };
    series.sort();
    series.dedup();
    series
  }

  /// String-level snapshot check, usable before (or without) a full parse
  pub fn is_snapshot_text(text: &str) -> bool {
    text.ends_with(&format!("-{}", SNAPSHOT))
  }

  /// String-level candidate check, usable before (or without) a full parse
  pub fn is_candidate_text(text: &str) -> bool {
    text.contains(&format!("-{}", CANDIDATE_PREFIX))
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.numeric)?;
    match self.qualifier {
      Qualifier::Release => Ok(()),
      Qualifier::Snapshot => write!(f, "-{}", SNAPSHOT),
      Qualifier::Candidate(seq) => write!(f, "-{}{}", CANDIDATE_PREFIX, seq),
    }
  }
}

impl FromStr for Version {
  type Err = VersionError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Version::parse(s)
  }
}

impl PartialOrd for Version {
  fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Version {
  fn cmp(&self, other: &Self) -> std::cmp::Ordering {
    self
      .numeric
      .cmp(&other.numeric)
      .then_with(|| self.qualifier.cmp(&other.qualifier))
  }
}
