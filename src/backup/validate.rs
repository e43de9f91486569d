//! Validation functions for backup job values.
//!
//! Custom validators plugged into `validator` derives, plus the run-time
//! path existence check used right before a job is executed.

use validator::ValidationError;

use std::path::Path;

pub fn validate_non_empty<S: AsRef<str>>(value: S) -> Result<(), ValidationError> {
    if value.as_ref().is_empty() {
        return Err(ValidationError::new("EmptyPath")
            .with_message("path must not be empty".into()));
    }

    Ok(())
}

pub fn validate_patterns(patterns: &[String]) -> Result<(), ValidationError> {
    if let Some(idx) = patterns.iter().position(String::is_empty) {
        return Err(ValidationError::new("EmptyPattern")
            .with_message(format!("whitelist pattern #{} is empty", idx + 1).into()));
    }

    Ok(())
}

/// Which of a job's two paths are missing on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathPresence {
    pub source: bool,
    pub destination: bool,
}

impl PathPresence {
    pub fn check<P1: AsRef<Path>, P2: AsRef<Path>>(source: P1, destination: P2) -> Self {
        Self {
            source: source.as_ref().exists(),
            destination: destination.as_ref().exists(),
        }
    }

    pub fn both_exist(&self) -> bool {
        self.source && self.destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty("/srv/data").is_ok());
        assert!(validate_non_empty("   ").is_ok());
        assert_eq!(validate_non_empty("").unwrap_err().code, "EmptyPath");
    }

    #[test]
    fn test_validate_patterns() {
        let patterns = |p: &[&str]| p.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert!(validate_patterns(&[]).is_ok());
        assert!(validate_patterns(&patterns(&["*.txt", "docs/***"])).is_ok());

        let err = validate_patterns(&patterns(&["*.txt", ""])).unwrap_err();
        assert_eq!(err.code, "EmptyPattern");
        assert!(err.to_string().contains("#2"));
    }

    #[test]
    fn test_path_presence() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let presence = PathPresence::check(temp_dir.path(), temp_dir.path());
        assert!(presence.both_exist());

        let presence = PathPresence::check(temp_dir.path(), &missing);
        assert!(presence.source);
        assert!(!presence.destination);
        assert!(!presence.both_exist());

        let presence = PathPresence::check(&missing, temp_dir.path());
        assert!(!presence.source);
        assert!(presence.destination);
    }
}
