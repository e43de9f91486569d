use crate::backup::validate::{validate_non_empty, validate_patterns};

use bon::Builder;
use getset::{CopyGetters, Getters};
use itertools::Itertools;
use validator::Validate;

/// Archive mode, human readable sizes, whole-transfer progress, keep partial
/// files for resume, and drop directories left empty by the filter rules.
pub const BASE_FLAGS: [&str; 4] = ["-ah", "--info=progress2", "--partial", "--prune-empty-dirs"];
/// Lets rsync descend into every directory so nested whitelist matches are reachable.
pub const INCLUDE_ALL_DIRS: &str = "--include=*/";
pub const EXCLUDE_EVERYTHING: &str = "--exclude=*";
pub const DELETE_EXTRANEOUS: &str = "--delete";

/// One source → destination mirror, as declared under `paths.<label>`.
///
/// Jobs are built once from the configuration and never mutated afterwards.
/// Validation covers the values only; path existence is checked by the
/// runner right before the job executes.
#[derive(Clone, Debug, PartialEq, Eq, Validate, Builder, Getters, CopyGetters)]
pub struct BackupJob {
    #[builder(into)]
    #[getset(get = "pub")]
    label: String,
    #[validate(custom(function = validate_non_empty))]
    #[builder(into)]
    #[getset(get = "pub")]
    source_path: String,
    #[validate(custom(function = validate_non_empty))]
    #[builder(into)]
    #[getset(get = "pub")]
    destination_path: String,
    #[builder(default)]
    #[getset(get_copy = "pub")]
    delete_extraneous: bool,
    #[validate(custom(function = validate_patterns))]
    #[builder(default, into)]
    #[getset(get = "pub")]
    whitelist_patterns: Vec<String>,
}

impl BackupJob {
    /// Arguments passed to rsync for this job, program name excluded.
    ///
    /// Layout: base flags, then the whitelist filter block when there are
    /// patterns, then `source destination`, then `--delete` when requested.
    /// rsync applies filter rules first-match-wins, so the include-all-dirs
    /// rule must come first and the catch-all exclude last.
    pub fn rsync_args(&self) -> Vec<String> {
        let filter_len = if self.whitelist_patterns.is_empty() {
            0
        } else {
            self.whitelist_patterns.len() + 2
        };
        let mut args = Vec::with_capacity(BASE_FLAGS.len() + filter_len + 3);

        args.extend(BASE_FLAGS.iter().map(|f| f.to_string()));

        if !self.whitelist_patterns.is_empty() {
            args.push(INCLUDE_ALL_DIRS.to_string());
            args.extend(
                self.whitelist_patterns
                    .iter()
                    .map(|pattern| format!("--include={pattern}")),
            );
            args.push(EXCLUDE_EVERYTHING.to_string());
        }

        args.push(self.source_path.clone());
        args.push(self.destination_path.clone());

        if self.delete_extraneous {
            args.push(DELETE_EXTRANEOUS.to_string());
        }

        args
    }

    /// Shell-like rendering for logs. Not meant to be pasted into a shell.
    pub fn command_line<S: AsRef<str>>(&self, program: S) -> String {
        std::iter::once(program.as_ref().to_string())
            .chain(self.rsync_args())
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs_job() -> BackupJob {
        BackupJob::builder()
            .label("docs")
            .source_path("/a")
            .destination_path("/b")
            .delete_extraneous(true)
            .whitelist_patterns(vec!["*.txt".to_string()])
            .build()
    }

    #[test]
    fn test_builder_defaults() {
        let job = BackupJob::builder()
            .label("music")
            .source_path("/home/me/music")
            .destination_path("/mnt/backup/music")
            .build();

        assert!(!job.delete_extraneous());
        assert!(job.whitelist_patterns().is_empty());
        assert!(job.validate().is_ok());
    }

    #[test]
    fn test_rsync_args_plain() {
        let job = BackupJob::builder()
            .label("music")
            .source_path("/src")
            .destination_path("/dst")
            .build();

        assert_eq!(
            job.rsync_args(),
            vec!["-ah", "--info=progress2", "--partial", "--prune-empty-dirs", "/src", "/dst"]
        );
    }

    #[test]
    fn test_rsync_args_whitelist_and_delete() {
        assert_eq!(
            docs_job().rsync_args(),
            vec![
                "-ah",
                "--info=progress2",
                "--partial",
                "--prune-empty-dirs",
                "--include=*/",
                "--include=*.txt",
                "--exclude=*",
                "/a",
                "/b",
                "--delete",
            ]
        );
    }

    #[test]
    fn test_rsync_args_whitelist_keeps_declared_order() {
        let job = BackupJob::builder()
            .label("photos")
            .source_path("/src")
            .destination_path("/dst")
            .whitelist_patterns(vec![
                "*.raw".to_string(),
                "albums/**".to_string(),
                "*.jpg".to_string(),
            ])
            .build();
        let args = job.rsync_args();

        let filters = &args[BASE_FLAGS.len()..args.len() - 2];
        assert_eq!(
            filters,
            ["--include=*/", "--include=*.raw", "--include=albums/**", "--include=*.jpg", "--exclude=*"]
        );
        assert_eq!(&args[args.len() - 2..], ["/src", "/dst"]);
    }

    #[test]
    fn test_delete_flag_only_when_requested_and_after_paths() {
        let with_delete = docs_job().rsync_args();
        let dst_idx = with_delete.iter().position(|a| a == "/b").unwrap();
        let del_idx = with_delete.iter().position(|a| a == DELETE_EXTRANEOUS).unwrap();
        assert!(del_idx > dst_idx);

        let without_delete = BackupJob::builder()
            .label("docs")
            .source_path("/a")
            .destination_path("/b")
            .build()
            .rsync_args();
        assert!(!without_delete.iter().any(|a| a == DELETE_EXTRANEOUS));
    }

    #[test]
    fn test_rsync_args_deterministic() {
        let job = docs_job();
        assert_eq!(job.rsync_args(), job.clone().rsync_args());
    }

    #[test]
    fn test_command_line() {
        assert_eq!(
            docs_job().command_line("rsync"),
            "rsync -ah --info=progress2 --partial --prune-empty-dirs --include=*/ --include=*.txt --exclude=* /a /b --delete"
        );
    }

    #[test]
    fn test_validation_rejects_blank_paths() {
        let job = BackupJob::builder()
            .label("broken")
            .source_path("")
            .destination_path("/dst")
            .build();
        let errors = job.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("source_path"));
    }

    #[test]
    fn test_validation_rejects_empty_pattern() {
        let job = BackupJob::builder()
            .label("broken")
            .source_path("/src")
            .destination_path("/dst")
            .whitelist_patterns(vec!["".to_string()])
            .build();
        let errors = job.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("whitelist_patterns"));
    }
}
