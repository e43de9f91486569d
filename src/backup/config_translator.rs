//! Translation of the parsed YAML document into validated backup jobs.
//!
//! Every problem found here is non-fatal: it is logged once as a warning,
//! recorded as a [`ConfigIssue`] on the resulting [`BackupPlan`], and the
//! affected job (or every job, when `paths` itself is unusable) is left out.

use crate::backup::backup_job::BackupJob;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithMsg;

use bon::Builder;
use getset::{CopyGetters, Getters};
use serde::de::DeserializeOwned;
use serde_yml::{Mapping, Value};
use thiserror::Error;
use tracing::{debug, info, warn};
use validator::Validate;

use std::fs::File;
use std::path::Path;

pub const PATHS_KEY: &str = "paths";
pub const SOURCE_KEY: &str = "source";
pub const DEST_KEY: &str = "dest";
pub const DELETE_KEY: &str = "delete";
pub const WHITELIST_KEY: &str = "whitelist";
pub const PROGRAM_KEY: &str = "rsync";
pub const STRICT_KEY: &str = "strict";

pub const DEFAULT_PROGRAM: &str = "rsync";
/// Location name used in messages about top-level keys.
pub const BASE_LOCATION: &str = "base yaml";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("Key: {key:?} not found in {location:?}")]
    MissingKey { key: &'static str, location: String },
    #[error("Key: {key:?} in {location:?} has an invalid value: {reason}")]
    InvalidValue {
        key: &'static str,
        location: String,
        reason: String,
    },
    #[error("{location:?} is not a mapping")]
    NotAMapping { location: String },
    #[error("Job {label:?} is invalid: {reason}")]
    InvalidJob { label: String, reason: String },
}

/// Run-wide settings read from the top level of the document.
#[derive(Clone, Debug, PartialEq, Eq, Builder, Getters, CopyGetters)]
pub struct RunOptions {
    /// Program invoked for every job.
    #[builder(default = DEFAULT_PROGRAM.to_string(), into)]
    #[getset(get = "pub")]
    program: String,
    /// Exit non-zero when any job was skipped or did not succeed.
    #[builder(default)]
    #[getset(get_copy = "pub")]
    strict: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Clone, Debug, Default)]
pub struct BackupPlan {
    pub jobs: Vec<BackupJob>,
    pub options: RunOptions,
    pub issues: Vec<ConfigIssue>,
}

/// Looks `key` up in `mapping` and converts it to `T`.
///
/// A `None` default makes the key required. An explicit YAML `null` counts
/// as absent.
pub fn lookup<T: DeserializeOwned>(
    mapping: &Mapping,
    key: &'static str,
    location: &str,
    default: Option<T>,
) -> std::result::Result<T, ConfigIssue> {
    match mapping.get(key) {
        None | Some(Value::Null) => default.ok_or_else(|| ConfigIssue::MissingKey {
            key,
            location: location.to_string(),
        }),
        Some(value) => {
            serde_yml::from_value(value.clone()).map_err(|e| ConfigIssue::InvalidValue {
                key,
                location: location.to_string(),
                reason: e.to_string(),
            })
        }
    }
}

/// Reads and parses a YAML configuration file into a generic document.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    File::open(path)
        .map_err(Error::from)
        .with_msg(format!("Open config failed: {path:?}"))
        .and_then(|f| {
            serde_yml::from_reader::<_, Value>(f)
                .map_err(Error::from)
                .with_msg(format!("Parse YAML config failed: {path:?}"))
        })
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ConfigTranslator;

impl ConfigTranslator {
    pub fn translate(&self, document: &Value) -> BackupPlan {
        let mut plan = BackupPlan::default();
        let empty = Mapping::new();
        let root = match document {
            Value::Null => &empty,
            Value::Mapping(m) => m,
            _ => {
                record(
                    &mut plan.issues,
                    ConfigIssue::NotAMapping {
                        location: BASE_LOCATION.to_string(),
                    },
                );
                return plan;
            }
        };

        plan.options = translate_options(root, &mut plan.issues);

        let paths = match lookup::<Mapping>(root, PATHS_KEY, BASE_LOCATION, None) {
            Ok(paths) => paths,
            Err(issue) => {
                record(&mut plan.issues, issue);
                return plan;
            }
        };

        for (key, entry) in paths.iter() {
            let label = label_of(key);
            match translate_entry(&label, entry) {
                Ok(job) => {
                    debug!("Loaded job {:?}: {:?} -> {:?}", label, job.source_path(), job.destination_path());
                    plan.jobs.push(job);
                }
                Err(issue) => record(&mut plan.issues, issue),
            }
        }

        info!("Loaded {} of {} backup job(s)", plan.jobs.len(), paths.len());
        plan
    }

    pub fn translate_str(&self, yaml: &str) -> Result<BackupPlan> {
        let document = serde_yml::from_str::<Value>(yaml)
            .map_err(Error::from)
            .with_msg("Parse YAML config failed")?;
        Ok(self.translate(&document))
    }
}

fn record(issues: &mut Vec<ConfigIssue>, issue: ConfigIssue) {
    warn!("{issue}");
    issues.push(issue);
}

fn translate_options(root: &Mapping, issues: &mut Vec<ConfigIssue>) -> RunOptions {
    let defaults = RunOptions::default();

    let program = lookup(root, PROGRAM_KEY, BASE_LOCATION, Some(defaults.program.clone()))
        .and_then(|program: String| {
            if program.trim().is_empty() {
                Err(ConfigIssue::InvalidValue {
                    key: PROGRAM_KEY,
                    location: BASE_LOCATION.to_string(),
                    reason: "program must not be empty".to_string(),
                })
            } else {
                Ok(program)
            }
        })
        .unwrap_or_else(|issue| {
            record(issues, issue);
            defaults.program.clone()
        });

    let strict = lookup(root, STRICT_KEY, BASE_LOCATION, Some(defaults.strict)).unwrap_or_else(|issue| {
        record(issues, issue);
        defaults.strict
    });

    RunOptions::builder().program(program).strict(strict).build()
}

fn translate_entry(label: &str, entry: &Value) -> std::result::Result<BackupJob, ConfigIssue> {
    let entry = entry.as_mapping().ok_or_else(|| ConfigIssue::NotAMapping {
        location: label.to_string(),
    })?;

    let source_path: String = lookup(entry, SOURCE_KEY, label, None)?;
    let destination_path: String = lookup(entry, DEST_KEY, label, None)?;
    let delete_extraneous = lookup(entry, DELETE_KEY, label, Some(false))?;
    let whitelist_patterns: Vec<String> = lookup(entry, WHITELIST_KEY, label, Some(Vec::new()))?;

    let job = BackupJob::builder()
        .label(label)
        .source_path(source_path)
        .destination_path(destination_path)
        .delete_extraneous(delete_extraneous)
        .whitelist_patterns(whitelist_patterns)
        .build();

    job.validate().map_err(|e| ConfigIssue::InvalidJob {
        label: label.to_string(),
        reason: e.to_string(),
    })?;

    Ok(job)
}

fn label_of(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => format!("{other:?}"),
    }
}
