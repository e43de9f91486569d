//! # rsync-backup
//!
//! Mirrors a list of directory pairs with `rsync`, driven by a YAML file.
//!
//! ## Features
//!
//! - **Declarative jobs**: one `paths.<label>` entry per source/destination pair
//! - **Whitelists**: restrict a job to paths matching include patterns
//! - **Mirroring**: optionally delete destination files absent from the source
//! - **Fail soft**: bad entries and missing paths are logged and skipped, never fatal
//!
//! ## Quick Start
//!
//! ```no_run
//! use rsync_backup::backup::config_translator::{load_document, ConfigTranslator};
//! use rsync_backup::backup::job_runner::JobRunner;
//!
//! let document = load_document("config.yaml")?;
//! let plan = ConfigTranslator.translate(&document);
//! let report = JobRunner::new(&plan.options).run(&plan.jobs);
//! std::process::exit(report.exit_code(plan.options.strict()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backup;
