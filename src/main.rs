use clap::Parser;
use rsync_backup::backup::config_translator::{load_document, ConfigTranslator};
use rsync_backup::backup::job_runner::JobRunner;
use std::path::{Path, PathBuf};
use std::process::exit;
use tracing::error;

/// Mirror configured directories with rsync
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Specify an alternate config path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

fn run(config: &Path) -> i32 {
    let document = match load_document(config) {
        Ok(document) => document,
        Err(e) => {
            error!("{e}");
            return 1;
        }
    };

    let plan = ConfigTranslator.translate(&document);
    let report = JobRunner::new(&plan.options).run(&plan.jobs);
    report.exit_code(plan.options.strict())
}

fn main() {
    let args = Args::parse();

    // Scoped to this run instead of installed as the global default.
    let subscriber = tracing_subscriber::fmt().finish();
    let code = tracing::subscriber::with_default(subscriber, || run(&args.config));

    exit(code);
}
