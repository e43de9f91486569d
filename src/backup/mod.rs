pub mod backup_job;
pub mod config_translator;
pub mod executor;
pub mod job_runner;
#[cfg(test)]
pub(crate) mod log_capture;
pub mod result_error;
pub mod validate;
