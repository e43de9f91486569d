pub mod error;
pub mod result;

/// Wraps an error with the job label and the operation that failed on it.
pub trait WithJobContext<L: Into<String>, S: Into<String>> {
    fn with_job_context(self, label: L, operation: S) -> Self;
}

pub trait WithMsg<S: Into<String>> {
    fn with_msg(self, msg: S) -> Self;
}
