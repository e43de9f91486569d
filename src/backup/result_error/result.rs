use crate::backup::result_error::error::Error;
use crate::backup::result_error::{WithJobContext, WithMsg};

pub type Result<T> = std::result::Result<T, Error>;

impl<L: Into<String>, S: Into<String>, R> WithJobContext<L, S> for Result<R> {
    fn with_job_context(self, label: L, operation: S) -> Self {
        self.map_err(|e| e.with_job_context(label, operation))
    }
}

impl<R, S: Into<String>> WithMsg<S> for Result<R> {
    fn with_msg(self, msg: S) -> Self {
        self.map_err(|e| e.with_msg(msg))
    }
}
