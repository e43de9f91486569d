use crate::backup::result_error::{WithJobContext, WithMsg};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    SerdeYml(#[from] serde_yml::Error),
    #[error("{}:\n{}", msg, indent::indent_all_with("  ", error.to_string()))]
    WithMsg { msg: String, error: Box<Error> },
    #[error("job {:?} {} failed:\n{}", label, operation, indent::indent_all_with("  ", error.to_string()))]
    WithJobContext {
        error: Box<Error>,
        label: String,
        operation: String,
    },
}

impl<L: Into<String>, S: Into<String>> WithJobContext<L, S> for Error {
    fn with_job_context(self, label: L, operation: S) -> Self {
        Error::WithJobContext {
            error: Box::new(self),
            label: label.into(),
            operation: operation.into(),
        }
    }
}

impl<S: Into<String>> WithMsg<S> for Error {
    fn with_msg(self, msg: S) -> Self {
        Self::WithMsg {
            msg: msg.into(),
            error: Box::new(self),
        }
    }
}
