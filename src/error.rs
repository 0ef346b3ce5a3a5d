use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid {arg}: {reason}")]
    InvalidArgument { arg: &'static str, reason: String },
    #[error("{name} out of range: {reason}")]
    OutOfRange { name: &'static str, reason: String },
    #[error("unrecognised compare operator {0:?}")]
    InvalidOperator(String),
    #[error("cannot {action} a die whose minimum and maximum are equal")]
    InvalidDieAction { action: &'static str },
    #[error("{0}")]
    Syntax(#[from] crate::parse::SyntaxError),
    #[error("notation must be a non-empty string")]
    Notation,
    #[error("unrecognised import data: {0}")]
    DataFormat(String),
}

impl Error {
    pub(crate) fn invalid_argument(arg: &'static str, reason: impl ToString) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn out_of_range(name: &'static str, reason: impl ToString) -> Self {
        Self::OutOfRange {
            name,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn data_format(reason: impl ToString) -> Self {
        Self::DataFormat(reason.to_string())
    }
}
