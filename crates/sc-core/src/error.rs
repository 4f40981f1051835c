use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown vital sign field: {name}")]
    UnknownField { name: String },

    #[error("Value for {field} has the wrong kind (expected {expected})")]
    WrongValueKind {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Unknown access kind: {name}")]
    UnknownAccessKind { name: String },

    #[error("Node index out of range: {value}")]
    IndexOutOfRange { value: i64 },
}
