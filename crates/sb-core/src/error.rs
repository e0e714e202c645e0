use crate::id::NodeId;
use crate::property::PropertyName;
use thiserror::Error;

/// Why an editing operation was not applied.
///
/// Nothing here is fatal: the host may surface the error or ignore it, and
/// the document is left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("unknown property `{0}`")]
    UnknownProperty(String),

    #[error("invalid value {value:?} for `{name}`")]
    InvalidValue { name: PropertyName, value: String },

    #[error("unknown element type `{0}`")]
    UnknownElementType(String),

    #[error("nothing is selected")]
    NoSelection,

    #[error("no history entry in that direction")]
    HistoryBoundary,

    #[error("no drag in progress")]
    NoActiveDrag,
}

pub type EditResult<T> = Result<T, EditError>;
