//! Network-specific error types.

use hf_core::{ElementId, HfError};
use thiserror::Error;

use crate::element::ElementKind;

pub type NetworkResult<T> = Result<T, NetworkError>;

/// Structural rejections from connect, configure and delete operations.
///
/// Every operation returning one of these leaves the network untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Element {id} is not part of this network")]
    UnknownElement { id: ElementId },

    #[error("No element named '{name}'")]
    NotFound { name: String },

    #[error("{kind} '{name}' does not support {op}")]
    WrongKind {
        name: String,
        kind: ElementKind,
        op: &'static str,
    },

    #[error("{kind} '{name}' has {arity} output slot(s), slot {slot} does not exist")]
    SlotOutOfRange {
        name: String,
        kind: ElementKind,
        slot: usize,
        arity: usize,
    },

    #[error("Output slot {slot} of '{name}' is already connected")]
    SlotOccupied { name: String, slot: usize },

    #[error("Source '{name}' has no input and cannot be connected downstream")]
    NoInput { name: String },

    #[error("'{name}' already has an upstream connection")]
    AlreadyConnected { name: String },

    #[error("'{name}' cannot be connected to itself")]
    SelfLoop { name: String },

    #[error("'{name}' expects {expected} proportions, got {got}")]
    ProportionCount {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("Multisplit '{name}' needs at least one output")]
    NoOutputSlots { name: String },

    #[error("{kind} '{name}' is an endpoint and cannot be removed")]
    EndpointNotRemovable { name: String, kind: ElementKind },

    #[error("'{name}' feeds {connected} downstream elements and cannot be removed")]
    BranchNotRemovable { name: String, connected: usize },

    #[error("'{name}' is stored before its upstream '{upstream}'")]
    OutOfOrder { name: String, upstream: String },

    #[error("Network cannot hold more than {len} elements")]
    ArenaFull { len: usize },

    #[error(transparent)]
    Core(#[from] HfError),
}

impl From<NetworkError> for HfError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::Core(inner) => inner,
            other => HfError::Topology {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = NetworkError::SlotOutOfRange {
            name: "sp".into(),
            kind: ElementKind::Split,
            slot: 2,
            arity: 2,
        };
        assert_eq!(
            err.to_string(),
            "Split 'sp' has 2 output slot(s), slot 2 does not exist"
        );
    }

    #[test]
    fn error_conversion() {
        let err = NetworkError::NotFound { name: "x".into() };
        let core: HfError = err.into();
        assert!(matches!(core, HfError::Topology { .. }));

        let negative = HfError::Negative {
            what: "production",
            value: -2.0,
        };
        let wrapped = NetworkError::from(negative.clone());
        let core: HfError = wrapped.into();
        assert_eq!(core, negative);
    }
}
