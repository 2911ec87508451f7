//! Error handling for EllipseKit
//!
//! Provides error types for every collaborator the ring synchronizer talks to:
//! - Resolution errors (no center node could be located)
//! - Tree errors (program tree rejected a read or mutation)
//! - Symbol errors (variable naming service failed)
//! - Move errors (move screen / auto-move failed)
//!
//! User cancellation and verification mismatches are not errors and never
//! appear here.

use crate::program::NodeId;
use thiserror::Error;

/// Center node resolution error
///
/// Raised when none of the resolution strategies finds an ellipse center node.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    /// The host reports no selected node
    #[error("No program node is selected")]
    NoSelection,

    /// Every strategy was tried without finding a center node
    #[error("No ellipse center node found (selected: {selected}, strategies tried: {tried})")]
    NotFound {
        /// The node that was selected when resolution started.
        selected: NodeId,
        /// Number of strategies that were consulted.
        tried: usize,
    },
}

/// Program tree error type
///
/// Represents rejections from the host's program tree service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    /// Node id is not present in the tree
    #[error("Node not found: {id}")]
    NodeNotFound {
        /// The missing node id.
        id: NodeId,
    },

    /// An insertion was rejected
    #[error("Insert under {pivot} rejected: {reason}")]
    InsertRejected {
        /// The pivot node of the insertion.
        pivot: NodeId,
        /// The reason given by the tree service.
        reason: String,
    },

    /// A removal was rejected
    #[error("Removal of {id} rejected: {reason}")]
    RemoveRejected {
        /// The node that could not be removed.
        id: NodeId,
        /// The reason given by the tree service.
        reason: String,
    },

    /// A parameter update was rejected
    #[error("Update of {id} rejected: {reason}")]
    UpdateRejected {
        /// The node that could not be updated.
        id: NodeId,
        /// The reason given by the tree service.
        reason: String,
    },
}

/// Symbol naming error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymbolError {
    /// The naming service could not produce a variable
    #[error("Failed to generate variable for '{suggested}': {reason}")]
    GenerationFailed {
        /// The suggested variable name.
        suggested: String,
        /// The reason given by the naming service.
        reason: String,
    },
}

/// Robot move service error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoveError {
    /// The move screen could not be opened
    #[error("Move screen failed: {reason}")]
    MoveScreenFailed {
        /// The reason the move screen failed.
        reason: String,
    },

    /// Auto-move to a waypoint failed
    #[error("Auto move failed: {reason}")]
    AutoMoveFailed {
        /// The reason the auto move failed.
        reason: String,
    },
}

/// Main error type for EllipseKit
///
/// A unified error type covering all collaborators. This is the primary
/// error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Center node resolution error
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Program tree error
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Symbol naming error
    #[error(transparent)]
    Symbol(#[from] SymbolError),

    /// Move service error
    #[error(transparent)]
    Move(#[from] MoveError),

    /// Parameter (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a resolution error
    pub fn is_resolution_error(&self) -> bool {
        matches!(self, Error::Resolution(_))
    }

    /// Check if this error came from a rejected tree mutation
    pub fn is_mutation_error(&self) -> bool {
        matches!(
            self,
            Error::Tree(
                TreeError::InsertRejected { .. }
                    | TreeError::RemoveRejected { .. }
                    | TreeError::UpdateRejected { .. }
            )
        )
    }

    /// Check if this is a symbol naming error
    pub fn is_symbol_error(&self) -> bool {
        matches!(self, Error::Symbol(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
