//! Program event definitions.
//!
//! Events are cloneable and serializable so hosts can log or replay them.

use serde::{Deserialize, Serialize};

use crate::program::NodeId;

/// Root event enum for everything the synchronizer reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProgramEvent {
    /// Center waypoint persisted into the center node
    CenterSaved {
        /// The center node.
        node_id: NodeId,
        /// Saved position (m).
        position: [f64; 3],
    },
    /// A generated child was removed
    ChildRemoved {
        /// The center node.
        parent: NodeId,
        /// The removed child.
        child: NodeId,
    },
    /// A generated child was inserted
    ChildInserted {
        /// The center node.
        parent: NodeId,
        /// The inserted child.
        child: NodeId,
        /// Ring index of the child.
        index: usize,
    },
    /// A complete ring was written
    RingRegenerated {
        /// The center node.
        node_id: NodeId,
        /// Number of inserted points.
        points: usize,
    },
    /// A removed child was still listed after the settling delay
    VerificationMismatch {
        /// The center node.
        parent: NodeId,
        /// The child that is still present.
        child: NodeId,
    },
    /// The host UI should redraw the given node
    RefreshRequested {
        /// Node to refresh.
        node_id: NodeId,
    },
}

impl ProgramEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            ProgramEvent::CenterSaved { .. }
            | ProgramEvent::ChildRemoved { .. }
            | ProgramEvent::ChildInserted { .. } => EventCategory::Tree,
            ProgramEvent::RingRegenerated { .. } => EventCategory::Ring,
            ProgramEvent::VerificationMismatch { .. } => EventCategory::Diagnostics,
            ProgramEvent::RefreshRequested { .. } => EventCategory::Ui,
        }
    }

    /// Short description for logging
    pub fn description(&self) -> String {
        match self {
            ProgramEvent::CenterSaved { node_id, position } => {
                format!("Center of {} saved at {:?}", node_id, position)
            }
            ProgramEvent::ChildRemoved { parent, child } => {
                format!("Removed {} from {}", child, parent)
            }
            ProgramEvent::ChildInserted {
                parent,
                child,
                index,
            } => format!("Inserted point {} ({}) into {}", index, child, parent),
            ProgramEvent::RingRegenerated { node_id, points } => {
                format!("Ring of {} points written under {}", points, node_id)
            }
            ProgramEvent::VerificationMismatch { parent, child } => {
                format!("{} still listed under {} after removal", child, parent)
            }
            ProgramEvent::RefreshRequested { node_id } => format!("Refresh {}", node_id),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Tree mutations.
    Tree,
    /// Ring lifecycle.
    Ring,
    /// Warnings and verification results.
    Diagnostics,
    /// UI refresh requests.
    Ui,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Tree => write!(f, "Tree"),
            EventCategory::Ring => write!(f, "Ring"),
            EventCategory::Diagnostics => write!(f, "Diagnostics"),
            EventCategory::Ui => write!(f, "Ui"),
        }
    }
}
