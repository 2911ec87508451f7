//! Program tree model: nodes, move-to commands, and tree requests

pub mod move_to;
pub mod node;
pub mod tree;

pub use move_to::{
    AdvancedSettings, BlendSettings, MoveToCommand, MoveType, PoseInput, SpeedSettings,
    TransformSettings, Variable, VariableValueType, WaypointInput, MOVE_TO_NODE_VERSION,
};
pub use node::{
    EllipseCenterParameters, NodeId, ProgramNode, ELLIPSE_CENTER_NODE_TYPE,
    ELLIPSE_CENTER_NODE_VERSION, MOVE_TO_NODE_TYPE,
};
pub use tree::{AddNode, Insertion, RemoveNode, SubtreeContext, TreeEntry};
