//! Host service interfaces
//!
//! The hosting robot runtime owns the program tree, the move screen, and the
//! variable namespace. EllipseKit reaches them only through these traits;
//! every call is a suspension point that may interleave with UI-driven edits
//! of the same tree.

use crate::data::Waypoint;
use crate::error::Result;
use crate::event_bus::ProgramEvent;
use crate::program::{
    AddNode, NodeId, ProgramNode, RemoveNode, SubtreeContext, TreeEntry, Variable,
    VariableValueType,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What the move screen is capturing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MoveScreenTarget {
    /// Full waypoint (pose + joints)
    #[default]
    Waypoint,
    /// Pose only
    Pose,
}

/// Options passed when opening the move screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveScreenOptions {
    pub move_screen_target: MoveScreenTarget,
    /// Label shown to the user
    pub move_screen_target_label: String,
}

impl MoveScreenOptions {
    /// Capture a waypoint under the given label
    pub fn waypoint(label: impl Into<String>) -> Self {
        Self {
            move_screen_target: MoveScreenTarget::Waypoint,
            move_screen_target_label: label.into(),
        }
    }
}

/// Robot move service
#[async_trait]
pub trait MoveService: Send + Sync {
    /// Let the user jog the robot and capture a waypoint
    ///
    /// `Ok(None)` means the user cancelled.
    async fn open_move_screen(&self, options: &MoveScreenOptions) -> Result<Option<Waypoint>>;

    /// Move the robot to a stored waypoint
    async fn auto_move(&self, waypoint: &Waypoint) -> Result<()>;
}

/// Program tree service
#[async_trait]
pub trait ProgramTreeService: Send + Sync {
    /// Fetch a node by id
    async fn get_node(&self, id: &NodeId) -> Result<ProgramNode>;

    /// Ancestors (nearest first) and direct children of a node
    async fn subtree_context(&self, id: &NodeId) -> Result<SubtreeContext>;

    /// Every node contributed by this plugin, in tree order
    async fn contributed_instances(&self) -> Result<Vec<TreeEntry>>;

    /// Insert a node; returns the id the tree assigned
    async fn add_node(&self, request: AddNode) -> Result<NodeId>;

    /// Remove a node and its subtree
    async fn remove_node(&self, request: RemoveNode) -> Result<()>;

    /// Overwrite a node's stored contents
    async fn update_node(&self, id: &NodeId, node: ProgramNode) -> Result<()>;
}

/// Program variable naming service
#[async_trait]
pub trait SymbolService: Send + Sync {
    /// Reserve a unique variable name derived from `suggested`
    async fn generate_variable(
        &self,
        suggested: &str,
        value_type: VariableValueType,
    ) -> Result<Variable>;
}

/// Fire-and-forget change notification sink
pub trait ChangeNotifier: Send + Sync {
    /// Ask the host UI to redraw a node
    fn request_refresh(&self, node_id: &NodeId);

    /// Report a finer-grained change
    fn notify(&self, _event: ProgramEvent) {}
}

/// Notifier that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

impl ChangeNotifier for NoOpNotifier {
    fn request_refresh(&self, _node_id: &NodeId) {}
}

/// The set of host services handed to a presenter
#[derive(Clone)]
pub struct HostApi {
    pub move_service: Arc<dyn MoveService>,
    pub tree: Arc<dyn ProgramTreeService>,
    pub symbols: Arc<dyn SymbolService>,
    pub notifier: Arc<dyn ChangeNotifier>,
    /// Node currently selected in the host's program editor
    pub selected_node_id: Option<NodeId>,
}

impl HostApi {
    /// Bundle services with no selection and no change notifications
    pub fn new(
        move_service: Arc<dyn MoveService>,
        tree: Arc<dyn ProgramTreeService>,
        symbols: Arc<dyn SymbolService>,
    ) -> Self {
        Self {
            move_service,
            tree,
            symbols,
            notifier: Arc::new(NoOpNotifier),
            selected_node_id: None,
        }
    }

    /// Replace the change notifier
    pub fn with_notifier(mut self, notifier: Arc<dyn ChangeNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Set the selected node
    pub fn with_selection(mut self, node_id: NodeId) -> Self {
        self.selected_node_id = Some(node_id);
        self
    }
}

impl std::fmt::Debug for HostApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostApi")
            .field("selected_node_id", &self.selected_node_id)
            .finish_non_exhaustive()
    }
}
