//! Program node behaviors
//!
//! A behavior is the set of hooks the host calls for one node type: label,
//! factory, script generation, validation, and insertion policy. Only `label`
//! and `factory` are mandatory.

use ellipsekit_core::program::ELLIPSE_CENTER_NODE_VERSION;
use ellipsekit_core::{
    EllipseCenterParameters, Error, ProgramNode, Result, TreeEntry, Waypoint,
    ELLIPSE_CENTER_NODE_TYPE,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::script::ScriptBuilder;

/// Label of ellipse center nodes in the program tree
pub const ELLIPSE_CENTER_LABEL: &str = "Ellipse Program";

/// Where a node is being validated
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationContext {
    /// Ancestors of the node, nearest first
    pub ancestors: Vec<TreeEntry>,
}

/// Validator verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResponse {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }
}

/// Where a node is about to be inserted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertionContext {
    /// Type of the prospective parent, if any
    pub parent_type: Option<String>,
}

/// Hooks the host calls for one node type
pub trait ProgramBehavior: Send + Sync {
    /// Node type tag this behavior is registered for
    fn node_type(&self) -> &str;

    /// Text shown for the node in the program tree
    fn label(&self, node: &ProgramNode) -> String;

    /// A fresh node with default parameters
    fn factory(&self) -> Result<ProgramNode>;

    fn generate_code_before_children(&self, _node: &ProgramNode) -> Result<ScriptBuilder> {
        Ok(ScriptBuilder::new())
    }

    fn generate_code_after_children(&self, _node: &ProgramNode) -> Result<ScriptBuilder> {
        Ok(ScriptBuilder::new())
    }

    fn generate_preamble(&self, _node: &ProgramNode) -> Result<ScriptBuilder> {
        Ok(ScriptBuilder::new())
    }

    fn validate(&self, _node: &ProgramNode, _context: &ValidationContext) -> ValidationResponse {
        ValidationResponse::valid()
    }

    /// Whether a child of `child_type` may be inserted under `node`
    fn allows_child(&self, _node: &ProgramNode, _child_type: &str) -> bool {
        true
    }

    /// Whether the node may be inserted at this place
    fn allowed_in_context(&self, _context: &InsertionContext) -> bool {
        true
    }

    /// Migrate a node loaded from an older program
    fn upgrade(&self, loaded: ProgramNode) -> ProgramNode {
        loaded
    }
}

/// Behavior of the ellipse center node
#[derive(Debug, Clone, Copy, Default)]
pub struct EllipseCenterBehavior;

impl ProgramBehavior for EllipseCenterBehavior {
    fn node_type(&self) -> &str {
        ELLIPSE_CENTER_NODE_TYPE
    }

    fn label(&self, _node: &ProgramNode) -> String {
        ELLIPSE_CENTER_LABEL.to_string()
    }

    fn factory(&self) -> Result<ProgramNode> {
        ProgramNode::new(
            ELLIPSE_CENTER_NODE_TYPE,
            ELLIPSE_CENTER_NODE_VERSION,
            &EllipseCenterParameters {
                waypoint: Waypoint::empty(),
                is_defined: false,
            },
        )
    }

    /// Valid once the center has a nonzero X coordinate
    ///
    /// Narrower than the all-axes cancellation check used when capturing: a
    /// center at `(0, 0.4, 0.3)` is accepted by capture but reported invalid
    /// here.
    fn validate(&self, node: &ProgramNode, _context: &ValidationContext) -> ValidationResponse {
        match node.parameters_as::<EllipseCenterParameters>() {
            Ok(params) if params.waypoint.pose.position[0] != 0.0 => ValidationResponse::valid(),
            Ok(_) => ValidationResponse::invalid("center pose is not set"),
            Err(e) => ValidationResponse::invalid(format!("unreadable parameters: {}", e)),
        }
    }
}

/// Behaviors keyed by node type
#[derive(Clone, Default)]
pub struct BehaviorRegistry {
    behaviors: HashMap<String, Arc<dyn ProgramBehavior>>,
}

impl BehaviorRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the ellipse center behavior
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(EllipseCenterBehavior));
        registry
    }

    /// Register a behavior, replacing any previous one for the same type
    pub fn register(
        &mut self,
        behavior: Arc<dyn ProgramBehavior>,
    ) -> Option<Arc<dyn ProgramBehavior>> {
        let node_type = behavior.node_type().to_string();
        tracing::debug!(node_type = %node_type, "Registered program behavior");
        self.behaviors.insert(node_type, behavior)
    }

    pub fn get(&self, node_type: &str) -> Option<Arc<dyn ProgramBehavior>> {
        self.behaviors.get(node_type).cloned()
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.behaviors.contains_key(node_type)
    }

    /// Registered node types, sorted
    pub fn node_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.behaviors.keys().cloned().collect();
        types.sort();
        types
    }

    /// Create a fresh node of `node_type`
    pub fn create(&self, node_type: &str) -> Result<ProgramNode> {
        self.get(node_type)
            .ok_or_else(|| Error::other(format!("No behavior registered for '{}'", node_type)))?
            .factory()
    }

    /// Validate a node with its type's behavior; `None` for unknown types
    pub fn validate(
        &self,
        node: &ProgramNode,
        context: &ValidationContext,
    ) -> Option<ValidationResponse> {
        self.get(&node.node_type)
            .map(|behavior| behavior.validate(node, context))
    }

    /// Label of a node; unknown types fall back to the type tag
    pub fn label(&self, node: &ProgramNode) -> String {
        self.get(&node.node_type)
            .map(|behavior| behavior.label(node))
            .unwrap_or_else(|| node.node_type.clone())
    }
}

impl std::fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorRegistry")
            .field("node_types", &self.node_types())
            .finish()
    }
}
