//! Program tree nodes
//!
//! Nodes are owned by the host's tree store. EllipseKit only ever holds
//! copies for the duration of a single operation.

use crate::data::Waypoint;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Type tag of the ellipse center node contributed by this plugin
pub const ELLIPSE_CENTER_NODE_TYPE: &str = "ellipsekit-ellipse-center";
/// Type tag of the host's built-in move-to node
pub const MOVE_TO_NODE_TYPE: &str = "move-to";
/// Schema version written by the node factory
pub const ELLIPSE_CENTER_NODE_VERSION: &str = "1.0.0";

/// Unique program node identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A node as stored in the host program tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramNode {
    /// Node type tag
    #[serde(rename = "type")]
    pub node_type: String,
    /// Schema version of `parameters`
    pub version: String,
    /// Whether the host forbids editing children
    #[serde(default)]
    pub lock_children: bool,
    /// Whether users may drop children into this node
    #[serde(default)]
    pub allows_children: bool,
    /// Node-type specific parameter bag
    #[serde(default)]
    pub parameters: serde_json::Value,
}

impl ProgramNode {
    /// Create a node with the given typed parameters
    pub fn new<P: Serialize>(
        node_type: impl Into<String>,
        version: impl Into<String>,
        parameters: &P,
    ) -> Result<Self> {
        Ok(Self {
            node_type: node_type.into(),
            version: version.into(),
            lock_children: false,
            allows_children: false,
            parameters: serde_json::to_value(parameters)?,
        })
    }

    /// Check the node's type tag
    pub fn is_type(&self, node_type: &str) -> bool {
        self.node_type == node_type
    }

    /// True for ellipse center nodes
    pub fn is_ellipse_center(&self) -> bool {
        self.is_type(ELLIPSE_CENTER_NODE_TYPE)
    }

    /// Decode the parameter bag
    pub fn parameters_as<P: DeserializeOwned>(&self) -> Result<P> {
        Ok(serde_json::from_value(self.parameters.clone())?)
    }

    /// Replace the parameter bag
    pub fn set_parameters<P: Serialize>(&mut self, parameters: &P) -> Result<()> {
        self.parameters = serde_json::to_value(parameters)?;
        Ok(())
    }
}

/// Parameters of the ellipse center node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EllipseCenterParameters {
    /// The ellipse center
    pub waypoint: Waypoint,
    /// Set once a center pose has been captured
    #[serde(default)]
    pub is_defined: bool,
}
