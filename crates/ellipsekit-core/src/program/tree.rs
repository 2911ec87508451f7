//! Program tree request and response shapes

use super::node::{NodeId, ProgramNode};
use serde::{Deserialize, Serialize};

/// A node together with its id, as returned by tree queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub id: NodeId,
    pub node: ProgramNode,
}

/// Ancestors (nearest first) and direct children (in tree order) of a node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubtreeContext {
    pub ancestors: Vec<TreeEntry>,
    pub children: Vec<TreeEntry>,
}

impl SubtreeContext {
    /// Ids of the direct children, in tree order
    pub fn child_ids(&self) -> Vec<NodeId> {
        self.children.iter().map(|c| c.id.clone()).collect()
    }

    /// Id of the last child, if any
    pub fn last_child_id(&self) -> Option<&NodeId> {
        self.children.last().map(|c| &c.id)
    }
}

/// Where a new node goes relative to the pivot node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Insertion {
    /// First child of the pivot
    IntoFirst,
    /// Last child of the pivot
    IntoLast,
    /// Sibling before the pivot
    Before,
    /// Sibling after the pivot
    After,
}

/// Insertion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddNode {
    pub pivot_node_id: NodeId,
    pub insertion: Insertion,
    pub node: ProgramNode,
    /// Move the host's selection to the new node
    pub change_selection: bool,
}

/// Removal request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveNode {
    pub node_id: NodeId,
    pub change_selection: bool,
}
