//! In-memory program tree

use async_trait::async_trait;
use ellipsekit_core::{
    AddNode, Insertion, NodeId, ProgramNode, ProgramTreeService, RemoveNode, Result,
    SubtreeContext, TreeEntry, TreeError, ELLIPSE_CENTER_NODE_TYPE,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// One call received through [`ProgramTreeService`]
#[derive(Debug, Clone, PartialEq)]
pub enum TreeCall {
    GetNode(NodeId),
    SubtreeContext(NodeId),
    ContributedInstances,
    AddNode {
        pivot: NodeId,
        insertion: Insertion,
        node_type: String,
    },
    RemoveNode(NodeId),
    UpdateNode(NodeId),
}

impl TreeCall {
    /// True for calls that change the tree
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::AddNode { .. } | Self::RemoveNode(_) | Self::UpdateNode(_)
        )
    }
}

/// Injected misbehavior
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeFaults {
    /// Reject the `add_node` call with this 0-based index
    pub fail_insert_at: Option<usize>,
    /// Accept removals without removing anything
    pub ignore_removals: bool,
    /// Reject every `update_node`
    pub fail_updates: bool,
    /// Accepted removals only take effect this long after the call
    pub removal_lag: Option<Duration>,
}

#[derive(Debug, Clone)]
struct Slot {
    node: ProgramNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Default)]
struct TreeState {
    slots: HashMap<NodeId, Slot>,
    roots: Vec<NodeId>,
    calls: Vec<TreeCall>,
    faults: TreeFaults,
    add_calls: usize,
    pending_removals: Vec<(Instant, NodeId)>,
}

impl TreeState {
    fn slot(&self, id: &NodeId) -> Result<&Slot> {
        self.slots
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound { id: id.clone() }.into())
    }

    fn entry(&self, id: &NodeId) -> Option<TreeEntry> {
        self.slots.get(id).map(|slot| TreeEntry {
            id: id.clone(),
            node: slot.node.clone(),
        })
    }

    fn siblings_mut(&mut self, parent: Option<&NodeId>) -> Option<&mut Vec<NodeId>> {
        match parent {
            Some(p) => self.slots.get_mut(p).map(|slot| &mut slot.children),
            None => Some(&mut self.roots),
        }
    }

    fn attach(&mut self, id: NodeId, node: ProgramNode, parent: Option<NodeId>, at: usize) {
        if let Some(siblings) = self.siblings_mut(parent.as_ref()) {
            let at = at.min(siblings.len());
            siblings.insert(at, id.clone());
        }
        self.slots.insert(
            id,
            Slot {
                node,
                parent,
                children: Vec::new(),
            },
        );
    }

    fn detach(&mut self, id: &NodeId) {
        let Some(slot) = self.slots.remove(id) else {
            return;
        };
        if let Some(siblings) = self.siblings_mut(slot.parent.as_ref()) {
            siblings.retain(|c| c != id);
        }
        for child in slot.children {
            self.detach(&child);
        }
    }

    fn apply_due_removals(&mut self) {
        if self.pending_removals.is_empty() {
            return;
        }
        let now = Instant::now();
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending_removals)
            .into_iter()
            .partition(|(at, _)| *at <= now);
        self.pending_removals = pending;
        for (_, id) in due {
            self.detach(&id);
        }
    }

    fn preorder(&self, ids: &[NodeId], out: &mut Vec<NodeId>) {
        for id in ids {
            out.push(id.clone());
            if let Some(slot) = self.slots.get(id) {
                self.preorder(&slot.children, out);
            }
        }
    }
}

/// Program tree kept in memory
///
/// Records every service call and can be told to misbehave. Setup helpers
/// (`add_root`, `insert_child`) are not recorded.
#[derive(Debug)]
pub struct InMemoryProgramTree {
    state: RwLock<TreeState>,
    contributed_types: Vec<String>,
}

impl InMemoryProgramTree {
    /// Empty tree contributing ellipse center nodes
    pub fn new() -> Self {
        Self {
            state: RwLock::new(TreeState::default()),
            contributed_types: vec![ELLIPSE_CENTER_NODE_TYPE.to_string()],
        }
    }

    /// Add a top-level node
    pub fn add_root(&self, node: ProgramNode) -> NodeId {
        let id = NodeId::generate();
        let mut state = self.state.write();
        let at = state.roots.len();
        state.attach(id.clone(), node, None, at);
        id
    }

    /// Append a child during setup
    pub fn insert_child(&self, parent: &NodeId, node: ProgramNode) -> Result<NodeId> {
        let mut state = self.state.write();
        let at = state.slot(parent)?.children.len();
        let id = NodeId::generate();
        state.attach(id.clone(), node, Some(parent.clone()), at);
        Ok(id)
    }

    pub fn set_faults(&self, faults: TreeFaults) {
        self.state.write().faults = faults;
    }

    pub fn faults(&self) -> TreeFaults {
        self.state.read().faults.clone()
    }

    /// Copy of a stored node
    pub fn node(&self, id: &NodeId) -> Option<ProgramNode> {
        self.settle();
        self.state.read().slots.get(id).map(|slot| slot.node.clone())
    }

    /// Child ids in order; empty for unknown nodes
    pub fn children(&self, id: &NodeId) -> Vec<NodeId> {
        self.settle();
        self.state
            .read()
            .slots
            .get(id)
            .map(|slot| slot.children.clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.settle();
        self.state.read().slots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.state.read().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().slots.is_empty()
    }

    /// Every recorded call, oldest first
    pub fn calls(&self) -> Vec<TreeCall> {
        self.state.read().calls.clone()
    }

    /// Recorded calls that change the tree
    pub fn mutations(&self) -> Vec<TreeCall> {
        self.state
            .read()
            .calls
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.write().calls.clear();
    }

    fn record(&self, call: TreeCall) {
        let mut state = self.state.write();
        state.apply_due_removals();
        state.calls.push(call);
    }

    fn settle(&self) {
        self.state.write().apply_due_removals();
    }
}

impl Default for InMemoryProgramTree {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgramTreeService for InMemoryProgramTree {
    async fn get_node(&self, id: &NodeId) -> Result<ProgramNode> {
        self.record(TreeCall::GetNode(id.clone()));
        Ok(self.state.read().slot(id)?.node.clone())
    }

    async fn subtree_context(&self, id: &NodeId) -> Result<SubtreeContext> {
        self.record(TreeCall::SubtreeContext(id.clone()));
        let state = self.state.read();
        let slot = state.slot(id)?;

        let mut ancestors = Vec::new();
        let mut parent = slot.parent.clone();
        while let Some(p) = parent {
            let Some(entry) = state.entry(&p) else { break };
            parent = state.slots.get(&p).and_then(|s| s.parent.clone());
            ancestors.push(entry);
        }

        let children = slot
            .children
            .iter()
            .filter_map(|c| state.entry(c))
            .collect();

        Ok(SubtreeContext {
            ancestors,
            children,
        })
    }

    async fn contributed_instances(&self) -> Result<Vec<TreeEntry>> {
        self.record(TreeCall::ContributedInstances);
        let state = self.state.read();
        let mut order = Vec::new();
        state.preorder(&state.roots, &mut order);
        Ok(order
            .iter()
            .filter_map(|id| state.entry(id))
            .filter(|e| self.contributed_types.iter().any(|t| e.node.is_type(t)))
            .collect())
    }

    async fn add_node(&self, request: AddNode) -> Result<NodeId> {
        self.record(TreeCall::AddNode {
            pivot: request.pivot_node_id.clone(),
            insertion: request.insertion,
            node_type: request.node.node_type.clone(),
        });

        let mut state = self.state.write();
        let call_index = state.add_calls;
        state.add_calls += 1;

        if state.faults.fail_insert_at == Some(call_index) {
            return Err(TreeError::InsertRejected {
                pivot: request.pivot_node_id,
                reason: format!("injected failure at insert {}", call_index),
            }
            .into());
        }

        let pivot = state.slot(&request.pivot_node_id)?;
        let (parent, at) = match request.insertion {
            Insertion::IntoFirst => (Some(request.pivot_node_id.clone()), 0),
            Insertion::IntoLast => (Some(request.pivot_node_id.clone()), pivot.children.len()),
            Insertion::Before | Insertion::After => {
                let parent = pivot.parent.clone();
                let siblings = match &parent {
                    Some(p) => &state.slot(p)?.children,
                    None => &state.roots,
                };
                let pos = siblings
                    .iter()
                    .position(|s| s == &request.pivot_node_id)
                    .unwrap_or(siblings.len());
                let at = if request.insertion == Insertion::After {
                    pos + 1
                } else {
                    pos
                };
                (parent, at)
            }
        };

        let id = NodeId::generate();
        state.attach(id.clone(), request.node, parent, at);
        Ok(id)
    }

    async fn remove_node(&self, request: RemoveNode) -> Result<()> {
        self.record(TreeCall::RemoveNode(request.node_id.clone()));
        let mut state = self.state.write();
        state.slot(&request.node_id)?;
        if state.faults.ignore_removals {
            return Ok(());
        }
        if let Some(lag) = state.faults.removal_lag {
            state.pending_removals.push((Instant::now() + lag, request.node_id));
            return Ok(());
        }
        state.detach(&request.node_id);
        Ok(())
    }

    async fn update_node(&self, id: &NodeId, node: ProgramNode) -> Result<()> {
        self.record(TreeCall::UpdateNode(id.clone()));
        let mut state = self.state.write();
        if state.faults.fail_updates {
            return Err(TreeError::UpdateRejected {
                id: id.clone(),
                reason: "injected failure".to_string(),
            }
            .into());
        }
        let slot = state
            .slots
            .get_mut(id)
            .ok_or_else(|| TreeError::NodeNotFound { id: id.clone() })?;
        slot.node = node;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(node_type: &str) -> ProgramNode {
        ProgramNode::new(node_type, "1.0.0", &json!({})).unwrap()
    }

    fn add(pivot: &NodeId, insertion: Insertion, node_type: &str) -> AddNode {
        AddNode {
            pivot_node_id: pivot.clone(),
            insertion,
            node: node(node_type),
            change_selection: false,
        }
    }

    #[tokio::test]
    async fn test_insertion_positions() {
        let tree = InMemoryProgramTree::new();
        let root = tree.add_root(node("folder"));

        let b = tree.add_node(add(&root, Insertion::IntoLast, "b")).await.unwrap();
        let a = tree.add_node(add(&root, Insertion::IntoFirst, "a")).await.unwrap();
        let d = tree.add_node(add(&b, Insertion::After, "d")).await.unwrap();
        let c = tree.add_node(add(&d, Insertion::Before, "c")).await.unwrap();

        assert_eq!(tree.children(&root), vec![a, b, c, d]);
        assert_eq!(tree.mutations().len(), 4);
    }

    #[tokio::test]
    async fn test_subtree_context() {
        let tree = InMemoryProgramTree::new();
        let root = tree.add_root(node("folder"));
        let center = tree.insert_child(&root, node(ELLIPSE_CENTER_NODE_TYPE)).unwrap();
        let leaf = tree.insert_child(&center, node("move-to")).unwrap();

        let ctx = tree.subtree_context(&leaf).await.unwrap();
        let ancestors: Vec<_> = ctx.ancestors.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ancestors, vec![center.clone(), root]);
        assert!(ctx.children.is_empty());

        let ctx = tree.subtree_context(&center).await.unwrap();
        assert_eq!(ctx.child_ids(), vec![leaf]);
        assert!(tree.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_remove_subtree() {
        let tree = InMemoryProgramTree::new();
        let root = tree.add_root(node("folder"));
        let center = tree.insert_child(&root, node(ELLIPSE_CENTER_NODE_TYPE)).unwrap();
        tree.insert_child(&center, node("move-to")).unwrap();

        tree.remove_node(RemoveNode {
            node_id: center.clone(),
            change_selection: false,
        })
        .await
        .unwrap();

        assert_eq!(tree.len(), 1);
        assert!(tree.children(&root).is_empty());
    }

    #[tokio::test]
    async fn test_contributed_instances_in_tree_order() {
        let tree = InMemoryProgramTree::new();
        let first = tree.add_root(node("folder"));
        let nested = tree.insert_child(&first, node(ELLIPSE_CENTER_NODE_TYPE)).unwrap();
        let top = tree.add_root(node(ELLIPSE_CENTER_NODE_TYPE));

        let ids: Vec<_> = tree
            .contributed_instances()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![nested, top]);
    }

    #[tokio::test]
    async fn test_faults() {
        let tree = InMemoryProgramTree::new();
        let root = tree.add_root(node("folder"));
        let child = tree.insert_child(&root, node("move-to")).unwrap();
        tree.set_faults(TreeFaults {
            fail_insert_at: Some(1),
            ignore_removals: true,
            fail_updates: true,
            ..Default::default()
        });

        assert!(tree.add_node(add(&root, Insertion::IntoLast, "x")).await.is_ok());
        let err = tree
            .add_node(add(&root, Insertion::IntoLast, "y"))
            .await
            .unwrap_err();
        assert!(err.is_mutation_error());

        tree.remove_node(RemoveNode {
            node_id: child.clone(),
            change_selection: false,
        })
        .await
        .unwrap();
        assert!(tree.contains(&child));

        let err = tree.update_node(&root, node("folder")).await.unwrap_err();
        assert!(err.is_mutation_error());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lagging_removal() {
        let tree = InMemoryProgramTree::new();
        let root = tree.add_root(node("folder"));
        let child = tree.insert_child(&root, node("move-to")).unwrap();
        tree.set_faults(TreeFaults {
            removal_lag: Some(Duration::from_millis(40)),
            ..Default::default()
        });

        tree.remove_node(RemoveNode {
            node_id: child.clone(),
            change_selection: false,
        })
        .await
        .unwrap();
        assert!(tree.contains(&child));

        tokio::time::sleep(Duration::from_millis(40)).await;
        let ctx = tree.subtree_context(&root).await.unwrap();
        assert!(ctx.children.is_empty());
        assert!(!tree.contains(&child));
    }

    #[tokio::test]
    async fn test_unknown_node() {
        let tree = InMemoryProgramTree::new();
        let err = tree.get_node(&NodeId::from("nope")).await.unwrap_err();
        assert!(!err.is_mutation_error());
        assert_eq!(tree.calls(), vec![TreeCall::GetNode(NodeId::from("nope"))]);
    }
}
