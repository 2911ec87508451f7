//! Center node resolution
//!
//! Strategies are consulted in a fixed priority order; the first one that
//! finds an ellipse center node wins:
//!
//! 1. The selected node itself
//! 2. The nearest ancestor of the selected node
//! 3. The first contributed instance in tree order

use async_trait::async_trait;
use ellipsekit_core::{NodeId, ProgramTreeService, ResolutionError, Result};

/// A single way of locating the ellipse center node
#[async_trait]
pub trait CenterNodeResolver: Send + Sync {
    /// Strategy name for diagnostics
    fn name(&self) -> &'static str;

    /// Look for a center node
    ///
    /// `Ok(None)` hands over to the next strategy. Tree service failures are
    /// returned as is and stop the chain.
    async fn resolve(
        &self,
        tree: &dyn ProgramTreeService,
        selected: Option<&NodeId>,
    ) -> Result<Option<NodeId>>;
}

/// Accepts the selected node when it is a center node
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectedNodeResolver;

#[async_trait]
impl CenterNodeResolver for SelectedNodeResolver {
    fn name(&self) -> &'static str {
        "selected"
    }

    async fn resolve(
        &self,
        tree: &dyn ProgramTreeService,
        selected: Option<&NodeId>,
    ) -> Result<Option<NodeId>> {
        let Some(id) = selected else {
            return Ok(None);
        };
        let node = tree.get_node(id).await?;
        Ok(node.is_ellipse_center().then(|| id.clone()))
    }
}

/// Walks the selected node's ancestors, nearest first
#[derive(Debug, Clone, Copy, Default)]
pub struct AncestorResolver;

#[async_trait]
impl CenterNodeResolver for AncestorResolver {
    fn name(&self) -> &'static str {
        "ancestor"
    }

    async fn resolve(
        &self,
        tree: &dyn ProgramTreeService,
        selected: Option<&NodeId>,
    ) -> Result<Option<NodeId>> {
        let Some(id) = selected else {
            return Ok(None);
        };
        let context = tree.subtree_context(id).await?;
        Ok(context
            .ancestors
            .into_iter()
            .find(|entry| entry.node.is_ellipse_center())
            .map(|entry| entry.id))
    }
}

/// Picks the first center node among all contributed instances
#[derive(Debug, Clone, Copy, Default)]
pub struct ContributedInstanceResolver;

#[async_trait]
impl CenterNodeResolver for ContributedInstanceResolver {
    fn name(&self) -> &'static str {
        "contributed-instance"
    }

    async fn resolve(
        &self,
        tree: &dyn ProgramTreeService,
        _selected: Option<&NodeId>,
    ) -> Result<Option<NodeId>> {
        let instances = tree.contributed_instances().await?;
        Ok(instances
            .into_iter()
            .find(|entry| entry.node.is_ellipse_center())
            .map(|entry| entry.id))
    }
}

/// Ordered chain of resolution strategies
pub struct ResolverChain {
    strategies: Vec<Box<dyn CenterNodeResolver>>,
}

impl ResolverChain {
    /// Empty chain; resolves nothing
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a strategy with the lowest priority so far
    pub fn with(mut self, strategy: impl CenterNodeResolver + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Strategy names in priority order
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve the center node
    ///
    /// Fails with [`ResolutionError::NotFound`] when every strategy comes up
    /// empty, or [`ResolutionError::NoSelection`] if additionally nothing was
    /// selected.
    pub async fn resolve(
        &self,
        tree: &dyn ProgramTreeService,
        selected: Option<&NodeId>,
    ) -> Result<NodeId> {
        for strategy in &self.strategies {
            if let Some(id) = strategy.resolve(tree, selected).await? {
                tracing::debug!(
                    strategy = strategy.name(),
                    center = %id,
                    "Resolved ellipse center node"
                );
                return Ok(id);
            }
            tracing::trace!(strategy = strategy.name(), "No center node");
        }

        let err = match selected {
            Some(id) => ResolutionError::NotFound {
                selected: id.clone(),
                tried: self.strategies.len(),
            },
            None => ResolutionError::NoSelection,
        };
        Err(err.into())
    }
}

impl Default for ResolverChain {
    fn default() -> Self {
        Self::empty()
            .with(SelectedNodeResolver)
            .with(AncestorResolver)
            .with(ContributedInstanceResolver)
    }
}

impl std::fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverChain")
            .field("strategies", &self.names())
            .finish()
    }
}
