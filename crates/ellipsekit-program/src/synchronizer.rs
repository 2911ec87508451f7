//! Ring synchronizer
//!
//! Keeps the children of an ellipse center node in step with its center
//! waypoint. One run walks
//! `Idle → AwaitingCenterPose → Validating → Clearing → Inserting → Verifying → Idle`,
//! or ends in `Failed` on the first unrecoverable error.
//!
//! Every tree call is awaited before the next one is issued, and runs are
//! serialized, so at most one tree mutation from this synchronizer is in
//! flight at any time. The captured waypoint is held as a local value and
//! written to the center node before any child is generated; the tree copy is
//! never read back during a run.

use ellipsekit_core::{
    AddNode, EllipseCenterParameters, EllipseParameters, Error, HostApi, Insertion,
    MoveScreenOptions, NodeId, ProgramEvent, RemoveNode, Result, Waypoint,
};
use ellipsekit_ring::{MotionSettings, MoveToCommandBuilder, RingOffsets};
use ellipsekit_settings::{ClearPolicy, Config, SyncSettings};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::resolver::ResolverChain;

/// Synchronizer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SyncState {
    #[default]
    Idle,
    AwaitingCenterPose,
    Validating,
    Clearing,
    Inserting,
    Verifying,
    /// The last run stopped on an error; the next run starts over
    Failed,
}

impl SyncState {
    /// True while a run is in progress
    pub fn is_busy(&self) -> bool {
        !matches!(self, Self::Idle | Self::Failed)
    }
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::AwaitingCenterPose => "awaiting center pose",
            Self::Validating => "validating",
            Self::Clearing => "clearing",
            Self::Inserting => "inserting",
            Self::Verifying => "verifying",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Non-fatal findings of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncWarning {
    /// A removed child was still listed after the settling delay
    DeletionNotVerified { parent: NodeId, child: NodeId },
}

impl std::fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeletionNotVerified { parent, child } => {
                write!(f, "child {} of {} still present after removal", child, parent)
            }
        }
    }
}

/// Result of a single clearing step
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClearStep {
    /// The child a removal was issued for; `None` if there were no children
    pub removed: Option<NodeId>,
    pub warning: Option<SyncWarning>,
}

/// What a completed run changed
#[derive(Debug, Clone, PartialEq)]
pub struct RingReport {
    pub center_id: NodeId,
    /// The waypoint that was saved and generated around
    pub center: Waypoint,
    /// Children a removal was issued for, in issue order
    pub removed: Vec<NodeId>,
    /// Inserted ring children, in ring order
    pub inserted: Vec<NodeId>,
    pub warnings: Vec<SyncWarning>,
}

impl RingReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Outcome of an edit
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Capture was cancelled; nothing was touched
    NoChange,
    Regenerated(RingReport),
}

impl SyncOutcome {
    pub fn report(&self) -> Option<&RingReport> {
        match self {
            Self::NoChange => None,
            Self::Regenerated(report) => Some(report),
        }
    }
}

/// Regenerates the ring of an ellipse center node
pub struct RingSynchronizer {
    host: HostApi,
    params: EllipseParameters,
    settings: SyncSettings,
    resolvers: ResolverChain,
    builder: MoveToCommandBuilder,
    state: Arc<RwLock<SyncState>>,
    run_lock: Mutex<()>,
}

impl RingSynchronizer {
    /// Create a synchronizer with the default resolver chain
    pub fn new(host: HostApi, config: &Config) -> Self {
        Self::with_resolvers(host, config, ResolverChain::default())
    }

    /// Create a synchronizer with a custom resolver chain
    pub fn with_resolvers(host: HostApi, config: &Config, resolvers: ResolverChain) -> Self {
        let motion = MotionSettings::from_parameters(&config.ring, config.sync.move_type);
        let builder = MoveToCommandBuilder::new(host.symbols.clone(), motion);
        Self {
            host,
            params: config.ring.clone(),
            settings: config.sync.clone(),
            resolvers,
            builder,
            state: Arc::new(RwLock::new(SyncState::Idle)),
            run_lock: Mutex::new(()),
        }
    }

    /// Current state
    pub fn state(&self) -> SyncState {
        *self.state.read()
    }

    pub fn parameters(&self) -> &EllipseParameters {
        &self.params
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn host(&self) -> &HostApi {
        &self.host
    }

    /// Resolve the center node for the host's current selection
    pub async fn resolve_center(&self) -> Result<NodeId> {
        self.resolvers
            .resolve(self.host.tree.as_ref(), self.host.selected_node_id.as_ref())
            .await
    }

    /// Capture a new center on the move screen and regenerate the ring
    ///
    /// Cancelling the capture is not an error: it returns
    /// [`SyncOutcome::NoChange`] without touching the tree.
    pub async fn edit_center(&self) -> Result<SyncOutcome> {
        let _run = self.run_lock.lock().await;

        self.transition(SyncState::AwaitingCenterPose);
        let options = MoveScreenOptions::waypoint(self.settings.move_screen_label.clone());
        let captured = match self.host.move_service.open_move_screen(&options).await {
            Ok(captured) => captured,
            Err(e) => return Err(self.fail(e, None, None, &[], &[]).await),
        };

        match captured {
            Some(waypoint) => self.run(waypoint).await,
            None => {
                tracing::info!("Move screen cancelled, ring unchanged");
                self.transition(SyncState::Idle);
                Ok(SyncOutcome::NoChange)
            }
        }
    }

    /// Regenerate the ring around an already captured waypoint
    pub async fn apply_center(&self, waypoint: Waypoint) -> Result<SyncOutcome> {
        let _run = self.run_lock.lock().await;
        self.run(waypoint).await
    }

    /// Remove the last child of `center_id`, wait, and check it is gone
    ///
    /// Hosts wanting a full reset call this once per remaining child.
    pub async fn clear_last_child(&self, center_id: &NodeId) -> Result<ClearStep> {
        let _run = self.run_lock.lock().await;
        self.clear_step(center_id).await
    }

    async fn run(&self, waypoint: Waypoint) -> Result<SyncOutcome> {
        self.transition(SyncState::Validating);
        if waypoint.is_cancellation_sentinel() {
            tracing::info!(
                waypoint = %waypoint,
                "Captured position is all zero, treating as cancelled"
            );
            self.transition(SyncState::Idle);
            return Ok(SyncOutcome::NoChange);
        }

        self.transition(SyncState::Clearing);
        let center_id = match self.resolve_center().await {
            Ok(id) => id,
            Err(e) => return Err(self.fail(e, None, Some(&waypoint), &[], &[]).await),
        };

        let mut report = RingReport {
            center_id: center_id.clone(),
            center: waypoint,
            removed: Vec::new(),
            inserted: Vec::new(),
            warnings: Vec::new(),
        };

        if let Err(e) = self.clear(&mut report).await {
            return Err(self.fail_run(e, &report).await);
        }

        self.transition(SyncState::Inserting);
        if let Err(e) = self.save_center(&center_id, &report.center).await {
            return Err(self.fail_run(e, &report).await);
        }
        if let Err(e) = self.insert_ring(&mut report).await {
            return Err(self.fail_run(e, &report).await);
        }

        self.transition(SyncState::Verifying);
        self.host.notifier.notify(ProgramEvent::RingRegenerated {
            node_id: center_id.clone(),
            points: report.inserted.len(),
        });
        self.host.notifier.request_refresh(&center_id);

        tracing::info!(
            center = %center_id,
            points = report.inserted.len(),
            removed = report.removed.len(),
            warnings = report.warnings.len(),
            "Ring regenerated"
        );
        self.transition(SyncState::Idle);
        Ok(SyncOutcome::Regenerated(report))
    }

    async fn clear(&self, report: &mut RingReport) -> Result<()> {
        let rounds = match self.settings.clear_policy {
            ClearPolicy::LastChild => 1,
            ClearPolicy::AllChildren => self
                .host
                .tree
                .subtree_context(&report.center_id)
                .await?
                .children
                .len(),
        };

        for _ in 0..rounds {
            let step = self.clear_step(&report.center_id).await?;
            match step.removed {
                Some(id) => report.removed.push(id),
                None => break,
            }
            report.warnings.extend(step.warning);
        }
        Ok(())
    }

    async fn clear_step(&self, center_id: &NodeId) -> Result<ClearStep> {
        let tree = self.host.tree.as_ref();

        let context = tree.subtree_context(center_id).await?;
        let Some(last) = context.last_child_id().cloned() else {
            tracing::debug!(center = %center_id, "No children to clear");
            return Ok(ClearStep::default());
        };

        tracing::debug!(
            center = %center_id,
            child = %last,
            children = context.children.len(),
            "Removing last child"
        );
        tree.remove_node(RemoveNode {
            node_id: last.clone(),
            change_selection: false,
        })
        .await?;
        self.host.notifier.notify(ProgramEvent::ChildRemoved {
            parent: center_id.clone(),
            child: last.clone(),
        });

        tokio::time::sleep(self.settings.settle_delay()).await;

        let remaining = tree.subtree_context(center_id).await?.child_ids();
        let warning = if remaining.contains(&last) {
            tracing::warn!(
                center = %center_id,
                child = %last,
                remaining = ?remaining,
                "Child still present after removal"
            );
            self.host.notifier.notify(ProgramEvent::VerificationMismatch {
                parent: center_id.clone(),
                child: last.clone(),
            });
            Some(SyncWarning::DeletionNotVerified {
                parent: center_id.clone(),
                child: last.clone(),
            })
        } else {
            tracing::debug!(
                child = %last,
                remaining = remaining.len(),
                "Removal verified"
            );
            None
        };

        Ok(ClearStep {
            removed: Some(last),
            warning,
        })
    }

    async fn save_center(&self, center_id: &NodeId, waypoint: &Waypoint) -> Result<()> {
        let mut node = self.host.tree.get_node(center_id).await?;
        node.set_parameters(&EllipseCenterParameters {
            waypoint: waypoint.clone(),
            is_defined: true,
        })?;
        self.host.tree.update_node(center_id, node).await?;

        tracing::debug!(center = %center_id, waypoint = %waypoint, "Center saved");
        self.host.notifier.notify(ProgramEvent::CenterSaved {
            node_id: center_id.clone(),
            position: waypoint.pose.position,
        });
        Ok(())
    }

    async fn insert_ring(&self, report: &mut RingReport) -> Result<()> {
        for point in RingOffsets::around(&self.params, &report.center) {
            let name = self.settings.point_name(point.index);
            let command = self
                .builder
                .build(&report.center, &point.offset, &name)
                .await?;

            let child = self
                .host
                .tree
                .add_node(AddNode {
                    pivot_node_id: report.center_id.clone(),
                    insertion: Insertion::IntoLast,
                    node: command.to_program_node()?,
                    change_selection: false,
                })
                .await?;

            tracing::debug!(
                index = point.index,
                child = %child,
                variable = %command.variable.name,
                "Inserted ring point"
            );
            self.host.notifier.notify(ProgramEvent::ChildInserted {
                parent: report.center_id.clone(),
                child: child.clone(),
                index: point.index,
            });
            report.inserted.push(child);
        }
        Ok(())
    }

    fn transition(&self, next: SyncState) {
        let prev = std::mem::replace(&mut *self.state.write(), next);
        tracing::debug!(from = %prev, to = %next, "Synchronizer state");
    }

    async fn fail_run(&self, err: Error, report: &RingReport) -> Error {
        self.fail(
            err,
            Some(&report.center_id),
            Some(&report.center),
            &report.removed,
            &report.inserted,
        )
        .await
    }

    async fn fail(
        &self,
        err: Error,
        center_id: Option<&NodeId>,
        waypoint: Option<&Waypoint>,
        removed: &[NodeId],
        inserted: &[NodeId],
    ) -> Error {
        let remaining = match center_id {
            Some(id) => match self.host.tree.subtree_context(id).await {
                Ok(context) => Some(context.child_ids()),
                Err(read_err) => {
                    tracing::debug!(
                        center = %id,
                        error = %read_err,
                        "Could not read remaining children"
                    );
                    None
                }
            },
            None => None,
        };

        tracing::error!(
            error = %err,
            state = %self.state(),
            center = ?center_id.map(NodeId::as_str),
            waypoint = ?waypoint.map(|w| w.pose.position),
            removed = ?removed,
            inserted = ?inserted,
            remaining = ?remaining,
            "Ring synchronization failed"
        );
        self.transition(SyncState::Failed);
        err
    }
}

impl std::fmt::Debug for RingSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingSynchronizer")
            .field("state", &self.state())
            .field("params", &self.params)
            .field("settings", &self.settings)
            .field("resolvers", &self.resolvers)
            .finish_non_exhaustive()
    }
}
