//! Ellipse center presenter
//!
//! Entry points for the two buttons of the center node's editor.

use ellipsekit_core::{EllipseCenterParameters, HostApi, NodeId, Result, Waypoint};
use ellipsekit_settings::Config;

use crate::synchronizer::{RingSynchronizer, SyncOutcome};

/// Drives the ellipse center editor
#[derive(Debug)]
pub struct EllipsePresenter {
    synchronizer: RingSynchronizer,
}

impl EllipsePresenter {
    pub fn new(host: HostApi, config: &Config) -> Self {
        Self {
            synchronizer: RingSynchronizer::new(host, config),
        }
    }

    pub fn from_synchronizer(synchronizer: RingSynchronizer) -> Self {
        Self { synchronizer }
    }

    pub fn synchronizer(&self) -> &RingSynchronizer {
        &self.synchronizer
    }

    /// "Edit center": capture a new center and regenerate the ring
    pub async fn on_edit_center(&self) -> Result<SyncOutcome> {
        tracing::info!("Edit center requested");
        self.synchronizer.edit_center().await
    }

    /// "Move here": drive the robot to the stored center
    ///
    /// Returns the waypoint the robot was sent to.
    pub async fn on_move_here(&self) -> Result<Waypoint> {
        let (center_id, params) = self.stored_center().await?;
        tracing::info!(
            center = %center_id,
            defined = params.is_defined,
            waypoint = %params.waypoint,
            "Moving to ellipse center"
        );
        self.synchronizer
            .host()
            .move_service
            .auto_move(&params.waypoint)
            .await?;
        Ok(params.waypoint)
    }

    /// The resolved center node and its stored parameters
    pub async fn stored_center(&self) -> Result<(NodeId, EllipseCenterParameters)> {
        let center_id = self.synchronizer.resolve_center().await?;
        let node = self.synchronizer.host().tree.get_node(&center_id).await?;
        let params = node.parameters_as()?;
        Ok((center_id, params))
    }
}
