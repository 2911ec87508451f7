//! Shared fixtures for synchronizer tests

#![allow(dead_code)]

use ellipsekit_core::{JointPositions, NodeId, Pose, ProgramNode, Waypoint};
use ellipsekit_program::sim::{MoveScreenResponse, SimulatedHost};
use ellipsekit_program::{EllipseCenterBehavior, ProgramBehavior, RingSynchronizer};
use ellipsekit_settings::Config;
use serde_json::json;

/// Defaults with no settling wait
pub fn config() -> Config {
    let mut config = Config::new();
    config.sync.settle_delay_ms = 0;
    config
}

pub fn center_waypoint() -> Waypoint {
    Waypoint::new(
        Pose::new([0.5, 0.1, 0.3], [0.0, 3.14, 0.0]),
        JointPositions {
            base: 0.25,
            shoulder: -1.4,
            elbow: 1.6,
            ..Default::default()
        },
    )
}

pub fn folder() -> ProgramNode {
    ProgramNode::new("folder", "1.0.0", &json!({})).unwrap()
}

pub fn move_to() -> ProgramNode {
    ProgramNode::new("move-to", "1.0.0", &json!({})).unwrap()
}

/// `root` folder holding one ellipse center node
pub struct Fixture {
    pub host: SimulatedHost,
    pub root: NodeId,
    pub center: NodeId,
}

impl Fixture {
    pub fn new() -> Self {
        let host = SimulatedHost::new();
        let root = host.tree.add_root(folder());
        let center = host
            .tree
            .insert_child(&root, EllipseCenterBehavior.factory().unwrap())
            .unwrap();
        Self { host, root, center }
    }

    /// Add `n` pre-existing children under the center
    pub fn with_children(self, n: usize) -> Self {
        for _ in 0..n {
            self.host.tree.insert_child(&self.center, move_to()).unwrap();
        }
        self
    }

    pub fn capture(&self, waypoint: Waypoint) {
        self.host.moves.push(MoveScreenResponse::Capture(waypoint));
    }

    /// Synchronizer with the center node selected
    pub fn synchronizer(&self, config: &Config) -> RingSynchronizer {
        RingSynchronizer::new(self.host.api().with_selection(self.center.clone()), config)
    }
}
