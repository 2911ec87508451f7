//! Simulated host services
//!
//! Drop-in implementations of the host traits that keep everything in
//! memory. The tree records each call it receives and supports fault
//! injection, so synchronizer runs can be checked call by call.

mod moves;
mod symbols;
mod tree;

pub use moves::{MoveScreenResponse, ScriptedMoveService};
pub use symbols::SequentialSymbolService;
pub use tree::{InMemoryProgramTree, TreeCall, TreeFaults};

use ellipsekit_core::HostApi;
use std::sync::Arc;

/// A complete simulated host
#[derive(Debug, Clone, Default)]
pub struct SimulatedHost {
    pub tree: Arc<InMemoryProgramTree>,
    pub moves: Arc<ScriptedMoveService>,
    pub symbols: Arc<SequentialSymbolService>,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host services backed by this simulation
    pub fn api(&self) -> HostApi {
        HostApi::new(self.moves.clone(), self.tree.clone(), self.symbols.clone())
    }
}
