//! Scripted move service

use async_trait::async_trait;
use ellipsekit_core::{MoveError, MoveScreenOptions, MoveService, Result, Waypoint};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// What the simulated move screen does when opened
#[derive(Debug, Clone, PartialEq)]
pub enum MoveScreenResponse {
    /// The user confirms this waypoint
    Capture(Waypoint),
    /// The user backs out
    Cancel,
    /// The move screen cannot be shown
    Fail(String),
}

/// Move service answering from a queue of responses
///
/// An exhausted queue behaves like a cancelled move screen.
#[derive(Debug, Default)]
pub struct ScriptedMoveService {
    responses: Mutex<VecDeque<MoveScreenResponse>>,
    opened: Mutex<Vec<MoveScreenOptions>>,
    moves: Mutex<Vec<Waypoint>>,
}

impl ScriptedMoveService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service that answers the first open with `waypoint`
    pub fn capturing(waypoint: Waypoint) -> Self {
        let service = Self::new();
        service.push(MoveScreenResponse::Capture(waypoint));
        service
    }

    pub fn push(&self, response: MoveScreenResponse) {
        self.responses.lock().push_back(response);
    }

    /// Options of every move screen opened so far
    pub fn opened(&self) -> Vec<MoveScreenOptions> {
        self.opened.lock().clone()
    }

    /// Targets of every auto-move so far
    pub fn moves(&self) -> Vec<Waypoint> {
        self.moves.lock().clone()
    }
}

#[async_trait]
impl MoveService for ScriptedMoveService {
    async fn open_move_screen(&self, options: &MoveScreenOptions) -> Result<Option<Waypoint>> {
        self.opened.lock().push(options.clone());
        let response = self
            .responses
            .lock()
            .pop_front()
            .unwrap_or(MoveScreenResponse::Cancel);

        match response {
            MoveScreenResponse::Capture(waypoint) => Ok(Some(waypoint)),
            MoveScreenResponse::Cancel => Ok(None),
            MoveScreenResponse::Fail(reason) => Err(MoveError::MoveScreenFailed { reason }.into()),
        }
    }

    async fn auto_move(&self, waypoint: &Waypoint) -> Result<()> {
        tracing::debug!(target_pose = %waypoint.pose, "Simulated auto move");
        self.moves.lock().push(waypoint.clone());
        Ok(())
    }
}
