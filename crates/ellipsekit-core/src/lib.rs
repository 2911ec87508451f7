//! # EllipseKit Core
//!
//! Core types, host service traits, and events for EllipseKit.
//! Provides the data model shared by the ring geometry, the move-to command
//! builder, and the program-tree synchronizer.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod host;
pub mod program;
pub mod units;

pub use data::{EllipseParameters, JointPositions, Pose, Waypoint, BASE_FRAME};

pub use error::{Error, MoveError, ResolutionError, Result, SymbolError, TreeError};

pub use event_bus::{
    EventBusConfig, EventCategory, EventFilter, ProgramEvent, ProgramEventBus, SubscriptionId,
};

pub use host::{
    ChangeNotifier, HostApi, MoveScreenOptions, MoveScreenTarget, MoveService, NoOpNotifier,
    ProgramTreeService, SymbolService,
};

pub use program::{
    AddNode, EllipseCenterParameters, Insertion, MoveToCommand, MoveType, NodeId, ProgramNode,
    RemoveNode, SubtreeContext, TreeEntry, Variable, VariableValueType,
    ELLIPSE_CENTER_NODE_TYPE, MOVE_TO_NODE_TYPE,
};

pub use units::{Acceleration, Angle, Length, LengthUnit, Speed};
