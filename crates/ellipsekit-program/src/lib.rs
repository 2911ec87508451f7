//! # EllipseKit Program
//!
//! Connects the ring generator to the host program tree: the ring
//! synchronizer, center node resolution, node behaviors, the editor
//! presenter, and an in-memory host for tests and demos.

pub mod behavior;
pub mod presenter;
pub mod resolver;
pub mod script;
pub mod sim;
pub mod synchronizer;

pub use behavior::{
    BehaviorRegistry, EllipseCenterBehavior, InsertionContext, ProgramBehavior,
    ValidationContext, ValidationResponse, ELLIPSE_CENTER_LABEL,
};
pub use presenter::EllipsePresenter;
pub use resolver::{
    AncestorResolver, CenterNodeResolver, ContributedInstanceResolver, ResolverChain,
    SelectedNodeResolver,
};
pub use script::ScriptBuilder;
pub use synchronizer::{
    ClearStep, RingReport, RingSynchronizer, SyncOutcome, SyncState, SyncWarning,
};
