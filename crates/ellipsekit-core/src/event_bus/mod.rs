//! # Event Bus Module
//!
//! Publish/subscribe channel for program-tree changes. The synchronizer
//! publishes what it did; host UIs subscribe to redraw.
//!
//! ```rust,ignore
//! use ellipsekit_core::event_bus::{EventCategory, EventFilter, ProgramEventBus};
//!
//! let bus = ProgramEventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Ui]),
//!     |event| println!("{}", event.description()),
//! );
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
