//! Turn-lifecycle state machine
//!
//! Elm Architecture pattern: a pure `transition` maps the current state
//! plus an event to a new state and an ordered list of effects. All I/O
//! lives in the runtime.

mod effect;
mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{SyncContext, TurnState};
pub use transition::{transition, TransitionError, TransitionResult};
