//! Focus resolution
//!
//! Targets live in a [`FocusRegistry`] owned by the tracker. Each frame the
//! [`FocusResolver`] picks at most one of them under the cursor and moves every
//! target's focus level toward 1.0 (the winner) or 0.0 (everyone else).

mod registry;
mod resolver;
mod target;

pub use registry::{FocusRegistry, HitTester};
pub use resolver::{FocusContext, FocusResolver, InteractionState, DEFAULT_FOCUS_DURATION};
pub use target::{Focusable, TargetId};
