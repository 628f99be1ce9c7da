//! cardpath flow - the play-time layer
//!
//! - `Player`: walks a flow one answer at a time
//! - `PlayerState` / `SessionStatus`: where the session is and whether it can go on
//! - `Action` / `MoveKind`: what the current node offers and whether it counts as progress
//! - `Timeline` / `ReplayEngine`: recorded sessions and their reconstruction
//!
//! **IMPORTANT**: This layer is pure Rust - no IO, no async. The flow is
//! borrowed read-only for the whole session.

pub mod error;
pub mod player;
pub mod replay;
pub mod state;
pub mod timeline;
pub mod transition;

pub use error::PlayError;
pub use player::{Player, progress};
pub use replay::{ReplayEngine, ReplayFrame};
pub use state::{PlayerState, Progress, SessionStatus};
pub use timeline::{PlayEvent, Timeline};
pub use transition::{Action, MoveKind, actions_for};
