//! Domain models for fitvoice.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! - [`Session`]: The authenticated identity (token, role, user id). It is never
//!   stored as one blob; the secure store keeps three scalar entries that are
//!   written and cleared together.
//! - [`ApiEnvelope`]: The fixed `{message, data, error, status}` wrapper every API
//!   response uses.
//!
//! ## Training
//!
//! - [`Activity`]: A single logged or suggested workout.
//! - [`Routine`]: A reusable plan made of [`Exercise`]s.
//!
//! ## Assistant
//!
//! - [`AssistantInteraction`]: One simulated exchange with the voice assistant.
//! - [`ConnectionStatus`]: Point-in-time reachability of the assistant skill.

mod activity;
mod assistant;
mod auth;
mod routine;

pub use activity::*;
pub use assistant::*;
pub use auth::*;
pub use routine::*;
