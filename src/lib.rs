//! Session lifecycle and simulated voice-assistant core for the fitness
//! routines app.
//!
//! - [`storage`]: the three session keys over a secure key-value capability
//! - [`auth`]: login, registration and identity queries against the HTTP API
//! - [`assistant`]: randomized assistant simulator with a bounded interaction log

pub mod assistant;
pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod storage;
