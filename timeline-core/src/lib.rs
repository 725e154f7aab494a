//! Core shared library for the timeline service.
//!
//! This crate exposes the plumbing the service crates depend on:
//! common errors, configuration loading, the database pool wrapper
//! and logging setup.

pub mod config;
pub mod db;
pub mod errors;
pub mod logging;

pub use errors::{Result as CoreResult, TimelineError};
