//! Core types and shared functionality for findlogin.
//!
//! This crate provides:
//! - The credential data model and search state transitions
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod state;

pub use config::{AppConfig, ConfigError};
pub use error::{Error, ErrorKind};
pub use state::{CredentialRecord, SearchFailure, SearchState, Transition};
