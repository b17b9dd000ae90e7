//! MCP tool implementations.
//!
//! This module contains all tools exposed by the findlogin server.

pub mod find_login;
pub mod search_state;
