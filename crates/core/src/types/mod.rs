//! Core types for Storerate.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod password;
pub mod role;
pub mod score;

pub use email::{Email, EmailError};
pub use id::*;
pub use password::{Password, PasswordError};
pub use role::{Role, RoleParseError};
pub use score::{Score, ScoreError};
