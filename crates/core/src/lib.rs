//! Storerate Core - Shared types library.
//!
//! This crate provides common types used across all Storerate components:
//! - `server` - JSON API for accounts, stores, and ratings
//! - `cli` - Command-line tools for migrations and admin bootstrap
//! - `integration-tests` - End-to-end tests against the router
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. Database encode/decode impls are behind the `postgres`
//! feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, roles, passwords, and rating scores

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
