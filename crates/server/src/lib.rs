//! Storerate server library.
//!
//! JSON API for a multi-role store rating platform: users rate stores,
//! store owners follow their store's ratings, admins manage accounts and
//! stores. Exposed as a library so the router can be driven in-process by
//! tests and the CLI can reuse the repositories and migrations.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
