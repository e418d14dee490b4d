//! Application configuration, loaded from environment variables.
//!
//! - [`cors`]: allowed origins for the browser frontend
//! - [`database`]: SQLite pool initialization and migrations
//! - [`jwt`]: bearer-token signing secret and lifetime
//! - [`storage`]: local-disk attachment storage stub

pub mod cors;
pub mod database;
pub mod jwt;
pub mod storage;
