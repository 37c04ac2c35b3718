//! # Task Flow Shared Library
//!
//! This crate contains the domain of Task Flow: persistence, authentication
//! primitives and the engines that enforce the membership and ownership
//! rules. The API server is a thin HTTP layer on top of it.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, JWT tokens, bearer token resolution
//! - `db`: Connection pool and embedded migrations
//! - `models`: Database models and SQL operations
//! - `services`: Domain engines for users, teams, projects, sprints and todos
//! - `error`: Domain error type

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

/// Current version of the Task Flow shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
