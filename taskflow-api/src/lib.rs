//! # Task Flow API Server Library
//!
//! This library provides the HTTP layer of Task Flow: configuration, error
//! mapping, the router and its handlers. The domain lives in
//! `taskflow-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and JWT layer
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
