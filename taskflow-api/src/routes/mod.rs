/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Greeting and health check
/// - `auth`: Login and token refresh
/// - `users`: User registration and self-service
/// - `teams`: Team membership
/// - `projects`: Project membership
/// - `sprints`: Sprints on projects
/// - `todos`: Per-user todo items

use serde::{Deserialize, Serialize};

pub mod auth;
pub mod health;
pub mod projects;
pub mod sprints;
pub mod teams;
pub mod todos;
pub mod users;

/// Plain `{"message": ...}` body, returned by deletions
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
