/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: User endpoints
/// - `teams`: Team and membership endpoints
/// - `boards`: Board endpoints, including export
/// - `tasks`: Task endpoints

pub mod boards;
pub mod health;
pub mod tasks;
pub mod teams;
pub mod users;
