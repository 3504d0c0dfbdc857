//! docdesk library.
//!
//! Document proxy for the content-management admin dashboard, plus the
//! client-side view controller that consumes it.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod viewer;
