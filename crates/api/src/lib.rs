//! HTTP API: routing, bearer authentication and request/response mapping.

pub mod app;
pub mod context;
pub mod middleware;
