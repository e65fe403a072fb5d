//! Infrastructure layer: document storage, configuration, the Auth Gate and
//! the resource services that tie them together.

pub mod auth_gate;
pub mod config;
pub mod services;
pub mod store;

pub use auth_gate::{bearer_token, AuthGate, GateError};
pub use config::{AppConfig, BootstrapAdmin, ConfigError};
pub use services::{AppServices, ServiceError, ServiceResult, Stores};
