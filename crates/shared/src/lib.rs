//! Shared types, errors, and configuration for Captain Ledger.
//!
//! - [`AppError`], the error taxonomy every crate maps onto
//! - [`AppConfig`], layered file and environment configuration
//! - [`JwtService`] and [`Claims`] for bearer tokens
//! - Pagination types for list endpoints

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
