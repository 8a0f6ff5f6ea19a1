//! # Kayako
//!
//! A client for the Kayako helpdesk REST API.
//!
//! Every call is signed with the account's shared secret, sent over HTTP,
//! classified by status code, and (for entity services) mapped from XML
//! into typed models.
//!
//! ## Architecture
//!
//! - [`signer`] - HMAC-SHA256 request signatures
//! - [`transport`] - the `Transport` seam and its `reqwest` implementation
//! - [`classifier`] - status code classification
//! - [`xml`] - permissive XML decoding and the `Parsed` arity union
//! - [`service`] - `BaseService`, the request pipeline shared by all services
//! - [`services`] - user, ticket, and department endpoints
//! - [`registry`] - name-based service lookup
//! - [`models`] - domain models
//! - [`logger`] - the logging collaborator
//! - [`config`] - configuration from environment variables
//! - [`error`] - error types
//!
//! ## Errors
//!
//! Callers should handle `KayakoError::Client` (the request was rejected,
//! fix it) separately from `KayakoError::Server` (the remote failed or was
//! unreachable). Nothing is retried.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use kayako::config::Config;
//! use kayako::logger::TracingLogger;
//! use kayako::registry::ServiceRegistry;
//! use kayako::transport::HttpTransport;
//! use kayako::xml::Parsed;
//!
//! async fn example() -> Result<(), kayako::error::KayakoError> {
//!     let config = Config::from_env()?;
//!     let transport = Arc::new(HttpTransport::new(config.timeout)?);
//!     let registry = ServiceRegistry::new(config.service_config(transport, Arc::new(TracingLogger)));
//!
//!     match registry.departments().list().await? {
//!         Parsed::Single(department) => println!("{}", department.title),
//!         Parsed::Many(departments) => println!("{} departments", departments.len()),
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod classifier;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod registry;
pub mod service;
pub mod services;
pub mod signer;
pub mod transport;
pub mod xml;
