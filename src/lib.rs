#![deny(missing_docs)]

//! Core library for the employee registry service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Employee records, validation, and the in-memory store.
pub mod employees;
/// Structured logging and tracing setup.
pub mod logging;
/// OpenAPI document and Swagger UI.
pub mod openapi;
