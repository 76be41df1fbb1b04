//! # acctl-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** under `/api` for power control, schedules, the
//!   journal and clock resynchronization
//! - Keep the **legacy plain-text endpoints** (`GET /status`, `PUT /on`,
//!   `PUT /off`) that existing scripts and home-automation hooks call
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results into HTTP responses
//!
//! ## Dependency rule
//! Depends on `acctl-app` (for port traits and services) and `acctl-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod legacy;
pub mod router;
pub mod state;
