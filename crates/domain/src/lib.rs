//! # acctl-domain
//!
//! Pure domain model for the air-conditioner controller.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, local time helpers
//! - Define the sensed [`PowerState`](power::PowerState)
//! - Define the [`ActuationOutcome`](actuation::ActuationOutcome) of a
//!   state-verified press sequence
//! - Define **schedule rules** and the fixed-capacity slot table, including
//!   the once-per-minute firing state machine
//! - Define the bounded **journal** ring buffer
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod actuation;
pub mod journal;
pub mod power;
pub mod schedule;
