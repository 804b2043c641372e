//! Core domain concepts shared across the debate subdomains.
//!
//! - [`question::Question`]: the immutable subject of a debate
//! - [`agent::Agent`]: a participant identity (name + role label)
//! - [`error::DomainError`]: domain-level errors

pub mod agent;
pub mod error;
pub mod question;
pub mod string;
