//! Verification code service
//!
//! This module provides the verification code workflow:
//! - Secure 6-digit code generation
//! - Issuing through a `CodeStore` with cooldown protection
//! - Delivery through a composed `MessageGateway`
//! - Verification with bounded attempts

mod service;

#[cfg(test)]
mod tests;

pub use service::{generate_code, CodeService};
