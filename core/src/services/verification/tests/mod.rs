//! Tests for the verification service

#[cfg(test)]
mod mocks;
#[cfg(test)]
mod service_tests;
