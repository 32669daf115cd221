//! Tests for SMS gateways and decorators

mod support;

mod threshold_tests;
