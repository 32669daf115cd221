//! Database tests
