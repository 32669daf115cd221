//! Database module - MySQL implementations using SQLx
//!
//! Holds the connection pool and the durable retry job store.

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

pub use connection::DatabasePool;
pub use mysql::MySqlRetryJobRepository;
