//! Message gateway capability consumed by the code service

mod gateway;

pub use gateway::MessageGateway;
