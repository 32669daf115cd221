pub mod code;
pub mod retry_job;

pub use code::CodeStore;
pub use retry_job::{InMemoryRetryStore, RetryStore};
