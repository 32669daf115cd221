//! MySQL repository implementations

pub mod retry_job_repository_impl;

pub use retry_job_repository_impl::MySqlRetryJobRepository;
