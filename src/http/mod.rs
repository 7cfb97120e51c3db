//! HTTP transport for artifact downloads.

mod client;
mod status;

pub use client::HttpClient;
pub use status::{describe_failure, describe_status, download_error};
