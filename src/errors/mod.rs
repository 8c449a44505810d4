//! Error types for the Infinite Talk client.

pub mod client_error;

pub use client_error::{ClientError, ClientResult};
