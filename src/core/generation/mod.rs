//! Generation request client and its request types.

mod client;
mod request;

pub use client::GenerationClient;
pub use request::{GenerationRequest, ImageFormat, Voice};
