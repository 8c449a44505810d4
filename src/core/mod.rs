pub mod connection;
pub mod generation;
pub mod session;

pub use connection::{ConnectionManager, HealthStatus};
pub use generation::{GenerationClient, GenerationRequest, ImageFormat, Voice};
pub use session::{Session, SubmissionReport, SubmissionState};
