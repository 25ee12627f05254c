pub mod config;
pub mod error;
pub mod infrastructure;
pub mod services;
pub mod utils;

pub use config::UploadRequest;
pub use error::{UploadError, UploadResult};
pub use services::upload_service::{UploadOutcome, UploadService};
