use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("{0}")]
    MissingInput(String),

    #[error("\"{name}\" input should be a number between {min} and {max}.")]
    InvalidRange {
        name: &'static str,
        min: u64,
        max: u64,
    },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),

    #[error("Failed to set output: {0}")]
    Output(#[source] anyhow::Error),

    #[error("Failed to render QR code: {0}")]
    QrCode(#[from] qrcode::types::QrError),

    #[error("Failed to encode QR image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Name of the offending input, for validation failures.
    pub fn input_name(&self) -> Option<&str> {
        match self {
            UploadError::InvalidRange { name, .. } => Some(*name),
            _ => None,
        }
    }
}

pub type UploadResult<T> = Result<T, UploadError>;
