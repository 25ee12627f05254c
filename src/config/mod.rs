use std::fmt;
use std::time::Duration;

use crate::error::UploadResult;
use crate::services::inputs::InputProvider;
use crate::utils::paths::{
    base_name, build_storage_key, normalize_bucket_root, normalize_destination_dir,
};
use crate::utils::validation::{parse_flag, validate_expire, validate_qr_width};

/// Signed URLs are meant to be consumed right away: 10 minutes.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(10 * 60);

/// Used when `expire` is not supplied.
pub const DEFAULT_EXPIRE: &str = "180";

/// Used when `qr-width` is not supplied.
pub const DEFAULT_QR_WIDTH: &str = "120";

/// Object name of the QR code image, next to the uploaded file.
pub const QR_OBJECT_NAME: &str = "qr.png";

/// Everything one run needs, validated and normalized. Built once and passed
/// by reference.
#[derive(Clone)]
pub struct UploadRequest {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
    pub file_path: String,
    /// Normalized: no leading `/`, trailing `/`.
    pub destination_dir: String,
    /// Normalized: no leading `/`, trailing `/`.
    pub bucket_root: String,
    pub content_type: Option<String>,
    pub public: bool,
    /// The `expire` input. Kept separate from `signed_url_ttl`, which is
    /// what signing actually uses.
    pub expire: Duration,
    pub signed_url_ttl: Duration,
    pub qr_width: u32,
    pub alternative_domain_public: Option<String>,
    pub alternative_domain_private: Option<String>,
    pub output_file_url: bool,
    pub output_qr_url: bool,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

impl UploadRequest {
    /// Reads every input from `inputs`, validates the numeric ones before
    /// anything else happens, and normalizes the key prefixes.
    pub fn from_inputs(inputs: &dyn InputProvider) -> UploadResult<Self> {
        let access_key_id = inputs.get_required_input("aws-access-key-id")?;
        let secret_access_key = inputs.get_required_input("aws-secret-access-key")?;
        let region = inputs.get_required_input("aws-region")?;
        let bucket = inputs.get_required_input("aws-bucket")?;
        let file_path = inputs.get_required_input("file-path")?;

        let expire = validate_expire(&or_default(inputs.get_input("expire")?, DEFAULT_EXPIRE))?;
        let qr_width =
            validate_qr_width(&or_default(inputs.get_input("qr-width")?, DEFAULT_QR_WIDTH))?;

        let bucket_root = normalize_bucket_root(&inputs.get_input("bucket-root")?);
        let destination_dir = normalize_destination_dir(&inputs.get_input("destination-dir")?);

        Ok(Self {
            access_key_id,
            secret_access_key,
            region,
            bucket,
            file_path,
            destination_dir,
            bucket_root,
            content_type: non_empty(inputs.get_input("content-type")?),
            public: parse_flag(&inputs.get_input("public")?),
            expire: Duration::from_secs(expire),
            signed_url_ttl: SIGNED_URL_TTL,
            qr_width,
            alternative_domain_public: non_empty(inputs.get_input("alternative-domain-public")?),
            alternative_domain_private: non_empty(
                inputs.get_input("alternative-domain-private")?,
            ),
            output_file_url: parse_flag(&inputs.get_input("output-file-url")?),
            output_qr_url: parse_flag(&inputs.get_input("output-qr-url")?),
        })
    }

    /// Storage key of the uploaded file.
    pub fn file_key(&self) -> String {
        build_storage_key(
            &self.bucket_root,
            &self.destination_dir,
            &base_name(&self.file_path),
        )
    }

    /// Storage key of the QR code image.
    pub fn qr_key(&self) -> String {
        build_storage_key(&self.bucket_root, &self.destination_dir, QR_OBJECT_NAME)
    }

    /// A URL is needed for either output.
    pub fn wants_url(&self) -> bool {
        self.output_file_url || self.output_qr_url
    }
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("access_key_id", &"<redacted>")
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("file_path", &self.file_path)
            .field("destination_dir", &self.destination_dir)
            .field("bucket_root", &self.bucket_root)
            .field("content_type", &self.content_type)
            .field("public", &self.public)
            .field("expire", &self.expire)
            .field("signed_url_ttl", &self.signed_url_ttl)
            .field("qr_width", &self.qr_width)
            .field("alternative_domain_public", &self.alternative_domain_public)
            .field("alternative_domain_private", &self.alternative_domain_private)
            .field("output_file_url", &self.output_file_url)
            .field("output_qr_url", &self.output_qr_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::inputs::StaticInputs;
    use crate::utils::paths::DEFAULT_BUCKET_ROOT;

    fn base_inputs() -> StaticInputs {
        StaticInputs::new()
            .with("aws-access-key-id", "AKID")
            .with("aws-secret-access-key", "SECRET")
            .with("aws-region", "ap-northeast-1")
            .with("aws-bucket", "my-bucket")
            .with("file-path", "./README.md")
    }

    #[test]
    fn test_defaults() {
        let request = UploadRequest::from_inputs(&base_inputs()).unwrap();
        assert_eq!(request.bucket_root, DEFAULT_BUCKET_ROOT);
        assert_eq!(request.destination_dir.len(), 33);
        assert_eq!(request.expire, Duration::from_secs(180));
        assert_eq!(request.signed_url_ttl, SIGNED_URL_TTL);
        assert_eq!(request.qr_width, 120);
        assert!(!request.public);
        assert!(!request.wants_url());
        assert_eq!(request.content_type, None);
    }

    #[test]
    fn test_keys() {
        let inputs = base_inputs()
            .with("bucket-root", "/pub")
            .with("destination-dir", "v1")
            .with("file-path", "/tmp/report.pdf");
        let request = UploadRequest::from_inputs(&inputs).unwrap();
        assert_eq!(request.file_key(), "pub/v1/report.pdf");
        assert_eq!(request.qr_key(), "pub/v1/qr.png");
    }

    #[test]
    fn test_expire_is_independent_of_signing_window() {
        let inputs = base_inputs().with("expire", "604800");
        let request = UploadRequest::from_inputs(&inputs).unwrap();
        assert_eq!(request.expire, Duration::from_secs(604_800));
        assert_eq!(request.signed_url_ttl, Duration::from_secs(600));
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let err = UploadRequest::from_inputs(&base_inputs().with("expire", "-5")).unwrap_err();
        assert_eq!(err.input_name(), Some("expire"));

        let err = UploadRequest::from_inputs(&base_inputs().with("qr-width", "0")).unwrap_err();
        assert_eq!(err.input_name(), Some("qr-width"));
    }

    #[test]
    fn test_required_inputs() {
        let inputs = StaticInputs::new().with("aws-access-key-id", "AKID");
        let err = UploadRequest::from_inputs(&inputs).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Input required and not supplied: aws-secret-access-key"
        );
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let request = UploadRequest::from_inputs(&base_inputs()).unwrap();
        let debug = format!("{:?}", request);
        assert!(!debug.contains("SECRET"));
        assert!(!debug.contains("AKID"));
    }
}
