use std::fmt::Debug;
use std::path::Path;
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Canned ACL applied to an uploaded object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectAcl {
    Private,
    PublicRead,
}

impl ObjectAcl {
    pub fn from_public_flag(public: bool) -> Self {
        if public {
            ObjectAcl::PublicRead
        } else {
            ObjectAcl::Private
        }
    }

    fn canned(self) -> ObjectCannedAcl {
        match self {
            ObjectAcl::Private => ObjectCannedAcl::Private,
            ObjectAcl::PublicRead => ObjectCannedAcl::PublicRead,
        }
    }
}

/// Time-limited GET URL for a private object.
#[derive(Debug, Clone)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Streams a local file to `key`.
    async fn upload_file(
        &self,
        key: &str,
        path: &Path,
        content_type: Option<&str>,
        acl: ObjectAcl,
    ) -> Result<()>;

    async fn upload_bytes(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
        acl: ObjectAcl,
    ) -> Result<()>;

    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> Result<SignedUrl>;
}

/// Flattens an SDK failure into one readable line, preferring the service's
/// own error code and message.
pub fn sdk_error_message<E, R>(err: &SdkError<E, R>) -> String
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: Debug,
{
    match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{}: {}", code, message),
        (None, Some(message)) => message.to_string(),
        _ => DisplayErrorContext(err).to_string(),
    }
}

pub struct S3StorageService {
    client: Client,
    bucket: String,
}

impl S3StorageService {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    async fn put_object(
        &self,
        key: &str,
        body: ByteStream,
        content_type: Option<&str>,
        acl: ObjectAcl,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_string))
            .acl(acl.canned())
            .body(body)
            .send()
            .await
            .map_err(|e| anyhow!(sdk_error_message(&e)))?;
        Ok(())
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn upload_file(
        &self,
        key: &str,
        path: &Path,
        content_type: Option<&str>,
        acl: ObjectAcl,
    ) -> Result<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| anyhow!("Failed to open {}: {}", path.display(), e))?;
        self.put_object(key, body, content_type, acl).await
    }

    async fn upload_bytes(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
        acl: ObjectAcl,
    ) -> Result<()> {
        self.put_object(key, ByteStream::from(data), content_type, acl)
            .await
    }

    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> Result<SignedUrl> {
        let presigning_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| anyhow!("Failed to create presigning config: {}", e))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|e| anyhow!(sdk_error_message(&e)))?;

        Ok(SignedUrl {
            url: presigned.uri().to_string(),
            expires_at: Utc::now() + expires_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::build_s3_client;

    #[test]
    fn test_acl_from_public_flag() {
        assert_eq!(ObjectAcl::from_public_flag(true), ObjectAcl::PublicRead);
        assert_eq!(ObjectAcl::from_public_flag(false), ObjectAcl::Private);
        assert_eq!(ObjectAcl::PublicRead.canned(), ObjectCannedAcl::PublicRead);
    }

    #[tokio::test]
    async fn test_presigned_get_url_is_signed_offline() {
        let client = build_s3_client("AKIDEXAMPLE", "secret", "ap-northeast-1");
        let storage = S3StorageService::new(client, "my-bucket".to_string());

        let signed = storage
            .presigned_get_url("artifacts/abc/README.md", Duration::from_secs(600))
            .await
            .unwrap();

        assert!(
            signed
                .url
                .starts_with("https://my-bucket.s3.ap-northeast-1.amazonaws.com/artifacts/abc/README.md?"),
            "unexpected url {}",
            signed.url
        );
        assert!(signed.url.contains("X-Amz-Expires=600"));
        assert!(signed.url.contains("X-Amz-Signature="));
        assert!(signed.expires_at > Utc::now());
    }
}
