#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use s3_artifact_upload::services::inputs::StaticInputs;
use s3_artifact_upload::services::storage::{ObjectAcl, SignedUrl, StorageService};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const BUCKET: &str = "my-bucket";
pub const REGION: &str = "ap-northeast-1";

#[derive(Debug, Clone)]
pub struct PutRecord {
    pub key: String,
    pub data: Vec<u8>,
    pub content_type: Option<String>,
    pub acl: ObjectAcl,
}

/// In-memory storage that records every put and hands out fake signed URLs.
#[derive(Default)]
pub struct RecordingStorage {
    puts: Mutex<Vec<PutRecord>>,
    sign_requests: Mutex<Vec<(String, Duration)>>,
    sign_counter: AtomicUsize,
    fail_upload_on: Mutex<Option<(String, String)>>,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every upload to a key ending in `key_suffix` fail with `message`.
    pub fn failing_on(key_suffix: &str, message: &str) -> Self {
        let storage = Self::default();
        *storage.fail_upload_on.lock().unwrap() =
            Some((key_suffix.to_string(), message.to_string()));
        storage
    }

    pub fn puts(&self) -> Vec<PutRecord> {
        self.puts.lock().unwrap().clone()
    }

    pub fn sign_requests(&self) -> Vec<(String, Duration)> {
        self.sign_requests.lock().unwrap().clone()
    }

    fn record(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
        acl: ObjectAcl,
    ) -> Result<()> {
        if let Some((suffix, message)) = self.fail_upload_on.lock().unwrap().as_ref() {
            if key.ends_with(suffix.as_str()) {
                return Err(anyhow!("{}", message));
            }
        }
        self.puts.lock().unwrap().push(PutRecord {
            key: key.to_string(),
            data,
            content_type: content_type.map(str::to_string),
            acl,
        });
        Ok(())
    }
}

#[async_trait]
impl StorageService for RecordingStorage {
    async fn upload_file(
        &self,
        key: &str,
        path: &Path,
        content_type: Option<&str>,
        acl: ObjectAcl,
    ) -> Result<()> {
        let data = tokio::fs::read(path).await?;
        self.record(key, data, content_type, acl)
    }

    async fn upload_bytes(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
        acl: ObjectAcl,
    ) -> Result<()> {
        self.record(key, data.to_vec(), content_type, acl)
    }

    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> Result<SignedUrl> {
        self.sign_requests
            .lock()
            .unwrap()
            .push((key.to_string(), expires_in));
        let token = self.sign_counter.fetch_add(1, Ordering::SeqCst);
        Ok(SignedUrl {
            url: format!(
                "https://{}.s3.{}.amazonaws.com/{}?X-Amz-Expires={}&X-Amz-Signature=sig{}",
                BUCKET,
                REGION,
                key,
                expires_in.as_secs(),
                token
            ),
            expires_at: Utc::now() + expires_in,
        })
    }
}

/// Required inputs for a file at `file_path`.
pub fn inputs_for(file_path: &str) -> StaticInputs {
    StaticInputs::new()
        .with("aws-access-key-id", "AKIDEXAMPLE")
        .with("aws-secret-access-key", "secret")
        .with("aws-region", REGION)
        .with("aws-bucket", BUCKET)
        .with("file-path", file_path)
}

/// A scratch file named `name` inside a fresh temp dir.
pub fn scratch_file(name: &str, contents: &[u8]) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    let path = path.to_string_lossy().into_owned();
    (dir, path)
}
