use crate::config::UploadRequest;
use crate::services::storage::S3StorageService;
use aws_config::Region;
use aws_config::retry::RetryConfig;
use aws_sdk_s3::{Client, Config, config::Credentials};
use std::sync::Arc;
use tracing::info;

/// S3 client with static credentials and no automatic retries.
pub fn build_s3_client(access_key_id: &str, secret_access_key: &str, region: &str) -> Client {
    let credentials = Credentials::new(
        access_key_id,
        secret_access_key,
        None, // session token
        None, // expiration
        "s3-artifact-upload",
    );

    let config = Config::builder()
        .region(Region::new(region.to_string()))
        .credentials_provider(credentials)
        .retry_config(RetryConfig::disabled())
        .behavior_version_latest()
        .build();

    Client::from_conf(config)
}

pub fn setup_storage(request: &UploadRequest) -> Arc<S3StorageService> {
    info!(
        "S3 Storage: bucket {} in {}",
        request.bucket, request.region
    );

    let client = build_s3_client(
        &request.access_key_id,
        &request.secret_access_key,
        &request.region,
    );
    Arc::new(S3StorageService::new(client, request.bucket.clone()))
}
