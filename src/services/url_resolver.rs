use anyhow::Result;
use tracing::{debug, info};

use crate::config::UploadRequest;
use crate::services::storage::StorageService;

/// Virtual-hosted S3 host for a bucket.
fn s3_host(bucket: &str, region: &str) -> String {
    format!("{}.s3.{}.amazonaws.com", bucket, region)
}

/// Static URL of a public-read object.
pub fn public_object_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}/{}", s3_host(bucket, region), key)
}

/// Swaps the `<bucket host>/<bucket root>` segment of `url` for
/// `<alternative_domain>/`.
///
/// This is a plain text replacement of the first match. It only works while
/// the URL keeps the virtual-hosted S3 form; a URL in any other shape comes
/// back unchanged.
pub fn substitute_domain(
    url: &str,
    bucket: &str,
    region: &str,
    bucket_root: &str,
    alternative_domain: &str,
) -> String {
    let from = format!("{}/{}", s3_host(bucket, region), bucket_root);
    let to = format!("{}/", alternative_domain);
    url.replacen(&from, &to, 1)
}

fn apply_alternative_domain(request: &UploadRequest, url: String, domain: Option<&str>) -> String {
    match domain {
        Some(domain) => substitute_domain(
            &url,
            &request.bucket,
            &request.region,
            &request.bucket_root,
            domain,
        ),
        None => url,
    }
}

/// Public URL of an object the run uploaded, with the public alternative
/// domain applied.
pub fn public_url_for_key(request: &UploadRequest, key: &str) -> String {
    apply_alternative_domain(
        request,
        public_object_url(&request.bucket, &request.region, key),
        request.alternative_domain_public.as_deref(),
    )
}

/// URL for the uploaded file: static when public, signed otherwise. Signing
/// is never attempted for public objects.
pub async fn resolve_file_url(
    request: &UploadRequest,
    key: &str,
    storage: &dyn StorageService,
) -> Result<String> {
    if request.public {
        let url = public_url_for_key(request, key);
        info!("Resolved public URL for {}", key);
        return Ok(url);
    }

    let signed = storage
        .presigned_get_url(key, request.signed_url_ttl)
        .await?;
    info!(
        "Resolved signed URL for {} (expires at {})",
        key, signed.expires_at
    );
    debug!("Signed URL: {}", signed.url);

    Ok(apply_alternative_domain(
        request,
        signed.url,
        request.alternative_domain_private.as_deref(),
    ))
}
