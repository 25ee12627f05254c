use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::{error, info};

use crate::config::UploadRequest;
use crate::error::{UploadError, UploadResult};
use crate::services::outputs::{OUTPUT_FILE_URL, OUTPUT_QR_URL, OUTPUT_RESULT, OutputSink};
use crate::services::qr_code::create_qr_temp_file;
use crate::services::storage::{ObjectAcl, StorageService};
use crate::services::url_resolver::{public_url_for_key, resolve_file_url};

const QR_CONTENT_TYPE: &str = "image/png";

/// What a successful run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadOutcome {
    pub file_key: String,
    pub file_url: Option<String>,
    pub qr_key: Option<String>,
    pub qr_url: Option<String>,
}

pub struct UploadService {
    storage: Arc<dyn StorageService>,
}

impl UploadService {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self { storage }
    }

    /// Uploads the file, resolves its URL and optionally publishes a QR code
    /// pointing at it. Outputs are emitted as soon as each one is known, so a
    /// later failure leaves the earlier ones in place. Nothing is rolled back.
    pub async fn run(
        &self,
        request: &UploadRequest,
        outputs: &mut dyn OutputSink,
    ) -> UploadResult<UploadOutcome> {
        let file_key = request.file_key();
        let acl = ObjectAcl::from_public_flag(request.public);

        info!(
            "Uploading {} to s3://{}/{} ({:?})",
            request.file_path, request.bucket, file_key, acl
        );
        self.storage
            .upload_file(
                &file_key,
                Path::new(&request.file_path),
                request.content_type.as_deref(),
                acl,
            )
            .await?;
        info!("Uploaded {}", file_key);

        let mut outcome = UploadOutcome {
            file_key,
            ..UploadOutcome::default()
        };

        if !request.wants_url() {
            return Ok(outcome);
        }

        let file_url = resolve_file_url(request, &outcome.file_key, self.storage.as_ref()).await?;
        if request.output_file_url {
            outputs
                .set_output(OUTPUT_FILE_URL, &file_url)
                .map_err(UploadError::Output)?;
        }

        if request.output_qr_url {
            let qr_key = request.qr_key();
            let qr_url = self.publish_qr_code(request, &qr_key, &file_url).await?;
            outputs
                .set_output(OUTPUT_QR_URL, &qr_url)
                .map_err(UploadError::Output)?;
            outcome.qr_key = Some(qr_key);
            outcome.qr_url = Some(qr_url);
        }

        outcome.file_url = Some(file_url);
        Ok(outcome)
    }

    /// Renders the QR code to a temporary PNG, uploads it public-read
    /// regardless of the file's own visibility, and returns its public URL.
    async fn publish_qr_code(
        &self,
        request: &UploadRequest,
        qr_key: &str,
        payload: &str,
    ) -> UploadResult<String> {
        info!("Rendering QR code ({}px)", request.qr_width);
        let temp_file = create_qr_temp_file(payload, request.qr_width)?;
        let data = tokio::fs::read(temp_file.path()).await?;

        self.storage
            .upload_bytes(
                qr_key,
                Bytes::from(data),
                Some(QR_CONTENT_TYPE),
                ObjectAcl::PublicRead,
            )
            .await?;
        temp_file.close()?;
        info!("Uploaded QR code to {}", qr_key);

        Ok(public_url_for_key(request, qr_key))
    }

    /// Runs the upload and reports the outcome: `result=success`, or
    /// `result=failure` plus the failure marker carrying the error message.
    pub async fn run_and_report(
        &self,
        request: &UploadRequest,
        outputs: &mut dyn OutputSink,
    ) -> UploadResult<UploadOutcome> {
        let result = self.run(request, outputs).await;
        report_outcome(&result, outputs);
        result
    }
}

/// Sets the `result` output and, on failure, the failure marker.
pub fn report_outcome<T>(result: &UploadResult<T>, outputs: &mut dyn OutputSink) {
    match result {
        Ok(_) => {
            if let Err(e) = outputs.set_output(OUTPUT_RESULT, "success") {
                error!("Failed to set result output: {}", e);
                outputs.set_failed(&e.to_string());
            }
        }
        Err(err) => {
            if let Err(e) = outputs.set_output(OUTPUT_RESULT, "failure") {
                error!("Failed to set result output: {}", e);
            }
            outputs.set_failed(&err.to_string());
        }
    }
}
