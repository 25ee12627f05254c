use clap::Parser;
use dotenvy::dotenv;
use s3_artifact_upload::UploadService;
use s3_artifact_upload::config::UploadRequest;
use s3_artifact_upload::error::UploadResult;
use s3_artifact_upload::infrastructure::storage;
use s3_artifact_upload::services::inputs::{InputMode, create_input_provider};
use s3_artifact_upload::services::outputs::{LocalOutputs, OutputSink, PlatformOutputs};
use s3_artifact_upload::services::upload_service::report_outcome;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Where inputs come from: the automation platform or local AWS_* variables
    #[arg(short, long, value_enum, env = "UPLOAD_MODE", default_value = "platform")]
    mode: InputMode,
}

fn build_request(mode: InputMode) -> UploadResult<UploadRequest> {
    let inputs = create_input_provider(mode)?;
    UploadRequest::from_inputs(inputs.as_ref())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "s3_artifact_upload=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting S3 artifact upload [Mode: {:?}]", args.mode);

    let mut outputs: Box<dyn OutputSink> = match args.mode {
        InputMode::Platform => Box::new(PlatformOutputs::new()),
        InputMode::Local => Box::new(LocalOutputs::new()),
    };

    let request = match build_request(args.mode) {
        Ok(request) => request,
        Err(e) => {
            error!("Invalid inputs: {}", e);
            report_outcome::<()>(&Err(e), outputs.as_mut());
            return finish(outputs.as_mut());
        }
    };
    info!(
        "Target: s3://{}/{}{} (public: {}, expire input: {}s)",
        request.bucket,
        request.bucket_root,
        request.destination_dir,
        request.public,
        request.expire.as_secs()
    );

    let storage_service = storage::setup_storage(&request);
    let upload_service = UploadService::new(storage_service);

    match upload_service
        .run_and_report(&request, outputs.as_mut())
        .await
    {
        Ok(outcome) => info!("Upload finished: {}", outcome.file_key),
        Err(e) => error!("Upload failed: {}", e),
    }

    finish(outputs.as_mut())
}

fn finish(outputs: &mut dyn OutputSink) -> ExitCode {
    if let Err(e) = outputs.finish() {
        error!("Failed to write output summary: {}", e);
    }
    if outputs.has_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
