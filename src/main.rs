use std::env;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context};
use pdf_converter::{
    format_file_size, ClientConfig, ConversionClient, HealthStatus, ProgressCallback, TracingHooks,
    UploadFile,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: pdf-converter <file.pdf> | pdf-converter health";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so converted text on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_converter=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let Some(arg) = env::args().nth(1) else {
        bail!(USAGE);
    };

    let config = ClientConfig::from_env()?;
    tracing::info!("Using conversion service at {}", config.base_url);

    let client = ConversionClient::new(config)
        .context("Failed to build HTTP client")?
        .with_hooks(Arc::new(TracingHooks));

    if arg == "health" {
        return match client.check_health().await {
            HealthStatus::Healthy { status, message } => {
                println!("{}: {}", status, message);
                Ok(())
            }
            HealthStatus::Unhealthy { error } => bail!("service unhealthy: {}", error),
        };
    }

    let file = UploadFile::from_path(&arg)
        .await
        .with_context(|| format!("Failed to read {}", arg))?;

    let validation = client.validate_file(&file);
    if !validation.valid {
        bail!(validation.error.unwrap_or_default());
    }

    tracing::info!(
        file_name = %file.name,
        file_size = %format_file_size(file.size()),
        pdf_type = %client.detect_pdf_type(&file),
        estimated_seconds = client.estimate_processing_time(&file),
        "Uploading file for conversion"
    );

    let last_reported = AtomicU8::new(0);
    let on_progress: ProgressCallback = Arc::new(move |percent: u8| {
        // Only log in 10% steps
        let step = percent / 10 * 10;
        if last_reported.fetch_max(step, Ordering::Relaxed) < step {
            tracing::info!("Upload progress: {}%", step);
        }
    });

    let result = client.convert(&file, Some(on_progress)).await?;

    if let Some(note) = &result.note {
        tracing::info!("Note from service: {}", note);
    }
    tracing::info!(
        filename = %result.filename,
        processing_method = %result.processing_method,
        "Conversion finished"
    );
    println!("{}", result.content);

    Ok(())
}
