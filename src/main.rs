//! screenlens - driver binary
//!
//! Wires the subprocess-backed collaborators to the pipeline and runs
//! the single-threaded trigger loop: one pipeline run per input line,
//! Ctrl-C (or EOF) to exit. Triggers arriving mid-run are served after
//! the current run completes; the loop never overlaps runs.

use screenlens::{
    AccessibilityClient, CaptureClient, CaptureCoordinator, Config, ConsoleSurface, PngEncoder,
    PresentationSurface, RecognitionClient, TriggerEvent,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.general.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting screenlens");

    if !config.general.enabled {
        info!("Pipeline disabled in configuration, exiting");
        return Ok(());
    }

    let mut coordinator = CaptureCoordinator::new(
        &config,
        Box::new(CaptureClient::new(&config.capture)),
        Box::new(PngEncoder),
        Box::new(AccessibilityClient::new(&config.accessibility)),
        Box::new(RecognitionClient::new(&config.recognition)),
    );
    let mut surface = ConsoleSurface::new();

    info!("Artifact path: {:?}", coordinator.artifact_path());
    println!("Press Enter to capture the foreground window, Ctrl-C to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(_) => {
                        match coordinator.run(TriggerEvent::Hotkey).await {
                            Ok(result) => surface.present(&result.render()),
                            Err(e) => surface.present(&e.user_message()),
                        }
                    }
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("Shutting down");
    Ok(())
}
