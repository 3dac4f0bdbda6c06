//! Lip overlay demo binary.

use std::sync::{Arc, Mutex};

use anyhow::Context;
use image::{Rgba, RgbaImage};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lipglow_app::{AppConfig, SyntheticCamera, SyntheticDetector, SyntheticPermissions};
use lipglow_models::Feature;
use lipglow_overlay::{lock_surface, FeatureSelector, LayerTree, OverlayError, OverlaySession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lipglow=info,lipglow_overlay=info,lipglow_app=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting lipglow");

    let config = AppConfig::from_env().context("failed to load configuration")?;
    info!("App config: {:?}", config);

    let menu: Vec<String> = Feature::menu_options().into_iter().map(|o| o.label).collect();
    info!(?menu, "Feature menu");

    let surface = Arc::new(Mutex::new(LayerTree::new()));
    let selector = FeatureSelector::new();
    let camera = SyntheticCamera::new(
        config.frame_width,
        config.frame_height,
        config.frame_interval(),
        config.frame_budget,
    );
    let mut progress = camera.progress();
    let detector = SyntheticDetector::new(config.detect_latency, config.dropout_every);
    let permissions = SyntheticPermissions::new(config.camera_permission);

    let session = match OverlaySession::start(
        config.overlay.clone(),
        selector.clone(),
        Arc::clone(&surface),
        detector,
        camera,
        &permissions,
    )
    .await
    {
        Ok(session) => session,
        Err(OverlayError::PermissionDenied {
            title,
            message,
            settings_url,
        }) => {
            // No UI to show an alert in, so the alert goes to the log
            error!(%settings_url, "{}: {}", title, message);
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("failed to start overlay session"),
    };

    let script = config.selection_script.clone();
    let frame_interval = config.frame_interval();
    let taps = tokio::spawn(async move { script.play(selector, frame_interval).await });

    let budget = config.frame_budget;
    if session.is_capturing() {
        tokio::select! {
            result = progress.wait_for(|n| *n >= budget) => {
                if result.is_err() {
                    warn!("Camera stopped before frame budget was reached");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
            }
        }
    } else {
        warn!("No camera, nothing to do");
    }

    taps.abort();
    let summary = session.shutdown().await;
    info!(
        frames_processed = summary.frames_processed,
        frames_dropped = summary.frames_dropped,
        overlay_visible = summary.overlay_visible,
        "Run complete"
    );

    if let Some(path) = config.snapshot_path.as_deref() {
        let width = config.overlay.viewport.width.round().max(1.0) as u32;
        let height = config.overlay.viewport.height.round().max(1.0) as u32;
        let preview = RgbaImage::from_pixel(width, height, Rgba([32, 32, 32, 255]));
        lock_surface(&surface)
            .write_snapshot(&preview, path)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
    }

    info!("Shutdown complete");
    Ok(())
}
