//! Wait Overlay Demo
//!
//! Drives a page overlay on the headless surface in real time: shows it,
//! walks a progress bar to completion, hides it and prints the element tree
//! along the way. The virtual clock of the surface follows the wall clock,
//! and vector images are "fetched" from the local filesystem.
//!
//! # Usage
//!
//! ```bash
//! # Default run
//! waitoverlay-demo
//!
//! # Custom options and a fetched vector image
//! waitoverlay-demo --options '{"background": "#000"}' --image ./spinner.svg
//!
//! # With verbose logging
//! RUST_LOG=debug waitoverlay-demo
//! ```
//!
//! # Environment Variables
//!
//! - `WAITOVERLAY_CONFIG`: Config file path (default: `$XDG_CONFIG_HOME/waitoverlay/config.toml`)
//! - `WAITOVERLAY_FADE_IN`, `WAITOVERLAY_FADE_OUT`, `WAITOVERLAY_SIZE`,
//!   `WAITOVERLAY_Z_INDEX`, `WAITOVERLAY_BACKGROUND`: Baseline overrides
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{info, warn};

use waitoverlay_core::config::{self, ConfigOverrides};
use waitoverlay_core::merge::{PartialImage, PartialProgress, PartialText};
use waitoverlay_core::{
    merge, FetchError, HeadlessSurface, Merge, OverlayPhase, PartialSettings, Settings, Surface,
    WaitOverlay,
};

/// Headless "please wait" overlay walkthrough
#[derive(Debug, Parser)]
#[command(name = "waitoverlay-demo", version, about)]
struct Args {
    /// Config file to load instead of the default location
    #[arg(long, env = "WAITOVERLAY_CONFIG")]
    config: Option<PathBuf>,

    /// JSON options passed to the show call
    #[arg(long)]
    options: Option<String>,

    /// Vector image file to fetch and inject
    #[arg(long)]
    image: Option<PathBuf>,

    /// Text shown next to the progress bar
    #[arg(long, default_value = "Working")]
    text: String,

    /// Number of progress steps
    #[arg(long, default_value_t = 5)]
    steps: u32,

    /// Delay between progress steps in milliseconds
    #[arg(long, default_value_t = 200)]
    step_ms: u64,

    /// Viewport width
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height
    #[arg(long, default_value_t = 720.0)]
    height: f64,
}

/// Load the settings baseline, falling back to defaults on a bad config file
fn load_settings(path: Option<&std::path::Path>) -> Settings {
    let overrides = ConfigOverrides::from_env();
    match config::resolve(path, &overrides) {
        Ok(loaded) => {
            for source in &loaded.sources {
                info!(source = %source, "Config layer applied");
            }
            loaded.settings
        }
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            let partial = overrides.to_partial(&Settings::default());
            merge(&Settings::default(), Some(&partial))
        }
    }
}

/// Build the show options: text and progress on, then the caller's JSON on top
fn show_options(args: &Args) -> anyhow::Result<PartialSettings> {
    let mut options = PartialSettings {
        text: Some(PartialText {
            enabled: Some(true),
            value: Some(args.text.clone()),
            ..Default::default()
        }),
        progress: Some(PartialProgress {
            enabled: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    };
    if let Some(image) = &args.image {
        options.merge_from(&PartialSettings {
            image: Some(PartialImage {
                value: Some(image.display().to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });
    }
    if let Some(json) = &args.options {
        options.merge_from(&config::options_from_json(json)?);
    }
    Ok(options)
}

/// Serve pending fetches from the local filesystem
async fn serve_fetches(overlay: &mut WaitOverlay<HeadlessSurface>) {
    for (handle, url) in overlay.surface().pending_fetches() {
        let result = tokio::fs::read_to_string(&url).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound(url.clone())
            } else {
                FetchError::Transport(e.to_string())
            }
        });
        overlay.surface_mut().resolve_fetch(handle, result);
    }
    overlay.pump();
}

/// Sleep for `delay`, then move the virtual clock by the time that really passed
async fn sleep_and_sync(overlay: &mut WaitOverlay<HeadlessSurface>, delay: Duration) {
    let started = Instant::now();
    tokio::time::sleep(delay).await;
    overlay.advance(started.elapsed());
    overlay.run_frames();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("waitoverlay_demo=info".parse()?)
                .add_directive("waitoverlay_core=info".parse()?),
        )
        .with_target(true)
        .init();

    let args = Args::parse();
    info!("Starting wait overlay demo");

    let settings = load_settings(args.config.as_deref());
    let options = show_options(&args)?;
    let surface = HeadlessSurface::new((args.width, args.height));
    let page = surface.page_root();
    let mut overlay = WaitOverlay::with_settings(surface, settings);

    overlay.show(Some(&options), None);
    overlay.run_frames();
    serve_fetches(&mut overlay).await;
    println!("{}", overlay.surface().render_tree(page));

    let steps = args.steps.max(1);
    for step in 1..=steps {
        sleep_and_sync(&mut overlay, Duration::from_millis(args.step_ms)).await;
        let percent = f64::from(step) * 100.0 / f64::from(steps);
        overlay.progress(percent, None);
        overlay.text(format!("{} ({percent:.0}%)", args.text), None);
        info!(step, percent, "Progress");
    }
    println!("{}", overlay.surface().render_tree(page));

    overlay.hide(false, None);
    while overlay.phase(None) == OverlayPhase::FadingOut {
        let Some(due) = overlay.surface().next_timer_due() else {
            break;
        };
        sleep_and_sync(&mut overlay, due).await;
    }

    info!(phase = ?overlay.phase(None), "Overlay hidden");
    println!("{}", overlay.surface().render_tree(page));
    Ok(())
}
