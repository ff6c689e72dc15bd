//! Wait Overlay Core - Headless "Please Wait" Overlay Engine
//!
//! This crate provides the lifecycle logic for blocking "please wait"
//! overlays, completely independent of any rendering toolkit. It can drive a
//! browser DOM binding, a native widget tree, or run headless for
//! testing/automation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Call Sites                                │
//! │      show / hide / text / progress / resize / destroy            │
//! └───────────────────────────┬──────────────────────────────────────┘
//!                             │
//! ┌───────────────────────────┼──────────────────────────────────────┐
//! │                    WAIT OVERLAY CORE                             │
//! │  ┌────────────────────────┴────────────────────────────────────┐ │
//! │  │                      WaitOverlay                             │ │
//! │  │  ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐ │ │
//! │  │  │  Config  │  │ Progress │  │ Container│  │    Fade /    │ │ │
//! │  │  │  Merger  │  │  Model   │  │ Registry │  │    Resize    │ │ │
//! │  │  └──────────┘  └──────────┘  └──────────┘  └──────────────┘ │ │
//! │  └────────────────────────┬────────────────────────────────────┘ │
//! └───────────────────────────┼──────────────────────────────────────┘
//!                             │
//!                Surface calls (down), OverlayEvent (up)
//!                             │
//! ┌───────────────────────────┴──────────────────────────────────────┐
//! │              Surface (DOM binding, native, headless)             │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`WaitOverlay`]: The engine; one instance per surface
//! - [`Surface`]: Rendering and scheduling primitives the engine consumes
//! - [`OverlayEvent`]: Deferred outcomes reported back by the surface
//! - [`Settings`] / [`PartialSettings`]: Configuration tree and its overrides
//! - [`HeadlessSurface`]: In-memory surface with a virtual clock
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//! use waitoverlay_core::{HeadlessSurface, OverlayPhase, PartialSettings, WaitOverlay};
//!
//! let mut overlay = WaitOverlay::new(HeadlessSurface::default());
//!
//! let options = PartialSettings::from_json(r#"{"text": {"enabled": true, "value": "Saving"}}"#)
//!     .unwrap();
//! overlay.show(Some(&options), None);
//! overlay.run_frames();
//! overlay.text("Almost there", None);
//!
//! overlay.hide(false, None);
//! overlay.advance(Duration::from_secs(1));
//! assert_eq!(overlay.phase(None), OverlayPhase::Absent);
//! ```
//!
//! # Module Overview
//!
//! - [`animation`]: Named sub-element animations and time validation
//! - [`config`]: TOML config files and environment overrides
//! - [`engine`]: The overlay lifecycle state machine
//! - [`events`]: Events from surfaces to the engine
//! - [`merge`]: Partial override trees and deep merging
//! - [`progress`]: Value to percentage mapping
//! - [`registry`]: Per-container overlay state
//! - [`settings`]: The full configuration tree and defaults
//! - [`shared`]: Cloneable handle to one engine instance
//! - [`state`]: What the engine tracks per container
//! - [`styles`]: Class names, style tables and size validation
//! - [`surface`]: The surface trait and the headless implementation
//!
//! # No Toolkit Dependencies
//!
//! This crate never touches a DOM, a windowing system or an async runtime.
//! Everything visual goes through [`Surface`].

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod config;
pub mod engine;
pub mod events;
pub mod merge;
pub mod progress;
pub mod registry;
pub mod settings;
pub mod shared;
pub mod state;
pub mod styles;
pub mod surface;

// Re-exports for convenience
pub use engine::{resolve_size, ResolvedSize, TextUpdate, WaitOverlay, FADE_OUT_GRACE};
pub use events::OverlayEvent;
pub use merge::{merge, Merge, PartialSettings};
pub use progress::{to_percent, ProgressUpdate};
pub use registry::ContainerRegistry;
pub use settings::{Settings, Units};
pub use shared::SharedWaitOverlay;
pub use state::{OverlayPhase, OverlayState, SubElementKind};
pub use surface::{
    ContainerId, ContainerMetrics, ElementId, FetchError, FetchHandle, HeadlessElement,
    HeadlessSurface, Surface,
};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, resolve, ConfigError,
    ConfigOverrides, ConfigSource, LoadedConfig,
};
