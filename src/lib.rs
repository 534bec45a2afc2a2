//! # SFX Engine
//!
//! A small in-process sound-effect cache and playback pool for short audio
//! clips in interactive applications.
//!
//! ## Features
//!
//! - **Preloading**: Named sound assets are resolved and decoded ahead of time, concurrently
//! - **Instance Pooling**: Up to `max_instances` concurrently playable instances per sound
//! - **Reuse Policy**: Playback reuses the first idle instance before allocating a new one
//! - **Pluggable Platform**: Asset storage and playback sit behind the `AssetLoader` and
//!   `PlaybackBackend` traits, with headless backends for tests and an optional rodio backend
//!
//! ### Example
//!
//! ```no_run
//! use sfx_engine::audio::{FileAssetLoader, NullBackend, SoundPool};
//! use sfx_engine::config::SfxConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SfxConfig::load_or_default();
//!     sfx_engine::core::init_logging(&config.logging);
//!
//!     let pool = SoundPool::new(config.pool, FileAssetLoader::new("."), NullBackend)?;
//!     pool.preload(["explosion", "laser"]);
//!     pool.play("Explosion").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`audio`]: Sound pool, asset loading and playback backends
//! - [`config`]: Configuration loading (TOML/JSON/environment)
//! - [`core`]: Errors, logging and shared macros

/// Errors, logging and shared macros
pub mod core;
/// Sound pool, asset loading and playback backends
pub mod audio;
/// Configuration system
pub mod config;

pub use audio::{PlayOutcome, SoundName, SoundPool};
pub use crate::core::error::{SoundError, SoundResult};
