//! 音效系统模块
//!
//! 预加载命名音效资源，为每个音效保留最多 N 个可同时播放的实例，
//! 播放时复用空闲实例或在上限内新建实例。
//!
//! ## 组成
//!
//! - [`SoundPool`]: 音效池，实例分配与复用策略
//! - [`AssetLoader`]: 把音效名代入路径模板后解析为可解码的字节流
//! - [`PlaybackBackend`] / [`PlaybackHandle`]: 平台播放原语的抽象
//! - `backend`: 无声后端（`NullBackend`, `ManualBackend`）与可选的 rodio 后端

pub mod backend;
pub mod loader;
pub mod name;
pub mod playback;
pub mod pool;
pub mod stream;


pub use backend::{ManualBackend, ManualHandle, NullBackend, NullHandle};
#[cfg(feature = "rodio-backend")]
pub use backend::{RodioBackend, RodioHandle};
pub use loader::{AssetLoader, FileAssetLoader, MemoryAssetLoader};
pub use name::SoundName;
pub use playback::{PlaybackBackend, PlaybackHandle, PlaybackState};
pub use pool::{PlayOutcome, PoolStats, PreloadHandle, PreloadReport, PreloadStatus, SoundPool};
pub use stream::{content_type_for_path, AssetStream};
