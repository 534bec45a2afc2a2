//! 播放后端实现
//!
//! - `null`: 无声后端，播放立即结束
//! - `manual`: 无声后端，由调用方控制播放何时结束
//! - `rodio`: 基于 rodio 的真实音频输出（需要 `rodio-backend` 特性）

pub mod manual;
pub mod null;

#[cfg(feature = "rodio-backend")]
pub mod rodio;

pub use manual::{ManualBackend, ManualHandle};
pub use null::{NullBackend, NullHandle};

#[cfg(feature = "rodio-backend")]
pub use self::rodio::{RodioBackend, RodioHandle};
