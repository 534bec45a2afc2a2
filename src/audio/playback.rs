//! 播放句柄抽象
//!
//! 平台相关的媒体原语通过 [`PlaybackBackend`] 与 [`PlaybackHandle`] 接入，
//! 音效池本身只依赖这两个 trait。

use crate::audio::AssetStream;
use crate::core::error::PlaybackResult;

/// 播放句柄状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    /// 已停止或已暂停，可复用
    Idle,
    /// 播放中，不可复用
    Playing,
}

impl PlaybackState {
    pub fn is_idle(self) -> bool {
        matches!(self, PlaybackState::Idle)
    }
}

/// 一个已解码、可播放的音效实例
pub trait PlaybackHandle: Send + 'static {
    /// 绑定资源流，绑定后处于 `Idle` 状态
    fn bind_stream(&mut self, stream: AssetStream, content_type: &str) -> PlaybackResult<()>;

    /// 从头开始播放
    fn play(&mut self) -> PlaybackResult<()>;

    fn state(&self) -> PlaybackState;

    /// 停止播放，音效池销毁时调用
    fn stop(&mut self) {}
}

/// 播放句柄工厂
pub trait PlaybackBackend: Send + Sync + 'static {
    type Handle: PlaybackHandle;

    fn create_handle(&self) -> PlaybackResult<Self::Handle>;
}
