//! 基于 rodio 的播放后端
//!
//! 输出流 (`OutputStream`) 由调用方持有并保持存活；后端只保存它的混音器，
//! 每个句柄对应一个 `Sink`。

use crate::audio::{AssetStream, PlaybackBackend, PlaybackHandle, PlaybackState};
use crate::core::error::{PlaybackError, PlaybackResult};
use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

/// rodio 播放后端
#[derive(Clone)]
pub struct RodioBackend {
    mixer: Mixer,
}

impl RodioBackend {
    /// 使用已打开的输出流
    pub fn new(stream: &OutputStream) -> Self {
        Self {
            mixer: stream.mixer().clone(),
        }
    }

    /// 打开默认输出设备，返回的 `OutputStream` 必须在播放期间保持存活
    pub fn open_default() -> PlaybackResult<(OutputStream, Self)> {
        let stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::Output(e.to_string()))?;
        let backend = Self::new(&stream);
        Ok((stream, backend))
    }
}

impl PlaybackBackend for RodioBackend {
    type Handle = RodioHandle;

    fn create_handle(&self) -> PlaybackResult<RodioHandle> {
        Ok(RodioHandle {
            sink: Sink::connect_new(&self.mixer),
            stream: None,
        })
    }
}

/// 一个 `Sink` 加上它绑定的资源流
pub struct RodioHandle {
    sink: Sink,
    stream: Option<AssetStream>,
}

impl PlaybackHandle for RodioHandle {
    fn bind_stream(&mut self, stream: AssetStream, content_type: &str) -> PlaybackResult<()> {
        // 绑定时试解码一次，格式错误在加载阶段就能暴露
        Decoder::new(stream.reader()).map_err(|e| PlaybackError::Bind {
            content_type: content_type.to_string(),
            reason: e.to_string(),
        })?;
        self.stream = Some(stream);
        Ok(())
    }

    fn play(&mut self) -> PlaybackResult<()> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| PlaybackError::Play("no stream bound".to_string()))?;
        let source =
            Decoder::new(stream.reader()).map_err(|e| PlaybackError::Play(e.to_string()))?;

        self.sink.clear();
        self.sink.append(source);
        self.sink.play();
        Ok(())
    }

    fn state(&self) -> PlaybackState {
        if self.sink.empty() || self.sink.is_paused() {
            PlaybackState::Idle
        } else {
            PlaybackState::Playing
        }
    }

    fn stop(&mut self) {
        self.sink.stop();
    }
}
