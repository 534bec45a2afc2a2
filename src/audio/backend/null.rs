use crate::audio::{AssetStream, PlaybackBackend, PlaybackHandle, PlaybackState};
use crate::core::error::{PlaybackError, PlaybackResult};

/// 无声后端，用于无音频设备的环境
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl PlaybackBackend for NullBackend {
    type Handle = NullHandle;

    fn create_handle(&self) -> PlaybackResult<NullHandle> {
        Ok(NullHandle::default())
    }
}

/// 播放立即结束的句柄，状态始终为 `Idle`
#[derive(Debug, Default)]
pub struct NullHandle {
    stream: Option<AssetStream>,
    plays: u64,
}

impl NullHandle {
    pub fn plays(&self) -> u64 {
        self.plays
    }
}

impl PlaybackHandle for NullHandle {
    fn bind_stream(&mut self, stream: AssetStream, _content_type: &str) -> PlaybackResult<()> {
        self.stream = Some(stream);
        Ok(())
    }

    fn play(&mut self) -> PlaybackResult<()> {
        if self.stream.is_none() {
            return Err(PlaybackError::Play("no stream bound".to_string()));
        }
        self.plays += 1;
        Ok(())
    }

    fn state(&self) -> PlaybackState {
        PlaybackState::Idle
    }
}
