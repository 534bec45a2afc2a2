//! 手动控制的无声后端
//!
//! 句柄在 `play` 之后一直处于 `Playing`，直到调用方通过
//! [`ManualBackend::finish`] 或 [`ManualBackend::finish_all`] 结束播放。
//! 适合测试和需要确定性时序的工具。

use crate::audio::{AssetStream, PlaybackBackend, PlaybackHandle, PlaybackState};
use crate::core::error::{PlaybackError, PlaybackResult};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct HandleControl {
    playing: AtomicBool,
    bound: AtomicBool,
}

#[derive(Debug, Default)]
struct ManualShared {
    handles: Mutex<Vec<Arc<HandleControl>>>,
    plays: AtomicU64,
    fail_bind: AtomicBool,
}

impl ManualShared {
    fn handles(&self) -> MutexGuard<'_, Vec<Arc<HandleControl>>> {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 手动控制的后端，克隆后共享同一组句柄
#[derive(Debug, Clone, Default)]
pub struct ManualBackend {
    shared: Arc<ManualShared>,
}

impl ManualBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已创建的句柄数
    pub fn handles_created(&self) -> usize {
        self.shared.handles().len()
    }

    /// 所有句柄累计播放次数
    pub fn plays(&self) -> u64 {
        self.shared.plays.load(Ordering::SeqCst)
    }

    /// 当前处于 `Playing` 的句柄数
    pub fn playing(&self) -> usize {
        self.shared
            .handles()
            .iter()
            .filter(|h| h.playing.load(Ordering::SeqCst))
            .count()
    }

    /// 结束第 `index` 个创建的句柄的播放
    pub fn finish(&self, index: usize) -> bool {
        match self.shared.handles().get(index) {
            Some(control) => control.playing.swap(false, Ordering::SeqCst),
            None => false,
        }
    }

    /// 结束所有句柄的播放
    pub fn finish_all(&self) {
        for control in self.shared.handles().iter() {
            control.playing.store(false, Ordering::SeqCst);
        }
    }

    /// 之后的 `bind_stream` 调用全部失败，模拟解码错误
    pub fn set_fail_bind(&self, fail: bool) {
        self.shared.fail_bind.store(fail, Ordering::SeqCst);
    }
}

impl PlaybackBackend for ManualBackend {
    type Handle = ManualHandle;

    fn create_handle(&self) -> PlaybackResult<ManualHandle> {
        let control = Arc::new(HandleControl::default());
        self.shared.handles().push(Arc::clone(&control));
        Ok(ManualHandle {
            control,
            shared: Arc::clone(&self.shared),
            stream: None,
        })
    }
}

/// [`ManualBackend`] 创建的句柄
#[derive(Debug)]
pub struct ManualHandle {
    control: Arc<HandleControl>,
    shared: Arc<ManualShared>,
    stream: Option<AssetStream>,
}

impl PlaybackHandle for ManualHandle {
    fn bind_stream(&mut self, stream: AssetStream, content_type: &str) -> PlaybackResult<()> {
        if self.shared.fail_bind.load(Ordering::SeqCst) {
            return Err(PlaybackError::Bind {
                content_type: content_type.to_string(),
                reason: "decoder rejected stream".to_string(),
            });
        }
        self.stream = Some(stream);
        self.control.bound.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn play(&mut self) -> PlaybackResult<()> {
        if !self.control.bound.load(Ordering::SeqCst) {
            return Err(PlaybackError::Play("no stream bound".to_string()));
        }
        // 同一句柄不允许在播放中再次被选中
        if self.control.playing.swap(true, Ordering::SeqCst) {
            return Err(PlaybackError::Play("handle is already playing".to_string()));
        }
        self.shared.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn state(&self) -> PlaybackState {
        if self.control.playing.load(Ordering::SeqCst) {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    fn stop(&mut self) {
        self.control.playing.store(false, Ordering::SeqCst);
    }
}
