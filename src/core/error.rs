//! 统一错误处理模块
//!
//! 提供音效池范围内的错误类型定义
//!
//! ## 错误类型分层
//!
//! - **协作者错误** (`LoadError`, `PlaybackError`): 资源加载器与播放句柄返回的错误
//! - **音效池错误** (`SoundError`): 音效池操作返回给调用方的错误
//!
//! "未找到" 与 "实例已满" 不是错误，它们通过 `PlayOutcome` 返回并记录日志。

use crate::audio::SoundName;
use thiserror::Error;

/// 资源加载错误
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Asset not found: {path}")]
    NotFound { path: String },

    #[error("Failed to read asset: {path}, reason: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// 将IO错误映射为加载错误，`NotFound` 单独区分
    pub fn from_io(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound { path }
        } else {
            LoadError::Io { path, source }
        }
    }

    pub fn path(&self) -> &str {
        match self {
            LoadError::NotFound { path } | LoadError::Io { path, .. } => path,
        }
    }
}

/// 播放句柄错误
#[derive(Error, Debug, Clone)]
pub enum PlaybackError {
    #[error("Failed to bind stream ({content_type}): {reason}")]
    Bind {
        content_type: String,
        reason: String,
    },

    #[error("Playback failed: {0}")]
    Play(String),

    #[error("Audio output unavailable: {0}")]
    Output(String),
}

/// 音效池错误
#[derive(Error, Debug)]
pub enum SoundError {
    #[error("Failed to load sound {name}: {source}")]
    LoadFailure {
        name: SoundName,
        #[source]
        source: LoadError,
    },

    #[error("Playback error for sound {name}: {source}")]
    Playback {
        name: SoundName,
        #[source]
        source: PlaybackError,
    },

    #[error("Invalid sound pool configuration: {0}")]
    InvalidConfig(String),

    #[error("Sound task cancelled")]
    Cancelled,
}

impl SoundError {
    /// 出错的音效名（如果有）
    pub fn sound_name(&self) -> Option<&SoundName> {
        match self {
            SoundError::LoadFailure { name, .. } | SoundError::Playback { name, .. } => Some(name),
            SoundError::InvalidConfig(_) | SoundError::Cancelled => None,
        }
    }
}

impl From<crate::config::ConfigError> for SoundError {
    fn from(err: crate::config::ConfigError) -> Self {
        SoundError::InvalidConfig(err.to_string())
    }
}

pub type SoundResult<T> = Result<T, SoundError>;
pub type LoadResult<T> = Result<T, LoadError>;
pub type PlaybackResult<T> = Result<T, PlaybackError>;
