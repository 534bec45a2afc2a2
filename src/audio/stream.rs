//! 可解码的资源字节流
//!
//! `AssetStream` 持有共享的只读字节，克隆代价很低；
//! 每次重新播放都可以通过 [`AssetStream::reader`] 得到独立的读取游标。

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// 未知格式时使用的内容类型
pub const OCTET_STREAM: &str = "application/octet-stream";

/// 已打开的音频资源
#[derive(Debug, Clone)]
pub struct AssetStream {
    data: Arc<[u8]>,
    content_type: String,
}

impl AssetStream {
    pub fn new(data: impl Into<Arc<[u8]>>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
        }
    }

    /// 根据路径扩展名推断内容类型
    pub fn from_path_bytes(path: &str, data: impl Into<Arc<[u8]>>) -> Self {
        Self::new(data, content_type_for_path(path))
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 从头开始的独立读取游标（`Read + Seek`）
    pub fn reader(&self) -> Cursor<Arc<[u8]>> {
        Cursor::new(Arc::clone(&self.data))
    }
}

/// 根据扩展名推断音频内容类型
pub fn content_type_for_path(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("wav") | Some("wave") => "audio/wav",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_content_type_inference() {
        assert_eq!(content_type_for_path("Assets/Sounds/boom.wav"), "audio/wav");
        assert_eq!(content_type_for_path("sfx/COIN.OGG"), "audio/ogg");
        assert_eq!(content_type_for_path("a.mp3"), "audio/mpeg");
        assert_eq!(content_type_for_path("noext"), OCTET_STREAM);
    }

    #[test]
    fn test_readers_are_independent() {
        let stream = AssetStream::from_path_bytes("x.wav", vec![1u8, 2, 3]);
        let mut first = stream.reader();
        let mut buf = [0u8; 2];
        first.read_exact(&mut buf).unwrap();

        let mut all = Vec::new();
        stream.reader().read_to_end(&mut all).unwrap();
        assert_eq!(all, vec![1, 2, 3]);
        assert_eq!(stream.content_type(), "audio/wav");
    }
}
