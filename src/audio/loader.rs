//! 资源加载器
//!
//! [`AssetLoader`] 把资源路径解析为可解码的 [`AssetStream`]。
//! 提供两个实现：
//! - [`FileAssetLoader`]: 基于 `tokio::fs` 的文件系统加载
//! - [`MemoryAssetLoader`]: 内存中的资源表，可模拟IO延迟，用于测试和内嵌资源

use crate::audio::AssetStream;
use crate::core::error::{LoadError, LoadResult};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// 资源加载器
///
/// `resolve` 是音效池中唯一会挂起的操作。
pub trait AssetLoader: Send + Sync + 'static {
    fn resolve(&self, path: &str) -> impl Future<Output = LoadResult<AssetStream>> + Send;
}

impl<L: AssetLoader> AssetLoader for Arc<L> {
    fn resolve(&self, path: &str) -> impl Future<Output = LoadResult<AssetStream>> + Send {
        (**self).resolve(path)
    }
}

/// 文件系统资源加载器
#[derive(Debug, Clone)]
pub struct FileAssetLoader {
    root: PathBuf,
}

impl FileAssetLoader {
    /// 以 `root` 为安装目录，资源路径相对于它解析
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetLoader for FileAssetLoader {
    fn resolve(&self, path: &str) -> impl Future<Output = LoadResult<AssetStream>> + Send {
        let full_path = self.root.join(path);
        let path = path.to_owned();
        async move {
            let data = tokio::fs::read(&full_path)
                .await
                .map_err(|e| LoadError::from_io(path.clone(), e))?;
            Ok(AssetStream::from_path_bytes(&path, data))
        }
    }
}

/// 内存资源加载器
#[derive(Debug, Default)]
pub struct MemoryAssetLoader {
    assets: RwLock<HashMap<String, Arc<[u8]>>>,
    latency: Option<Duration>,
    resolves: AtomicUsize,
}

impl MemoryAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每次解析前等待 `latency`，模拟存储IO
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_asset(self, path: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        self.insert(path, data);
        self
    }

    pub fn insert(&self, path: impl Into<String>, data: impl Into<Arc<[u8]>>) {
        if let Ok(mut assets) = self.assets.write() {
            assets.insert(path.into(), data.into());
        }
    }

    pub fn remove(&self, path: &str) -> bool {
        self.assets
            .write()
            .map(|mut assets| assets.remove(path).is_some())
            .unwrap_or(false)
    }

    /// 已执行的解析次数（包括失败的解析）
    pub fn resolve_count(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }

    fn lookup(&self, path: &str) -> Option<Arc<[u8]>> {
        self.assets
            .read()
            .ok()
            .and_then(|assets| assets.get(path).cloned())
    }
}

impl AssetLoader for MemoryAssetLoader {
    fn resolve(&self, path: &str) -> impl Future<Output = LoadResult<AssetStream>> + Send {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        let latency = self.latency;
        let found = self.lookup(path);
        let path = path.to_owned();
        async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            match found {
                Some(data) => Ok(AssetStream::from_path_bytes(&path, data)),
                None => Err(LoadError::NotFound { path }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_loader_resolves_registered_assets() {
        let loader = MemoryAssetLoader::new().with_asset("Assets/Sounds/coin.wav", vec![7u8; 4]);

        let stream = loader.resolve("Assets/Sounds/coin.wav").await.unwrap();
        assert_eq!(stream.len(), 4);
        assert_eq!(stream.content_type(), "audio/wav");

        let missing = loader.resolve("Assets/Sounds/none.wav").await;
        assert!(matches!(missing, Err(LoadError::NotFound { .. })));
        assert_eq!(loader.resolve_count(), 2);
    }

    #[tokio::test]
    async fn test_memory_loader_remove() {
        let loader = MemoryAssetLoader::new().with_asset("a.ogg", vec![1u8]);
        assert!(loader.remove("a.ogg"));
        assert!(!loader.remove("a.ogg"));
        assert!(loader.resolve("a.ogg").await.is_err());
    }

    #[tokio::test]
    async fn test_file_loader_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let sounds = dir.path().join("Assets").join("Sounds");
        std::fs::create_dir_all(&sounds).unwrap();
        std::fs::write(sounds.join("laser.wav"), b"RIFF").unwrap();

        let loader = FileAssetLoader::new(dir.path());
        let stream = loader.resolve("Assets/Sounds/laser.wav").await.unwrap();
        assert_eq!(stream.bytes(), b"RIFF");
        assert_eq!(stream.content_type(), "audio/wav");

        let missing = loader.resolve("Assets/Sounds/nope.wav").await;
        match missing {
            Err(LoadError::NotFound { path }) => assert_eq!(path, "Assets/Sounds/nope.wav"),
            other => panic!("unexpected result: {:?}", other.map(|s| s.len())),
        }
    }
}
