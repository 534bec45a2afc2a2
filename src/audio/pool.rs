//! 音效池
//!
//! 为每个音效名维护一组可播放实例（最多 `max_instances` 个），
//! 播放时优先复用空闲实例，否则在上限内新建实例。
//!
//! ## 设计原则
//!
//! 1. **显式所有权**: 音效池是显式创建并注入给调用方的对象，内部用 `Arc` 共享，克隆代价很低
//! 2. **按音效名串行化**: 每个音效名的实例列表由一把异步互斥锁保护，
//!    "扫描空闲实例 → 扩容 → 播放" 在锁内完成，实例数上限在并发下同样成立
//! 3. **可观察的预加载**: 预加载在后台并发执行，失败总会记录日志；
//!    调用方可以丢弃 [`PreloadHandle`]，也可以等待它拿到 [`PreloadReport`]
//!
//! ```text
//! play(name)
//!   ├─ 未缓存            → PlayOutcome::NotFound
//!   ├─ 有空闲实例         → 复用第一个空闲实例
//!   ├─ 实例数 < 上限      → 加载新实例并追加
//!   └─ 实例数 == 上限     → PlayOutcome::MaxInstancesReached
//! ```
//!
//! ## 使用示例
//!
//! ```rust
//! use sfx_engine::audio::{ManualBackend, MemoryAssetLoader, PlayOutcome, SoundPool};
//! use sfx_engine::config::SoundPoolConfig;
//!
//! # async fn demo() -> sfx_engine::core::error::SoundResult<()> {
//! let loader = MemoryAssetLoader::new().with_asset("Assets/Sounds/coin.wav", vec![0u8; 16]);
//! let pool = SoundPool::new(SoundPoolConfig::default(), loader, ManualBackend::new())?;
//!
//! pool.preload_all(["Coin"]).await;
//! let outcome = pool.play("COIN").await?;
//! assert!(matches!(outcome, PlayOutcome::Started { reused: true, .. }));
//! # Ok(())
//! # }
//! ```

use crate::audio::{AssetLoader, PlaybackBackend, PlaybackHandle, SoundName};
use crate::config::SoundPoolConfig;
use crate::core::error::{SoundError, SoundResult};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// 单个音效的实例列表
struct SlotState<H> {
    handles: Vec<H>,
    /// 已被 teardown 移出缓存，持有旧 `Arc` 的调用不能再扩容
    closed: bool,
}

impl<H> SlotState<H> {
    fn new(handles: Vec<H>) -> Self {
        Self {
            handles,
            closed: false,
        }
    }
}

type Slot<H> = Arc<Mutex<SlotState<H>>>;

/// 一次播放请求的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// 已开始播放
    Started {
        /// 实例在该音效列表中的下标
        instance: usize,
        /// 是否复用了已有实例
        reused: bool,
    },
    /// 音效未被缓存，或在等待播放时已被 teardown 移除
    NotFound,
    /// 所有实例都在播放且已达上限
    MaxInstancesReached { max: usize },
}

impl PlayOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, PlayOutcome::Started { .. })
    }
}

/// 单个音效的预加载结果
#[derive(Debug)]
pub enum PreloadStatus {
    /// 已加载并缓存
    Loaded,
    /// 已在缓存中，跳过
    AlreadyCached,
    /// 加载完成时音效池已被销毁，结果被丢弃
    Discarded,
    /// 加载失败
    Failed(SoundError),
}

/// 一次预加载的汇总结果，顺序与请求顺序一致（重复的名字只保留第一次）
#[derive(Debug, Default)]
pub struct PreloadReport {
    entries: Vec<(SoundName, PreloadStatus)>,
}

impl PreloadReport {
    pub fn entries(&self) -> &[(SoundName, PreloadStatus)] {
        &self.entries
    }

    pub fn status(&self, name: impl Into<SoundName>) -> Option<&PreloadStatus> {
        let name: SoundName = name.into();
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, status)| status)
    }

    /// 本次新加载的音效
    pub fn loaded(&self) -> Vec<&SoundName> {
        self.entries
            .iter()
            .filter(|(_, status)| matches!(status, PreloadStatus::Loaded))
            .map(|(name, _)| name)
            .collect()
    }

    pub fn failures(&self) -> Vec<(&SoundName, &SoundError)> {
        self.entries
            .iter()
            .filter_map(|(name, status)| match status {
                PreloadStatus::Failed(err) => Some((name, err)),
                _ => None,
            })
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.failures().is_empty()
    }
}

/// 后台预加载任务
///
/// 丢弃该句柄不会取消加载；等待它可以拿到每个音效的加载结果。
#[derive(Debug)]
pub struct PreloadHandle {
    task: JoinHandle<PreloadReport>,
}

impl PreloadHandle {
    /// 等待所有加载完成
    pub async fn wait(self) -> SoundResult<PreloadReport> {
        match self.task.await {
            Ok(report) => Ok(report),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(SoundError::Cancelled),
        }
    }

    /// 取消尚未完成的加载
    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// 音效池统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// 已缓存的音效数
    pub sounds: usize,
    /// 实例总数
    pub instances: usize,
    /// 播放中的实例数
    pub playing: usize,
}

struct PoolInner<L, B: PlaybackBackend> {
    config: SoundPoolConfig,
    loader: L,
    backend: B,
    entries: DashMap<SoundName, Slot<B::Handle>>,
    /// 每次销毁时递增，销毁前启动的预加载不会写回
    generation: AtomicU64,
}

/// 音效池
pub struct SoundPool<L, B: PlaybackBackend> {
    inner: Arc<PoolInner<L, B>>,
}

impl<L, B: PlaybackBackend> Clone for SoundPool<L, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: AssetLoader, B: PlaybackBackend> SoundPool<L, B> {
    /// 创建音效池，配置无效时返回 `SoundError::InvalidConfig`
    pub fn new(config: SoundPoolConfig, loader: L, backend: B) -> SoundResult<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(PoolInner {
                config,
                loader,
                backend,
                entries: DashMap::new(),
                generation: AtomicU64::new(0),
            }),
        })
    }

    /// 创建音效池并立即在后台预加载一组音效
    ///
    /// 必须在 tokio 运行时中调用。
    pub fn with_preload<I, N>(
        config: SoundPoolConfig,
        loader: L,
        backend: B,
        names: I,
    ) -> SoundResult<(Self, PreloadHandle)>
    where
        I: IntoIterator<Item = N>,
        N: Into<SoundName>,
    {
        let pool = Self::new(config, loader, backend)?;
        let handle = pool.preload(names);
        Ok((pool, handle))
    }

    pub fn config(&self) -> &SoundPoolConfig {
        &self.inner.config
    }

    pub fn max_instances(&self) -> usize {
        self.inner.config.max_instances
    }

    pub fn loader(&self) -> &L {
        &self.inner.loader
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    /// 在后台预加载一组音效，立即返回
    ///
    /// 每个未缓存的音效加载一个资源流并创建一个实例；已缓存的音效跳过。
    /// 必须在 tokio 运行时中调用。
    pub fn preload<I, N>(&self, names: I) -> PreloadHandle
    where
        I: IntoIterator<Item = N>,
        N: Into<SoundName>,
    {
        let names = unique_names(names);
        let generation = self.inner.generation.load(Ordering::SeqCst);
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move { inner.preload_names(names, generation).await });
        PreloadHandle { task }
    }

    /// 预加载一组音效并等待全部完成
    pub async fn preload_all<I, N>(&self, names: I) -> PreloadReport
    where
        I: IntoIterator<Item = N>,
        N: Into<SoundName>,
    {
        let generation = self.inner.generation.load(Ordering::SeqCst);
        self.inner.preload_names(unique_names(names), generation).await
    }

    /// 播放音效
    ///
    /// 未缓存的音效返回 `PlayOutcome::NotFound`，不会创建缓存项。
    /// 扩容时的加载失败以 `SoundError::LoadFailure` 返回。
    pub async fn play(&self, name: impl Into<SoundName>) -> SoundResult<PlayOutcome> {
        let name: SoundName = name.into();
        let Some(slot) = self.inner.slot(&name) else {
            tracing::warn!(target: "sfx", "Sound not found: {}", name);
            return Ok(PlayOutcome::NotFound);
        };
        self.inner.play_slot(&name, &slot).await
    }

    /// 播放音效，未缓存时先创建空缓存项再按扩容规则加载第一个实例
    pub async fn play_or_load(&self, name: impl Into<SoundName>) -> SoundResult<PlayOutcome> {
        let name: SoundName = name.into();
        loop {
            let slot = self.inner.slot_or_insert(&name);
            // 只有缓存项被 teardown 关闭时才会是 NotFound，换新缓存项重试
            match self.inner.play_slot(&name, &slot).await? {
                PlayOutcome::NotFound => continue,
                outcome => return Ok(outcome),
            }
        }
    }

    /// 在后台播放，供同步调用方使用；错误会记录日志
    pub fn play_detached(&self, name: impl Into<SoundName>) -> JoinHandle<SoundResult<PlayOutcome>> {
        let pool = self.clone();
        let name: SoundName = name.into();
        tokio::spawn(async move {
            let result = pool.play(name).await;
            if let Err(err) = &result {
                tracing::error!(target: "sfx", "Detached playback failed: {}", err);
            }
            result
        })
    }

    pub fn contains(&self, name: impl Into<SoundName>) -> bool {
        let name: SoundName = name.into();
        self.inner.entries.contains_key(&name)
    }

    /// 已缓存的音效数
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// 已缓存的音效名（已排序）
    pub fn names(&self) -> Vec<SoundName> {
        let mut names: Vec<SoundName> = self
            .inner
            .entries
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// 某个音效的实例数，未缓存时返回 `None`
    pub async fn instance_count(&self, name: impl Into<SoundName>) -> Option<usize> {
        let slot = self.inner.slot(&name.into())?;
        let state = slot.lock().await;
        Some(state.handles.len())
    }

    /// 某个音效正在播放的实例数，未缓存时返回 `None`
    pub async fn playing_count(&self, name: impl Into<SoundName>) -> Option<usize> {
        let slot = self.inner.slot(&name.into())?;
        let state = slot.lock().await;
        Some(state.handles.iter().filter(|h| !h.state().is_idle()).count())
    }

    pub async fn stats(&self) -> PoolStats {
        let slots = self.inner.slots();
        let mut stats = PoolStats {
            sounds: slots.len(),
            ..PoolStats::default()
        };
        for slot in slots {
            let state = slot.lock().await;
            stats.instances += state.handles.len();
            stats.playing += state.handles.iter().filter(|h| !h.state().is_idle()).count();
        }
        stats
    }

    /// 停止并释放所有实例，清空缓存，返回释放的实例数
    ///
    /// 销毁后音效池仍可继续使用。
    pub async fn teardown(&self) -> usize {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);

        let names: Vec<SoundName> = self
            .inner
            .entries
            .iter()
            .map(|entry| entry.key().clone())
            .collect();

        let mut released = 0;
        for name in names {
            let Some((_, slot)) = self.inner.entries.remove(&name) else {
                continue;
            };
            let mut state = slot.lock().await;
            state.closed = true;
            for handle in state.handles.iter_mut() {
                handle.stop();
            }
            released += state.handles.len();
            state.handles.clear();
        }

        tracing::info!(target: "sfx", "Sound pool torn down, released {} instances", released);
        released
    }
}

impl<L: AssetLoader, B: PlaybackBackend> PoolInner<L, B> {
    fn slot(&self, name: &SoundName) -> Option<Slot<B::Handle>> {
        self.entries.get(name).map(|entry| Arc::clone(entry.value()))
    }

    fn slot_or_insert(&self, name: &SoundName) -> Slot<B::Handle> {
        let entry = self.entries.entry(name.clone()).or_insert_with(|| {
            tracing::debug!(target: "sfx", "Adding {} to the cache", name);
            Arc::new(Mutex::new(SlotState::new(Vec::new())))
        });
        Arc::clone(entry.value())
    }

    fn slots(&self) -> Vec<Slot<B::Handle>> {
        self.entries
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    async fn preload_names(&self, names: Vec<SoundName>, generation: u64) -> PreloadReport {
        let statuses = join_all(names.iter().map(|name| self.preload_one(name, generation))).await;
        PreloadReport {
            entries: names.into_iter().zip(statuses).collect(),
        }
    }

    async fn preload_one(&self, name: &SoundName, generation: u64) -> PreloadStatus {
        if self.entries.contains_key(name) {
            tracing::trace!(target: "sfx", "Sound {} already cached, skipping preload", name);
            return PreloadStatus::AlreadyCached;
        }

        let handle = match self.load_handle(name).await {
            Ok(handle) => handle,
            Err(err) => {
                tracing::warn!(target: "sfx", "Failed to preload sound {}: {}", name, err);
                return PreloadStatus::Failed(err);
            }
        };

        // 在分片锁内检查代数，与 teardown 的清理互斥
        match self.entries.entry(name.clone()) {
            Entry::Occupied(_) => PreloadStatus::AlreadyCached,
            Entry::Vacant(_) if self.generation.load(Ordering::SeqCst) != generation => {
                tracing::debug!(target: "sfx", "Discarding preload of {} after teardown", name);
                PreloadStatus::Discarded
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::new(Mutex::new(SlotState::new(vec![handle]))));
                tracing::debug!(target: "sfx", "Preloaded sound {}", name);
                PreloadStatus::Loaded
            }
        }
    }

    /// 解析资源路径、打开资源流并绑定到新实例
    async fn load_handle(&self, name: &SoundName) -> SoundResult<B::Handle> {
        let path = self.config.asset_path(name);
        let stream = self
            .loader
            .resolve(&path)
            .await
            .map_err(|source| SoundError::LoadFailure {
                name: name.clone(),
                source,
            })?;

        let content_type = stream.content_type().to_owned();
        let mut handle = self
            .backend
            .create_handle()
            .map_err(|source| SoundError::Playback {
                name: name.clone(),
                source,
            })?;
        handle
            .bind_stream(stream, &content_type)
            .map_err(|source| SoundError::Playback {
                name: name.clone(),
                source,
            })?;
        Ok(handle)
    }

    /// 选择实例并播放，整个过程持有该音效的锁
    async fn play_slot(&self, name: &SoundName, slot: &Slot<B::Handle>) -> SoundResult<PlayOutcome> {
        let max = self.config.max_instances;
        let mut state = slot.lock().await;
        if state.closed {
            tracing::debug!(target: "sfx", "Sound {} was torn down while waiting to play", name);
            return Ok(PlayOutcome::NotFound);
        }
        let handles = &mut state.handles;

        // 取第一个空闲实例，不做 LRU
        let idle = handles.iter().position(|h| h.state().is_idle());
        let (instance, reused) = match idle {
            Some(index) => {
                tracing::trace!(target: "sfx", "Reusing instance {} of sound {}", index, name);
                (index, true)
            }
            None if handles.len() < max => {
                let handle = self.load_handle(name).await?;
                handles.push(handle);
                tracing::debug!(
                    target: "sfx",
                    "Adding sound fx instance for sound {}: {} of {}",
                    name,
                    handles.len(),
                    max
                );
                (handles.len() - 1, false)
            }
            None => {
                tracing::warn!(
                    target: "sfx",
                    "Max instances of {} are currently playing ({})",
                    name,
                    max
                );
                return Ok(PlayOutcome::MaxInstancesReached { max });
            }
        };

        handles[instance]
            .play()
            .map_err(|source| SoundError::Playback {
                name: name.clone(),
                source,
            })?;
        Ok(PlayOutcome::Started { instance, reused })
    }
}

fn unique_names<I, N>(names: I) -> Vec<SoundName>
where
    I: IntoIterator<Item = N>,
    N: Into<SoundName>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(Into::into)
        .filter(|name: &SoundName| seen.insert(name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{ManualBackend, MemoryAssetLoader};

    #[tokio::test]
    async fn test_play_on_slot_closed_by_teardown() {
        let loader = MemoryAssetLoader::new().with_asset("Assets/Sounds/boom.wav", vec![0u8; 8]);
        let backend = ManualBackend::new();
        let pool = SoundPool::new(SoundPoolConfig::default(), loader, backend.clone()).unwrap();
        pool.preload_all(["boom"]).await;
        assert!(pool.play("boom").await.unwrap().is_started());

        // 模拟在 teardown 之前拿到旧缓存项的并发播放
        let name = SoundName::new("boom");
        let stale = pool.inner.slot(&name).unwrap();
        assert_eq!(pool.teardown().await, 1);

        let outcome = pool.inner.play_slot(&name, &stale).await.unwrap();
        assert_eq!(outcome, PlayOutcome::NotFound);
        assert!(stale.lock().await.handles.is_empty());
        assert_eq!(backend.handles_created(), 1);
        assert!(!pool.contains("boom"));
    }

    #[tokio::test]
    async fn test_play_or_load_replaces_closed_slot() {
        let loader = MemoryAssetLoader::new().with_asset("Assets/Sounds/boom.wav", vec![0u8; 8]);
        let pool = SoundPool::new(SoundPoolConfig::default(), loader, ManualBackend::new()).unwrap();
        pool.preload_all(["boom"]).await;
        let stale = pool.inner.slot(&SoundName::new("boom")).unwrap();
        pool.teardown().await;

        assert!(stale.lock().await.closed);
        let outcome = pool.play_or_load("boom").await.unwrap();
        assert_eq!(outcome, PlayOutcome::Started { instance: 0, reused: false });
        assert_eq!(pool.instance_count("boom").await, Some(1));
    }
}
