use sfx_engine::audio::*;
use sfx_engine::config::{SfxConfig, SoundPoolConfig};
use sfx_engine::SoundError;
use std::time::Duration;

fn write_sound(root: &std::path::Path, name: &str) {
    let dir = root.join("Assets").join("Sounds");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{}.wav", name)), b"RIFF....WAVEfmt ").unwrap();
}

#[tokio::test]
async fn test_file_backed_pool_lifecycle() {
    let root = tempfile::tempdir().unwrap();
    write_sound(root.path(), "explosion");
    write_sound(root.path(), "laser");

    let backend = ManualBackend::new();
    let pool = SoundPool::new(
        SoundPoolConfig::default(),
        FileAssetLoader::new(root.path()),
        backend.clone(),
    )
    .unwrap();

    // 创建音效池后预加载
    let report = pool
        .preload(["Explosion", "Laser", "Missing"])
        .wait()
        .await
        .unwrap();
    assert_eq!(report.loaded().len(), 2);
    assert_eq!(report.failures().len(), 1);
    assert_eq!(pool.names(), vec![SoundName::new("explosion"), SoundName::new("laser")]);

    // 播放
    let outcome = pool.play("explosion").await.unwrap();
    assert_eq!(outcome, PlayOutcome::Started { instance: 0, reused: true });
    assert_eq!(pool.play("missing").await.unwrap(), PlayOutcome::NotFound);

    // 销毁
    assert_eq!(pool.teardown().await, 2);
    assert!(pool.is_empty());
    assert_eq!(backend.playing(), 0);
}

#[tokio::test]
async fn test_growth_law_with_two_instances() {
    let loader = MemoryAssetLoader::new().with_asset("Assets/Sounds/explosion.wav", vec![1u8; 64]);
    let pool = SoundPool::new(
        SoundPoolConfig::default().with_max_instances(2),
        loader,
        ManualBackend::new(),
    )
    .unwrap();

    assert_eq!(pool.play("explosion").await.unwrap(), PlayOutcome::NotFound);
    assert!(pool.is_empty());

    pool.preload_all(["explosion"]).await;
    let outcomes = [
        pool.play("explosion").await.unwrap(),
        pool.play("Explosion").await.unwrap(),
        pool.play("EXPLOSION").await.unwrap(),
    ];

    assert!(outcomes[0].is_started());
    assert!(outcomes[1].is_started());
    assert_eq!(outcomes[2], PlayOutcome::MaxInstancesReached { max: 2 });
    assert_eq!(pool.instance_count("explosion").await, Some(2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bound_holds_across_many_sounds_under_contention() {
    let names = ["a", "b", "c"];
    let loader = MemoryAssetLoader::new().with_latency(Duration::from_millis(2));
    for name in names {
        loader.insert(format!("sfx/{}.ogg", name), vec![0u8; 16]);
    }
    let config = SoundPoolConfig::default()
        .with_max_instances(3)
        .with_asset_path_template("sfx/{name}.ogg");
    let pool = SoundPool::new(config, loader, ManualBackend::new()).unwrap();

    let tasks: Vec<_> = (0..60)
        .map(|i| {
            let pool = pool.clone();
            let name = names[i % names.len()].to_uppercase();
            tokio::spawn(async move { pool.play_or_load(name).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    for name in names {
        assert_eq!(pool.instance_count(name).await, Some(3));
    }
    let stats = pool.stats().await;
    assert_eq!(stats.instances, 9);
    assert_eq!(stats.playing, 9);
}

#[tokio::test]
async fn test_null_backend_always_reuses() {
    let loader = MemoryAssetLoader::new().with_asset("Assets/Sounds/tick.wav", vec![0u8; 4]);
    let pool = SoundPool::new(SoundPoolConfig::default(), loader, NullBackend).unwrap();
    pool.preload_all(["tick"]).await;

    for _ in 0..10 {
        let outcome = pool.play("tick").await.unwrap();
        assert_eq!(outcome, PlayOutcome::Started { instance: 0, reused: true });
    }
    assert_eq!(pool.instance_count("tick").await, Some(1));
}

#[tokio::test]
async fn test_pool_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sfx.toml");
    std::fs::write(
        &path,
        r#"
        [pool]
        max_instances = 1
        asset_path_template = "audio/{name}.wav"

        [logging]
        level = "Debug"
        ansi = false
        "#,
    )
    .unwrap();

    let config = SfxConfig::from_toml_file(&path).unwrap();
    config.validate().unwrap();
    sfx_engine::core::init_logging(&config.logging);

    let loader = MemoryAssetLoader::new().with_asset("audio/coin.wav", vec![0u8; 4]);
    let pool = SoundPool::new(config.pool, loader, ManualBackend::new()).unwrap();
    pool.preload_all(["coin"]).await;

    assert!(pool.play("coin").await.unwrap().is_started());
    assert_eq!(
        pool.play("coin").await.unwrap(),
        PlayOutcome::MaxInstancesReached { max: 1 }
    );
}

#[tokio::test]
async fn test_invalid_template_rejected() {
    let config = SoundPoolConfig::default().with_asset_path_template("Assets/Sounds/fixed.wav");
    let result = SoundPool::new(config, MemoryAssetLoader::new(), NullBackend);
    assert!(matches!(result, Err(SoundError::InvalidConfig(_))));
}
