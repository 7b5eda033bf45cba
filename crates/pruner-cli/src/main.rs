use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tokio::time::{Duration, sleep};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pruner_core::impls::{EpochCounter, ScopedCache};
use pruner_core::{PruneError, PruneInterval, Prunable, PrunerBuilder, PrunerSettings};

/// Request scope used as a cache key; dropping it makes its entries reclaimable.
struct RequestScope {
    id: usize,
}

/// Buffers samples and drops them on every prune.
#[derive(Default)]
struct SampleBuffer {
    samples: Mutex<Vec<u64>>,
    drained: AtomicUsize,
}

#[async_trait]
impl Prunable for SampleBuffer {
    async fn prune(&self) -> Result<(), PruneError> {
        let mut samples = self.samples.lock().await;
        self.drained.fetch_add(samples.len(), Ordering::Relaxed);
        samples.clear();
        Ok(())
    }

    fn name(&self) -> &str {
        "sample-buffer"
    }
}

#[derive(Serialize)]
struct Summary {
    sessions_left: usize,
    samples_drained: usize,
    stats: pruner_core::PrunerStats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // (A) 設定: 引数の JSON ファイル、なければ 200ms
    let settings = match std::env::args().nth(1) {
        Some(path) => PrunerSettings::from_json_file(path)?,
        None => PrunerSettings::new(PruneInterval::from_millis(200)?),
    };
    info!(interval = %settings.cache_pruning_interval, "loaded settings");

    // (B) Pruner と剪定対象
    let epoch = Arc::new(EpochCounter::new());
    let pruner = PrunerBuilder::new()
        .settings(settings)
        .signal(epoch.clone())
        .build();

    let sessions: Arc<ScopedCache<String>> = Arc::new(ScopedCache::new("sessions"));
    let samples = Arc::new(SampleBuffer::default());
    pruner.start(&sessions).await?;
    pruner.start(&samples).await?;

    // (C) リクエストを模擬: scope を作って捨て、回収パスを通知
    for round in 0..5 {
        let scope = Arc::new(RequestScope { id: round });
        sessions
            .remember(&scope, format!("session-{}", scope.id))
            .await;
        samples.samples.lock().await.extend(0..(round as u64 + 1));
        drop(scope);

        if round % 2 == 1 {
            epoch.advance();
        }
        sleep(Duration::from_millis(250)).await;
    }

    // Never の設定でも最後に一度は剪定する
    epoch.advance();
    pruner.tick().await;

    // (D) 停止して結果を出す
    let stats = pruner.stats().await;
    pruner.stop().await;

    let summary = Summary {
        sessions_left: sessions.len().await,
        samples_drained: samples.drained.load(Ordering::Relaxed),
        stats,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
