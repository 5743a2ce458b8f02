use std::fmt::Display;

use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Upstream top-headlines page for (country, category, page)
    Headlines {
        country: String,
        category: Option<String>,
        page: u32,
    },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Headlines {
                country,
                category,
                page,
            } => write!(
                f,
                "headlines:{}:{}:{}",
                country.to_lowercase(),
                category.as_deref().unwrap_or("all").to_lowercase(),
                page
            ),
        }
    }
}

pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    Ok(Client::open(redis_url)?)
}

struct PendingWrite {
    key: String,
    value: String,
    ttl: u64,
}

/// Best-effort JSON cache over a shared Redis connection
///
/// Reads go straight to Redis; writes are queued for a background task so a
/// slow Redis never delays a response.
#[derive(Clone)]
pub struct Cache {
    conn: ConnectionManager,
    write_tx: mpsc::UnboundedSender<PendingWrite>,
}

/// Stops the background writer once queued writes are flushed
pub struct CacheWriterHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl CacheWriterHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

impl Cache {
    /// Opens the shared connection and spawns the writer task
    pub async fn connect(redis_client: Client) -> AppResult<(Self, CacheWriterHandle)> {
        let conn = ConnectionManager::new(redis_client).await?;
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(Self::run_writer(conn.clone(), write_rx, shutdown_rx));

        Ok((Self { conn, write_tx }, CacheWriterHandle { shutdown_tx, task }))
    }

    async fn run_writer(
        conn: ConnectionManager,
        mut write_rx: mpsc::UnboundedReceiver<PendingWrite>,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) {
        tracing::info!("Cache writer started");

        loop {
            tokio::select! {
                Some(write) = write_rx.recv() => {
                    if let Err(e) = Self::store(conn.clone(), write).await {
                        tracing::error!(error = %e, "Cache write failed");
                    }
                }
                _ = &mut shutdown_rx => break,
            }
        }

        // Senders may outlive the writer, so drain rather than wait for close
        let mut flushed = 0usize;
        while let Ok(write) = write_rx.try_recv() {
            match Self::store(conn.clone(), write).await {
                Ok(()) => flushed += 1,
                Err(e) => tracing::error!(error = %e, "Cache write failed during shutdown"),
            }
        }
        tracing::info!(flushed, "Cache writer stopped");
    }

    async fn store(mut conn: ConnectionManager, write: PendingWrite) -> AppResult<()> {
        let _: () = conn.set_ex(&write.key, write.value, write.ttl).await?;
        tracing::debug!(key = %write.key, ttl = write.ttl, "Cache entry written");
        Ok(())
    }

    /// Cached value for `key`, if present and still decodable
    ///
    /// Redis errors and undecodable entries are logged and treated as misses.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let key = key.to_string();
        let mut conn = self.conn.clone();

        let cached: redis::RedisResult<Option<String>> = conn.get(&key).await;
        let json = match cached {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(value) => {
                tracing::debug!(key = %key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Queues `value` for writing with a TTL in seconds
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let value = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization failed");
                return;
            }
        };

        let write = PendingWrite {
            key: key.to_string(),
            value,
            ttl,
        };

        if self.write_tx.send(write).is_err() {
            tracing::warn!(key = %key, "Cache writer stopped, dropping write");
        }
    }
}
