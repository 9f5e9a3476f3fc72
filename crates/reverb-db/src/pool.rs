//! Postgres connection pooling.
//!
//! Every repository in this crate borrows from one shared [`PgPool`]. The
//! defaults are sized for a single API process talking to a local Postgres;
//! raise `max_connections` only in step with the server's own limit.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use reverb_core::{Error, Result};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const DEFAULT_MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Sizing knobs for [`create_pool_with_config`].
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Upper bound on open connections.
    pub max_connections: u32,
    /// Connections kept warm even when the process is idle.
    pub min_connections: u32,
    /// How long an acquire may wait before failing.
    pub connect_timeout: Duration,
    /// Idle age after which a connection is closed.
    pub idle_timeout: Duration,
    /// Forced recycle age; `None` keeps connections for the process lifetime.
    pub max_lifetime: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            connect_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            max_lifetime: Some(DEFAULT_MAX_LIFETIME),
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of open connections.
    pub fn max_connections(mut self, limit: u32) -> Self {
        self.max_connections = limit;
        self
    }

    /// Keep at least this many connections open.
    pub fn min_connections(mut self, floor: u32) -> Self {
        self.min_connections = floor;
        self
    }

    /// Fail an acquire that waits longer than this.
    pub fn connect_timeout(mut self, limit: Duration) -> Self {
        self.connect_timeout = limit;
        self
    }

    /// Close connections idle longer than this.
    pub fn idle_timeout(mut self, limit: Duration) -> Self {
        self.idle_timeout = limit;
        self
    }

    /// Recycle connections older than this, or never when `None`.
    pub fn max_lifetime(mut self, age: Option<Duration>) -> Self {
        self.max_lifetime = age;
        self
    }
}

/// Open a pool against `database_url` with default sizing.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    create_pool_with_config(database_url, PoolConfig::default()).await
}

/// Open a pool against `database_url` with explicit sizing.
pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> Result<PgPool> {
    let started = Instant::now();

    info!(
        subsystem = "db",
        component = "pool",
        op = "open",
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        acquire_timeout_secs = config.connect_timeout.as_secs(),
        idle_timeout_secs = config.idle_timeout.as_secs(),
        "Opening database pool"
    );

    let options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout);
    let options = match config.max_lifetime {
        Some(age) => options.max_lifetime(age),
        None => options,
    };

    let pool = options
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "db",
        component = "pool",
        op = "ready",
        pool_size = pool.size(),
        pool_idle = pool.num_idle(),
        duration_ms = started.elapsed().as_millis() as u64,
        "Database pool ready"
    );
    Ok(pool)
}

/// Point-in-time pool utilization, as captured by [`log_pool_metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolMetrics {
    /// Open connections.
    pub size: u32,
    /// Connections idle and ready to be acquired.
    pub idle: usize,
    /// No idle connection remains; further acquires will queue.
    pub saturated: bool,
}

/// Emit a point-in-time pool utilization snapshot, returning it.
///
/// Debug-level normally; warns when no connection is idle, since further
/// acquires will queue behind whatever is holding the pool.
pub fn log_pool_metrics(pool: &PgPool) -> PoolMetrics {
    let size = pool.size();
    let idle = pool.num_idle();
    let saturated = idle == 0 && size > 0;

    debug!(
        subsystem = "db",
        component = "pool",
        op = "metrics",
        pool_size = size,
        pool_idle = idle,
        "Pool utilization snapshot"
    );

    if saturated {
        warn!(
            subsystem = "db",
            component = "pool",
            pool_size = size,
            "Database pool fully utilized, acquires will queue"
        );
    }

    PoolMetrics {
        size,
        idle,
        saturated,
    }
}
