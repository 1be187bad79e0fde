//! SQLite connection setup for the module runtime.

use anyhow::{anyhow, Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MEMORY_DSN: &str = "sqlite::memory:";

#[derive(Debug, Clone)]
pub struct DbConnConfig {
    pub url: String,
    pub max_conns: Option<u32>,
    pub busy_timeout_ms: Option<u32>,
}

pub fn is_memory_dsn(dsn: &str) -> bool {
    dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
}

/// Expand a sqlite DSN into an absolute-path DSN using `base_dir`.
/// In-memory DSNs are normalised to `sqlite::memory:`; file DSNs get `mode=rwc`
/// unless a mode is already given.
pub fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if is_memory_dsn(dsn) {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {dsn})"))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }
    if create_dirs {
        if let Some(dir) = p.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating database dir {}", dir.display()))?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    match query {
        Some(q) if q.split('&').any(|kv| kv.starts_with("mode=")) => {
            out.push('?');
            out.push_str(q);
        }
        Some(q) => {
            out.push('?');
            out.push_str(q);
            out.push_str("&mode=rwc");
        }
        None => out.push_str("?mode=rwc"),
    }
    Ok(out)
}

/// Open the pool. An in-memory database lives in a single pinned connection,
/// every other connection would see its own empty database.
pub async fn connect(cfg: &DbConnConfig, base_dir: &Path) -> Result<DatabaseConnection> {
    let dsn = absolutize_sqlite_dsn(&cfg.url, base_dir, true)?;
    let memory = is_memory_dsn(&dsn);

    let mut opts = ConnectOptions::new(dsn.clone());
    if memory {
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(cfg.max_conns.unwrap_or(10).max(1));
    }
    if let Some(ms) = cfg.busy_timeout_ms {
        let timeout = Duration::from_millis(u64::from(ms));
        opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(timeout));
    }
    opts.sqlx_logging(false);

    tracing::info!(dsn = %dsn, "connecting to database");
    Database::connect(opts)
        .await
        .with_context(|| format!("connecting to {dsn}"))
}
