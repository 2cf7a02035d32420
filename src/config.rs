//! Centralized configuration for Corral pools.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - PoolConfig::from_env() reads CORRAL_* variables; fluent with_* setters
//!   override individual fields.
//!
//! Durability defaults lean safe: snapshot fsync is on, snapshot-on-close
//! is on. Tests may disable fsync for speed.

use std::fmt;

use crate::provision::DEFAULT_PART_SIZE;

/// Top-level per-pool configuration.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Snapshot file, relative to the pool root.
    /// Env: CORRAL_SNAPSHOT_FILE (default "snapshot")
    pub snapshot_file: String,

    /// fsync the snapshot tmp file (and parent dir) before/after rename.
    /// Env: CORRAL_SNAP_FSYNC (default true; "0|false|off|no" => false)
    pub snap_fsync: bool,

    /// Take a final snapshot in close()/Drop.
    /// Env: CORRAL_SNAP_ON_CLOSE (default true)
    pub snap_on_close: bool,

    /// Pre-sized data file length for provisioned partitions, bytes.
    /// Env: CORRAL_PART_SIZE_BYTES (default 1 MiB)
    pub part_size_bytes: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            snapshot_file: "snapshot".to_string(),
            snap_fsync: true,
            snap_on_close: true,
            part_size_bytes: DEFAULT_PART_SIZE,
        }
    }
}

fn parse_bool(v: &str, default: bool) -> bool {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => true,
        "0" | "false" | "off" | "no" => false,
        _ => default,
    }
}

impl PoolConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("CORRAL_SNAPSHOT_FILE") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.snapshot_file = s.to_string();
            }
        }

        if let Ok(v) = std::env::var("CORRAL_SNAP_FSYNC") {
            cfg.snap_fsync = parse_bool(&v, cfg.snap_fsync);
        }

        if let Ok(v) = std::env::var("CORRAL_SNAP_ON_CLOSE") {
            cfg.snap_on_close = parse_bool(&v, cfg.snap_on_close);
        }

        if let Ok(v) = std::env::var("CORRAL_PART_SIZE_BYTES") {
            if let Ok(n) = v.trim().parse::<u64>() {
                cfg.part_size_bytes = n;
            }
        }

        cfg
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_snapshot_file<S: Into<String>>(mut self, rel: S) -> Self {
        self.snapshot_file = rel.into();
        self
    }

    pub fn with_snap_fsync(mut self, on: bool) -> Self {
        self.snap_fsync = on;
        self
    }

    pub fn with_snap_on_close(mut self, on: bool) -> Self {
        self.snap_on_close = on;
        self
    }

    pub fn with_part_size_bytes(mut self, bytes: u64) -> Self {
        self.part_size_bytes = bytes;
        self
    }
}

impl fmt::Display for PoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PoolConfig {{ snapshot_file: {:?}, snap_fsync: {}, snap_on_close: {}, part_size_bytes: {} }}",
            self.snapshot_file, self.snap_fsync, self.snap_on_close, self.part_size_bytes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides() {
        let cfg = PoolConfig::default()
            .with_snapshot_file("backups/snapshot")
            .with_snap_fsync(false)
            .with_part_size_bytes(4096);
        assert_eq!(cfg.snapshot_file, "backups/snapshot");
        assert!(!cfg.snap_fsync);
        assert!(cfg.snap_on_close);
        assert_eq!(cfg.part_size_bytes, 4096);
    }

    #[test]
    fn bool_parsing() {
        assert!(parse_bool("1", false));
        assert!(parse_bool("Yes", false));
        assert!(!parse_bool("off", true));
        assert!(parse_bool("garbage", true), "unknown keeps default");
    }
}
