use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use Corral::{Ipv4Plan, Pool, PoolConfig, PoolError};

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("corral-{}-{}-{}", prefix, pid, t))
}

#[test]
fn second_owner_is_rejected_until_close() -> Result<()> {
    let root = unique_root("lock");
    fs::create_dir_all(&root)?;

    let cfg = PoolConfig::default().with_snap_fsync(false);
    let pool = Pool::open_with(&root, Ipv4Plan::parse("10.0.0.1-3")?, cfg.clone(), None)?;

    // Тот же корень занят — быстрый отказ, не ожидание.
    match Pool::open_with(&root, Ipv4Plan::parse("10.0.0.1-3")?, cfg.clone(), None) {
        Err(PoolError::PersistenceFailure { op, .. }) => assert_eq!(op, "lock"),
        other => panic!("expected lock failure, got {:?}", other.map(|_| ())),
    }

    pool.close()?;

    // После close() корень свободен.
    let again = Pool::open_with(&root, Ipv4Plan::parse("10.0.0.1-3")?, cfg, None)?;
    again.close()?;
    Ok(())
}

#[test]
fn distinct_roots_are_independent() -> Result<()> {
    let root_a = unique_root("lock-a");
    let root_b = unique_root("lock-b");
    fs::create_dir_all(&root_a)?;
    fs::create_dir_all(&root_b)?;

    let cfg = PoolConfig::default().with_snap_fsync(false);
    let mut a = Pool::open_with(&root_a, Ipv4Plan::parse("10.0.0.1-3")?, cfg.clone(), None)?;
    let mut b = Pool::open_with(&root_b, Ipv4Plan::parse("10.0.0.1-3")?, cfg, None)?;

    assert_eq!(a.allocate()?, "10.0.0.1");
    assert_eq!(b.allocate()?, "10.0.0.1", "pools do not share state");

    a.close()?;
    b.close()?;
    Ok(())
}
