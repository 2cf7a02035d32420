use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use Corral::{
    DirProvisioner, PartPlan, Pool, PoolConfig, PoolError, ResourceProvisioner,
};

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("corral-{}-{}-{}", prefix, pid, t))
}

fn parts_cfg() -> PoolConfig {
    PoolConfig::default()
        .with_snapshot_file("backups/snapshot")
        .with_snap_fsync(false)
        .with_part_size_bytes(4096)
}

#[test]
fn provisioner_materializes_backing_storage() -> Result<()> {
    let root = unique_root("parts");
    fs::create_dir_all(&root)?;

    let cfg = parts_cfg();
    let prov = DirProvisioner::new(cfg.part_size_bytes);
    let mut pool = Pool::open_with(&root, PartPlan::new("part", 10), cfg, Some(&prov))?;

    assert_eq!(pool.universe_count(), 10);
    for i in 0..10 {
        let data = root.join(format!("part{}", i)).join("data.bin");
        assert!(data.exists(), "part{} must be materialized", i);
        assert_eq!(data.metadata()?.len(), 4096);
    }

    assert_eq!(pool.allocate()?, "part0");
    assert_eq!(pool.allocate()?, "part1");
    pool.deallocate("part0")?;
    assert_eq!(pool.allocate()?, "part0");

    pool.close()?;
    // Снапшот лежит в backups-подкаталоге.
    assert!(root.join("backups").join("snapshot").exists());
    Ok(())
}

#[test]
fn parts_allocation_survives_reopen() -> Result<()> {
    let root = unique_root("parts-reopen");
    fs::create_dir_all(&root)?;

    {
        let cfg = parts_cfg();
        let prov = DirProvisioner::new(cfg.part_size_bytes);
        let mut pool = Pool::open_with(&root, PartPlan::new("part", 5), cfg, Some(&prov))?;
        pool.allocate_specific("part3")?;
        pool.close()?;
    }

    let cfg = parts_cfg();
    let prov = DirProvisioner::new(cfg.part_size_bytes);
    let pool = Pool::open_with(&root, PartPlan::new("part", 5), cfg, Some(&prov))?;
    assert!(pool.is_allocated("part3"));
    assert_eq!(pool.available_count(), 4);

    pool.close()?;
    Ok(())
}

/// Provisioner, который отказывает на одном имени.
struct Flaky {
    inner: DirProvisioner,
    poison: String,
}

impl ResourceProvisioner for Flaky {
    fn provision(&self, root: &Path, id: &str) -> Result<(), PoolError> {
        if id == self.poison {
            return Err(PoolError::ProvisioningFailure {
                id: id.to_string(),
                source: io::Error::new(io::ErrorKind::Other, "injected failure"),
            });
        }
        self.inner.provision(root, id)
    }
}

#[test]
fn provisioning_failure_excludes_identifier_only() -> Result<()> {
    let root = unique_root("parts-flaky");
    fs::create_dir_all(&root)?;

    let cfg = parts_cfg();
    let prov = Flaky {
        inner: DirProvisioner::new(cfg.part_size_bytes),
        poison: "part2".to_string(),
    };
    let mut pool = Pool::open_with(&root, PartPlan::new("part", 5), cfg, Some(&prov))?;

    // Конструирование успешно, но part2 вне вселенной.
    assert_eq!(pool.universe_count(), 4);
    assert!(!root.join("part2").exists());

    // В диапазоне плана, не занят — но недоступен.
    assert!(matches!(
        pool.allocate_specific("part2"),
        Err(PoolError::IdentifierUnavailable(_))
    ));
    // Плановые ошибки формата/диапазона по-прежнему раньше.
    assert!(matches!(
        pool.allocate_specific("blob2"),
        Err(PoolError::InvalidIdentifierFormat(_))
    ));
    assert!(matches!(
        pool.allocate_specific("part77"),
        Err(PoolError::IdentifierOutOfRange(_))
    ));

    // Обычная аллокация пропускает выбитый идентификатор.
    assert_eq!(pool.allocate()?, "part0");
    assert_eq!(pool.allocate()?, "part1");
    assert_eq!(pool.allocate()?, "part3");

    pool.close()?;
    Ok(())
}
