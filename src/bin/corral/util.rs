use anyhow::Result;
use std::path::Path;

use Corral::{DirProvisioner, Ipv4Plan, PartPlan, Pool, PoolConfig};

/// Открыть IPv4-пул по спецификации подсети.
pub fn open_ipv4(path: &Path, subnet: &str) -> Result<Pool<Ipv4Plan>> {
    let plan = Ipv4Plan::parse(subnet)?;
    let pool = Pool::open_with(path, plan, PoolConfig::from_env(), None)?;
    Ok(pool)
}

/// Открыть пул именованных партиций с provisioning'ом backing-хранилища.
/// Снапшот живёт в <root>/backups (если не переопределён через ENV).
pub fn open_parts(path: &Path, prefix: &str, count: u32, part_size: u64) -> Result<Pool<PartPlan>> {
    let mut cfg = PoolConfig::from_env().with_part_size_bytes(part_size);
    if cfg.snapshot_file == "snapshot" {
        cfg = cfg.with_snapshot_file("backups/snapshot");
    }
    let prov = DirProvisioner::new(cfg.part_size_bytes);
    let pool = Pool::open_with(path, PartPlan::new(prefix, count), cfg, Some(&prov))?;
    Ok(pool)
}
