use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

use Corral::metrics;

use crate::util::open_ipv4;

pub fn exec(path: PathBuf, subnet: String, json_out: bool) -> Result<()> {
    let pool = open_ipv4(&path, &subnet)?;

    if json_out {
        let ms = metrics::snapshot();
        let obj = json!({
            "kind": "ipv4",
            "spec": pool.plan().spec(),
            "root": pool.root().display().to_string(),
            "snapshot": pool.snapshot_path().display().to_string(),
            "universe": pool.universe_count(),
            "allocated": pool.allocated_count(),
            "available": pool.available_count(),
            "metrics": {
                "allocations_total": ms.allocations_total,
                "specific_allocations_total": ms.specific_allocations_total,
                "releases_total": ms.releases_total,
                "exhaustion_hits": ms.exhaustion_hits,
                "snapshots_taken": ms.snapshots_taken,
                "snapshot_bytes_written": ms.snapshot_bytes_written,
                "restores_total": ms.restores_total,
                "restored_ids_total": ms.restored_ids_total,
            },
        });
        println!("{}", obj);
    } else {
        println!("Pool {}", pool.root().display());
        println!("  kind      = ipv4");
        println!("  spec      = {}", pool.plan().spec());
        println!("  universe  = {}", pool.universe_count());
        println!("  allocated = {}", pool.allocated_count());
        println!("  available = {}", pool.available_count());
        println!("  snapshot  = {}", pool.snapshot_path().display());
    }

    pool.close()?;
    Ok(())
}
