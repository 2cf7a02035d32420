use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

use crate::util::open_parts;

pub fn exec_alloc(path: PathBuf, prefix: String, count: u32, part_size: u64) -> Result<()> {
    let mut pool = open_parts(&path, &prefix, count, part_size)?;
    let part = pool.allocate()?;
    println!("{}", part);
    pool.close()?;
    Ok(())
}

pub fn exec_free(path: PathBuf, prefix: String, count: u32, part_size: u64, part: String) -> Result<()> {
    let mut pool = open_parts(&path, &prefix, count, part_size)?;
    pool.deallocate(&part)?;
    println!("freed {}", part);
    pool.close()?;
    Ok(())
}

pub fn exec_status(path: PathBuf, prefix: String, count: u32, part_size: u64, json_out: bool) -> Result<()> {
    let pool = open_parts(&path, &prefix, count, part_size)?;

    if json_out {
        let obj = json!({
            "kind": "parts",
            "prefix": pool.plan().prefix(),
            "count": pool.plan().count(),
            "root": pool.root().display().to_string(),
            "snapshot": pool.snapshot_path().display().to_string(),
            "universe": pool.universe_count(),
            "allocated": pool.allocated_count(),
            "available": pool.available_count(),
        });
        println!("{}", obj);
    } else {
        println!("Pool {}", pool.root().display());
        println!("  kind      = parts");
        println!("  prefix    = {}", pool.plan().prefix());
        println!("  count     = {}", pool.plan().count());
        println!("  universe  = {}", pool.universe_count());
        println!("  allocated = {}", pool.allocated_count());
        println!("  available = {}", pool.available_count());
        println!("  snapshot  = {}", pool.snapshot_path().display());
    }

    pool.close()?;
    Ok(())
}
