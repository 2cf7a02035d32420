use anyhow::Result;
use std::path::PathBuf;

use crate::util::open_ipv4;

pub fn exec(path: PathBuf, subnet: String, allocated: bool, json: bool) -> Result<()> {
    let pool = open_ipv4(&path, &subnet)?;
    let ids = if allocated {
        pool.list_allocated()
    } else {
        pool.list_available()
    };

    if json {
        println!("{}", serde_json::to_string(&ids)?);
    } else {
        for id in &ids {
            println!("{}", id);
        }
    }

    pool.close()?;
    Ok(())
}
