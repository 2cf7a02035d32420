use anyhow::Result;
use std::path::PathBuf;

use crate::util::open_ipv4;

pub fn exec(path: PathBuf, subnet: String, ip: String) -> Result<()> {
    let mut pool = open_ipv4(&path, &subnet)?;
    pool.deallocate(&ip)?;
    println!("freed {}", ip);
    pool.close()?;
    Ok(())
}
