use anyhow::Result;
use std::path::PathBuf;

use crate::util::open_ipv4;

pub fn exec(path: PathBuf, subnet: String) -> Result<()> {
    let mut pool = open_ipv4(&path, &subnet)?;
    let ip = pool.allocate()?;
    println!("{}", ip);
    pool.close()?;
    Ok(())
}
