//! Per-root advisory lock: single owner per pool root.
//!
//! Аллокационная поверхность пула не синхронизирована внутри (см. модель
//! владения), поэтому второй процесс на том же корне — ошибка, а не гонка.
//! Lock file: <root>/LOCK, эксклюзивный fs2-лок, освобождается на Drop.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::errors::PoolError;

const LOCK_FILE: &str = "LOCK";

pub struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // unlock-ошибки на Drop игнорируем сознательно
        let _ = self.file.unlock();
    }
}

/// Захватить эксклюзивный лок без ожидания. Err, если корень уже занят.
pub fn try_exclusive(root: &Path) -> Result<LockGuard, PoolError> {
    let path = root.join(LOCK_FILE);
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(&path)
        .map_err(|e| PoolError::persistence("open lock", &path, e))?;
    file.try_lock_exclusive()
        .map_err(|e| PoolError::persistence("lock", &path, e))?;
    Ok(LockGuard { file })
}
