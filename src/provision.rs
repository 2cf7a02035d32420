//! provision — материализация backing-хранилища для именованных пулов.
//!
//! Пул вызывает provisioner один раз на кандидата вселенной при
//! построении; сбой не валит конструирование — идентификатор просто
//! исключается из вселенной (логируется, метрика растёт).

use log::debug;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use crate::errors::PoolError;

/// Размер data-файла партиции по умолчанию (1 MiB).
pub const DEFAULT_PART_SIZE: u64 = 1024 * 1024;

const DATA_FILE: &str = "data.bin";

/// Capability: подготовить backing-хранилище идентификатора до того, как
/// он попадёт в available.
pub trait ResourceProvisioner {
    fn provision(&self, root: &Path, id: &str) -> Result<(), PoolError>;
}

/// Каталог на партицию + предразмеченный data.bin фиксированного размера.
///
/// Идемпотентен: существующий каталог/файл не пересоздаётся и не
/// усекается — данные партиции переживают рестарт.
#[derive(Debug, Clone)]
pub struct DirProvisioner {
    part_size: u64,
}

impl DirProvisioner {
    pub fn new(part_size: u64) -> Self {
        Self { part_size }
    }

    pub fn part_size(&self) -> u64 {
        self.part_size
    }

    fn materialize(&self, root: &Path, id: &str) -> io::Result<()> {
        let part_dir = root.join(id);
        fs::create_dir_all(&part_dir)?;

        let data = part_dir.join(DATA_FILE);
        if let Ok(meta) = data.metadata() {
            if meta.len() >= self.part_size {
                return Ok(()); // уже размечен
            }
        }
        let f = OpenOptions::new().create(true).write(true).open(&data)?;
        f.set_len(self.part_size)?;
        let _ = f.sync_all();
        debug!("provisioned {} ({} bytes)", data.display(), self.part_size);
        Ok(())
    }
}

impl Default for DirProvisioner {
    fn default() -> Self {
        Self::new(DEFAULT_PART_SIZE)
    }
}

impl ResourceProvisioner for DirProvisioner {
    fn provision(&self, root: &Path, id: &str) -> Result<(), PoolError> {
        self.materialize(root, id)
            .map_err(|e| PoolError::ProvisioningFailure {
                id: id.to_string(),
                source: e,
            })
    }
}
