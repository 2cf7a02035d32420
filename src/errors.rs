//! errors — закрытая номенклатура ошибок пула.
//!
//! Политика:
//! - Каждая операция аллокации возвращает ошибку синхронно; состояние пула
//!   при этом не меняется (никаких частичных мутаций).
//! - ProvisioningFailure гасится локально при построении вселенной
//!   (идентификатор исключается, конструирование продолжается).
//! - PersistenceFailure из take/restore не гасится — поднимается вызывающему.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    /// Спецификация диапазона не разобрана или нарушает границы 1..=254.
    #[error("invalid range spec {spec:?}: {reason}")]
    InvalidRangeSpec { spec: String, reason: String },

    /// Идентификатор синтаксически не соответствует формату пула.
    #[error("invalid identifier format: {0:?}")]
    InvalidIdentifierFormat(String),

    /// Идентификатор корректен по форме, но лежит вне настроенного диапазона.
    #[error("identifier out of range: {0:?}")]
    IdentifierOutOfRange(String),

    #[error("identifier already allocated: {0:?}")]
    AlreadyAllocated(String),

    #[error("identifier not allocated: {0:?}")]
    NotAllocated(String),

    /// В диапазоне, не занят — но и не предлагается (например, исключён
    /// на этапе provisioning).
    #[error("identifier unavailable: {0:?}")]
    IdentifierUnavailable(String),

    #[error("pool exhausted: no available identifiers")]
    PoolExhausted,

    /// Любой сбой долговременного слоя: lock, запись/чтение снапшота,
    /// структурно битый файл.
    #[error("persistence failure ({op} {path}): {source}")]
    PersistenceFailure {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("provisioning failed for {id:?}: {source}")]
    ProvisioningFailure {
        id: String,
        #[source]
        source: io::Error,
    },
}

impl PoolError {
    pub(crate) fn persistence(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::PersistenceFailure {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Структурное повреждение снапшота (усечение, завышенная длина, мусор).
    pub(crate) fn corrupt(path: &Path, detail: impl Into<String>) -> Self {
        Self::PersistenceFailure {
            op: "restore",
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, detail.into()),
        }
    }
}
