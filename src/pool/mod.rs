//! pool — ядро: generic-аллокатор конечного множества идентификаторов.
//!
//! Жизненный цикл:
//! 1. open(): берём эксклюзивный LOCK на корень, строим вселенную по плану
//!    (опционально через provisioner), восстанавливаем allocated из
//!    снапшота, выверяем против свежей вселенной.
//! 2. allocate/allocate_specific/deallocate/запросы — только в памяти.
//! 3. close(): финальный снапшот с наблюдаемым результатом. Drop — тот же
//!    снапшот best-effort (ошибкам в Drop некуда подняться).
//!
//! Инвариант на всём интервале Active:
//!   allocated ∩ available = ∅  и  allocated ∪ available = Universe.
//! Любая неуспешная операция оставляет оба множества нетронутыми.
//!
//! Модель владения: один владелец, один поток. Операции не синхронизированы
//! внутри; межпроцессную единственность обеспечивает <root>/LOCK.
//! Независимые пулы (разные корни) полностью независимы.

use log::{info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::PoolConfig;
use crate::errors::PoolError;
use crate::events::{Callback, EventHandle, EventRegistry, PoolEvent};
use crate::lock::{self, LockGuard};
use crate::metrics;
use crate::plan::IdPlan;
use crate::provision::ResourceProvisioner;
use crate::snapshot;

pub struct Pool<P: IdPlan> {
    root: PathBuf,
    plan: P,
    cfg: PoolConfig,
    snapshot_path: PathBuf,
    allocated: BTreeMap<u64, String>,
    available: BTreeMap<u64, String>,
    events: Arc<EventRegistry>,
    closed: bool,
    _lock: LockGuard, // держим до Drop
}

impl<P: IdPlan> Pool<P> {
    /// Открыть пул с конфигурацией по умолчанию, без provisioner'а.
    pub fn open(root: &Path, plan: P) -> Result<Self, PoolError> {
        Self::open_with(root, plan, PoolConfig::default(), None)
    }

    /// Открыть пул: LOCK -> вселенная (с provisioning) -> restore.
    pub fn open_with(
        root: &Path,
        plan: P,
        cfg: PoolConfig,
        provisioner: Option<&dyn ResourceProvisioner>,
    ) -> Result<Self, PoolError> {
        fs::create_dir_all(root).map_err(|e| PoolError::persistence("create root", root, e))?;
        let _lock = lock::try_exclusive(root)?;

        let snapshot_path = root.join(&cfg.snapshot_file);
        if let Some(parent) = snapshot_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| PoolError::persistence("create snapshot dir", parent, e))?;
        }

        // Вселенная (частичная допустима: сбой provisioning исключает кандидата).
        let mut available = BTreeMap::new();
        for (ord, id) in plan.universe() {
            if let Some(p) = provisioner {
                if let Err(e) = p.provision(root, &id) {
                    warn!("{}: excluding {}: {}", plan.kind(), id, e);
                    metrics::record_provision_failure();
                    continue;
                }
            }
            available.insert(ord, id);
        }
        info!(
            "{}: universe ready, {} identifiers under {}",
            plan.kind(),
            available.len(),
            root.display()
        );

        // Восстановление allocated из снапшота; available — всегда производное.
        let mut allocated = BTreeMap::new();
        for id in snapshot::restore(&snapshot_path)? {
            match plan.ordinal(&id) {
                Some(ord) => {
                    if let Some(s) = available.remove(&ord) {
                        allocated.insert(ord, s);
                    } else if !allocated.contains_key(&ord) {
                        warn!(
                            "{}: restored {:?} is not offered by this universe, dropping",
                            plan.kind(),
                            id
                        );
                    }
                }
                None => warn!(
                    "{}: restored {:?} is outside the configured range, dropping",
                    plan.kind(),
                    id
                ),
            }
        }
        metrics::record_restore(allocated.len() as u64);
        if !allocated.is_empty() {
            info!(
                "{}: restored {} allocated, {} remain available",
                plan.kind(),
                allocated.len(),
                available.len()
            );
        }

        Ok(Self {
            root: root.to_path_buf(),
            plan,
            cfg,
            snapshot_path,
            allocated,
            available,
            events: EventRegistry::new(),
            closed: false,
            _lock,
        })
    }

    // -------- allocation surface --------

    /// Выдать наименьший свободный идентификатор (канонический порядок).
    pub fn allocate(&mut self) -> Result<String, PoolError> {
        match self.available.pop_first() {
            Some((ord, id)) => {
                self.allocated.insert(ord, id.clone());
                metrics::record_allocation();
                info!(
                    "{}: allocated {} ({} remaining)",
                    self.plan.kind(),
                    id,
                    self.available.len()
                );
                self.events.publish(&PoolEvent::Allocated {
                    id: id.clone(),
                    remaining: self.available.len(),
                });
                Ok(id)
            }
            None => {
                metrics::record_exhaustion();
                warn!("{}: pool exhausted", self.plan.kind());
                self.events.publish(&PoolEvent::Exhausted);
                Err(PoolError::PoolExhausted)
            }
        }
    }

    /// Занять конкретный идентификатор.
    ///
    /// Порядок проверок фиксирован: формат -> диапазон -> уже занят ->
    /// доступен. Первая несработавшая проверка определяет ошибку; состояние
    /// не меняется.
    pub fn allocate_specific(&mut self, id: &str) -> Result<(), PoolError> {
        if !self.plan.is_well_formed(id) {
            return Err(PoolError::InvalidIdentifierFormat(id.to_string()));
        }
        let ord = self
            .plan
            .ordinal(id)
            .ok_or_else(|| PoolError::IdentifierOutOfRange(id.to_string()))?;
        if self.allocated.contains_key(&ord) {
            return Err(PoolError::AlreadyAllocated(id.to_string()));
        }
        // В диапазоне и не занят, но может быть исключён из вселенной
        // (например, не прошёл provisioning).
        let canonical = self
            .available
            .remove(&ord)
            .ok_or_else(|| PoolError::IdentifierUnavailable(id.to_string()))?;
        self.allocated.insert(ord, canonical.clone());
        metrics::record_specific_allocation();
        info!(
            "{}: allocated {} specifically ({} remaining)",
            self.plan.kind(),
            canonical,
            self.available.len()
        );
        self.events.publish(&PoolEvent::Allocated {
            id: canonical,
            remaining: self.available.len(),
        });
        Ok(())
    }

    /// Вернуть идентификатор в пул. Идентификатор вне вселенной — тоже
    /// NotAllocated (никогда не игнорируется молча).
    pub fn deallocate(&mut self, id: &str) -> Result<(), PoolError> {
        let ord = self
            .plan
            .ordinal(id)
            .ok_or_else(|| PoolError::NotAllocated(id.to_string()))?;
        let canonical = self
            .allocated
            .remove(&ord)
            .ok_or_else(|| PoolError::NotAllocated(id.to_string()))?;
        self.available.insert(ord, canonical.clone());
        metrics::record_release();
        info!("{}: released {}", self.plan.kind(), canonical);
        self.events.publish(&PoolEvent::Released { id: canonical });
        Ok(())
    }

    // -------- queries --------

    pub fn is_allocated(&self, id: &str) -> bool {
        match self.plan.ordinal(id) {
            Some(ord) => self.allocated.contains_key(&ord),
            None => false,
        }
    }

    /// Срез allocated на момент вызова, в каноническом порядке.
    pub fn list_allocated(&self) -> Vec<String> {
        self.allocated.values().cloned().collect()
    }

    /// Срез available на момент вызова, в каноническом порядке.
    pub fn list_available(&self) -> Vec<String> {
        self.available.values().cloned().collect()
    }

    pub fn allocated_count(&self) -> usize {
        self.allocated.len()
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Мощность вселенной (после provisioning-исключений).
    pub fn universe_count(&self) -> usize {
        self.allocated.len() + self.available.len()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn plan(&self) -> &P {
        &self.plan
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    // -------- persistence --------

    /// Зафиксировать текущий allocated-набор на диск (атомарно).
    pub fn take_snapshot(&self) -> Result<(), PoolError> {
        let ids: Vec<&str> = self.allocated.values().map(|s| s.as_str()).collect();
        let bytes = snapshot::take(&ids, &self.snapshot_path, self.cfg.snap_fsync)?;
        metrics::record_snapshot(bytes);
        info!(
            "{}: snapshot committed, {} ids, {} bytes -> {}",
            self.plan.kind(),
            ids.len(),
            bytes,
            self.snapshot_path.display()
        );
        self.events.publish(&PoolEvent::SnapshotCommitted {
            path: self.snapshot_path.clone(),
            count: ids.len(),
        });
        Ok(())
    }

    /// Явное закрытие: финальный снапшот с наблюдаемой ошибкой.
    /// Предпочтительно перед Drop — у Drop результата нет.
    pub fn close(mut self) -> Result<(), PoolError> {
        self.closed = true;
        if self.cfg.snap_on_close {
            self.take_snapshot()?;
        }
        Ok(())
    }

    // -------- observers --------

    /// Подписать наблюдателя на события пула (RAII-handle).
    pub fn subscribe(&self, cb: Callback) -> EventHandle {
        self.events.subscribe(cb)
    }
}

impl<P: IdPlan> Drop for Pool<P> {
    fn drop(&mut self) {
        if self.closed || !self.cfg.snap_on_close {
            return;
        }
        // Best-effort: после close() сюда не попадаем, ошибки глотаем.
        let _ = self.take_snapshot();
    }
}
