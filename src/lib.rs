#![allow(non_snake_case)]

// Базовые модули
pub mod config;
pub mod errors;
pub mod metrics;

// Ядро: пул + стратегии вселенной + снапшоты
pub mod plan; // src/plan/mod.rs
pub mod pool; // src/pool/mod.rs
pub mod snapshot;

// Окружение пула: provisioning, события, блокировка
pub mod events;
pub mod lock;
pub mod provision;

// Удобные реэкспорты
pub use config::PoolConfig;
pub use errors::PoolError;
pub use events::{callback, EventHandle, PoolEvent};
pub use plan::{IdPlan, Ipv4Plan, PartPlan};
pub use pool::Pool;
pub use provision::{DirProvisioner, ResourceProvisioner};
