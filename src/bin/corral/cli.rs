use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI для Corral: пулы IPv4-адресов и именованных партиций.
///
/// Каждая команда открывает пул (restore), выполняет операцию и закрывает
/// его (финальный снапшот) — состояние живёт в каталоге пула.
#[derive(Parser, Debug)]
#[command(name = "corral", version, about = "Corral pool allocator CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Allocate the next free address from an IPv4 pool
    ///
    /// Пример:
    ///   corral alloc --path ./pool --subnet 10.0.0.1-50
    Alloc {
        #[arg(long)]
        path: PathBuf,
        /// Pool spec: A.B.C.D (range 1..=D) or A.B.C.S-E
        #[arg(long)]
        subnet: String,
    },
    /// Reserve a specific address
    Reserve {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        subnet: String,
        /// Address to reserve (must lie in the configured range)
        #[arg(long)]
        ip: String,
    },
    /// Return an address to the pool
    Free {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        subnet: String,
        #[arg(long)]
        ip: String,
    },
    /// Print pool counters (use --json for JSON)
    Status {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        subnet: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List identifiers (available by default, --allocated for the other side)
    List {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        subnet: String,
        /// List the allocated set instead of the available one
        #[arg(long, default_value_t = false)]
        allocated: bool,
        /// JSON array output
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Allocate the next free named partition (provisions backing storage)
    ///
    /// Пример:
    ///   corral parts-alloc --path ./storage --count 100
    PartsAlloc {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value = "part")]
        prefix: String,
        #[arg(long, default_value_t = 100)]
        count: u32,
        /// Pre-sized data file length per partition, bytes
        #[arg(long, default_value_t = 1024 * 1024)]
        part_size: u64,
    },
    /// Return a named partition to the pool
    PartsFree {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value = "part")]
        prefix: String,
        #[arg(long, default_value_t = 100)]
        count: u32,
        /// Pre-sized data file length per partition, bytes
        #[arg(long, default_value_t = 1024 * 1024)]
        part_size: u64,
        /// Partition name, e.g. part7
        #[arg(long)]
        part: String,
    },
    /// Print partition pool counters (use --json for JSON)
    PartsStatus {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value = "part")]
        prefix: String,
        #[arg(long, default_value_t = 100)]
        count: u32,
        /// Pre-sized data file length per partition, bytes
        #[arg(long, default_value_t = 1024 * 1024)]
        part_size: u64,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Cli as Parser>::parse()
    }
}
