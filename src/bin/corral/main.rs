use anyhow::Result;
use env_logger::{Builder, Env};
use log::error;

mod cli;
mod util;

mod cmd_alloc;
mod cmd_free;
mod cmd_list;
mod cmd_parts;
mod cmd_reserve;
mod cmd_status;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — info.
    // Пример: RUST_LOG=debug ./corral ...
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        error!("{:?}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Alloc { path, subnet } => cmd_alloc::exec(path, subnet),

        cli::Cmd::Reserve { path, subnet, ip } => cmd_reserve::exec(path, subnet, ip),

        cli::Cmd::Free { path, subnet, ip } => cmd_free::exec(path, subnet, ip),

        cli::Cmd::Status { path, subnet, json } => cmd_status::exec(path, subnet, json),

        cli::Cmd::List { path, subnet, allocated, json } =>
            cmd_list::exec(path, subnet, allocated, json),

        cli::Cmd::PartsAlloc { path, prefix, count, part_size } =>
            cmd_parts::exec_alloc(path, prefix, count, part_size),

        cli::Cmd::PartsFree { path, prefix, count, part_size, part } =>
            cmd_parts::exec_free(path, prefix, count, part_size, part),

        cli::Cmd::PartsStatus { path, prefix, count, part_size, json } =>
            cmd_parts::exec_status(path, prefix, count, part_size, json),
    }
}
