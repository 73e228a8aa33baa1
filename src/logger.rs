use chrono::Local;
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Info by default; `RUST_LOG` overrides. Safe to call more than once.
pub fn init() {
    let installed = Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .try_init();

    if installed.is_ok() {
        log::info!("Logger initialized.");
    }
}
