use std::path::Path;
use std::process::ExitCode;

use jade_engine::core::WindowConfig;
use jade_engine::device::GpuInit;
use jade_engine::logging::{init_logging, LoggingConfig};

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config = WindowConfig {
        assets_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"),
        ..WindowConfig::default()
    };
    jade_engine::window::run(config, GpuInit::default())
}
