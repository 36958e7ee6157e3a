use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Mutex;

fn main() -> Result<()> {
    let cfg = sonic_spectrum::config::Config::parse();
    init_logging(&cfg)?;

    if cfg.list_devices {
        sonic_spectrum::audio::list_output_devices()?;
        return Ok(());
    }

    sonic_spectrum::app::run(cfg)
}

/// The visualizer owns the terminal, so logs only go to a file while it runs.
fn init_logging(cfg: &sonic_spectrum::config::Config) -> Result<()> {
    if let Some(path) = cfg.log_file.as_deref() {
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if cfg.list_devices {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}
