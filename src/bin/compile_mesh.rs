//! Derive and persist mesh geometry for a batch of mesh files in place, so
//! `simulate` never pays triangulation cost on its own hot path.

use clap::Parser;
use log::{error, info};
use simple_logger::SimpleLogger;
use tdgl::config::CompileMeshArgs;
use tdgl::persistence::DataHandler;
use tdgl::Result;

fn main() -> Result<()> {
    let args = CompileMeshArgs::parse();
    SimpleLogger::new()
        .with_level(args.log_level())
        .init()
        .expect("logger already initialized");

    for path in &args.inputs {
        let handler = DataHandler::open_read_write(path)?;

        if handler.is_restorable() {
            info!("{:?} already carries derived geometry, skipping", path);
            continue;
        }

        info!("compiling {:?}", path);
        let mesh = handler.load_mesh().map_err(|e| {
            error!("failed to load {:?}: {}", path, e);
            e
        })?;
        handler.save_mesh(&mesh).map_err(|e| {
            error!("failed to save {:?}: {}", path, e);
            e
        })?;
        handler.close()?;
        info!("compiled {:?}", path);
    }

    Ok(())
}
