//! Desktop demo: a winit window whose glutin context is handed to glow.
//!
//! Run with:
//! ```sh
//! cargo run -p glbridge-native -- --samples 4
//! ```

mod app;
mod cli;
mod logging;
mod surface;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use winit::event_loop::{ControlFlow, EventLoop};

use crate::{
    app::App,
    cli::Cli,
    logging::{LoggingConfig, init_logging},
};

fn main() -> Result<()> {
    // panic hook
    color_eyre::install()?;

    // Initialize structured logging
    let logging_config = LoggingConfig::from_env();
    let _guard = init_logging(&logging_config).wrap_err("Failed to initialize logging")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "glbridge starting up");

    // parse command line arguments
    let cli = Cli::parse();
    cli.validate()?;

    let config = cli.canvas_config().wrap_err("Failed to load shader sources")?;
    config.validate()?;

    let event_loop = EventLoop::new().wrap_err("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(cli, config);
    event_loop.run_app(&mut app).wrap_err("Event loop failed")?;

    app.finish()
}
