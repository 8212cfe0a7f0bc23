mod app;
mod config;
mod error;
mod form;
mod input;
mod model;
mod orbit;
mod plot;
mod render;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = config::Args::parse();
    config::init_logging(&args)?;
    app::run(args.render_config(), args.sample_count())
}
