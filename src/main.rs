#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod config;
mod error;
mod fetch;
mod parse;
mod pipeline;
mod store;
mod week;

use std::time::Instant;

use config::Config;

pub use error::Result;

#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let config = Config::from_env()?;
    log::info!(
        "Scraping {} source(s) into {}",
        config.sources.len(),
        config.out_dir.display()
    );
    let start = Instant::now();
    let summary = pipeline::run(&config).await?;
    log::info!(
        "Done in {:?}: {} file(s) written, {} unchanged",
        start.elapsed(),
        summary.written,
        summary.unchanged
    );
    Ok(())
}
