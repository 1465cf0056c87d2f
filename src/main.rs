use clap::Parser;
use routerjig::cli::{run, Cli};
use routerjig::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.debug)?;
    tracing::debug!("routerjig {} built {}", routerjig::VERSION, routerjig::BUILD_DATE);

    run(cli)
}
