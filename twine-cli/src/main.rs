use clap::Parser;
use tracing_subscriber::EnvFilter;
use twine::TracingSink;
use twine_cli::{Cli, run};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli, &mut TracingSink) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
