use anyhow::Result;
use clap::Parser;

use s3cp::{Cli, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    // load configuration
    let config = match &cli.config_file {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let request = cli.into_request(config);

    let outcome = s3cp::run(request).await?;

    println!("{outcome}");
    Ok(())
}
