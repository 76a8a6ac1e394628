use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use mixsift::{config, error, info, server};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name = env!("CARGO_PKG_NAME"),
  bin_name = env!("CARGO_PKG_NAME"),
  about = env!("CARGO_PKG_DESCRIPTION"),
  styles = styles(),
)]
struct Cli {
    /// Bind address, overriding SERVER_ADDRESS
    #[clap(long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    let mut cfg = match config::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => error!("Invalid configuration: {}", e),
    };
    if let Some(address) = cli.address {
        cfg.server_address = address;
    }

    info!(
        "Starting {} on {}",
        env!("CARGO_PKG_NAME"),
        cfg.server_address
    );
    server::serve(cfg.into_shared()).await;
}
