//! Splash image — entry point.
//!
//! ```text
//! splash-image                   Show SplashScreen.png from the working directory
//! splash-image --image <path>    Show a different image
//! splash-image --config <path>   Use custom config TOML
//! splash-image --gen-config      Dump default config and exit
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use splash_image::app;
use splash_image::config::SplashConfig;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "splash-image", about = "Borderless translucent splash screen")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "splash-image.toml")]
    config: PathBuf,

    /// Splash image file (overrides config).
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.gen_config {
        return match toml::to_string_pretty(&SplashConfig::default()) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("failed to render default config: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let mut config = SplashConfig::load(&cli.config);
    if let Some(path) = cli.image {
        config.image.path = path;
    }

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("splash-image v{}", env!("CARGO_PKG_VERSION"));

    match app::run(&config) {
        Ok(()) => {
            info!("splash closed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(subsystem = ?e.subsystem(), "{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
