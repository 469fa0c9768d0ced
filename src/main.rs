use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clipview::config::ViewerConfig;

#[derive(Parser)]
#[command(name = "clipview")]
#[command(about = "Plays the animation clips of a glTF model")]
struct Cli {
    /// The model to display (defaults to the configured one)
    model: Option<PathBuf>,

    /// TOML file overriding the default settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Name of the clip to play first
    #[arg(long)]
    clip: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => match ViewerConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to read {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => ViewerConfig::default(),
    };

    if let Some(model) = cli.model {
        config.model.path = model;
    }
    if let Some(clip) = cli.clip {
        config.animation.initial_clip = clip;
    }

    match pollster::block_on(clipview::viewer::run(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
