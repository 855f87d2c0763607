//! HWMI - command line front end for the Horizon Walker model importer package.
//!
//! Runs the same operations the launcher calls on the package:
//! - `version`: installed HWMI version from `Core/HWMI/main.ini`
//! - `detect`: auto-detected game folders, most trusted first
//! - `validate <GAME_DIR>`: locate the game executable
//! - `launch [GAME_DIR]`: apply the launch overlay and the optional FPS unlock
//!
//! Settings come from `HWMI Config.yaml` in the configuration directory; logs
//! go to `<app root>/Logs`.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use hwmi_importer::{APP_NAME, ConfigManager, HwmiPackage, ModelImporter, VERSION};

/// Horizon Walker model importer package tools
#[derive(Parser)]
#[command(name = "hwmi-importer", version)]
struct Args {
    /// Directory holding HWMI Config.yaml
    #[arg(long, default_value = "HWMI Data")]
    config_dir: Utf8PathBuf,

    /// Launcher root the importer folder is relative to
    #[arg(long, default_value = ".")]
    app_root: Utf8PathBuf,

    /// Log at debug level and echo logs to the console
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the installed HWMI version
    Version,

    /// List auto-detected game folders
    Detect,

    /// Check that a folder holds the game executable
    Validate { game_dir: Utf8PathBuf },

    /// Prepare main.ini and game settings for a launch
    Launch { game_dir: Option<Utf8PathBuf> },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_dir = args.app_root.join("Logs");
    let _guard =
        hwmi_importer::logging::setup_logging(log_dir.as_str(), "hwmi", args.debug, args.debug)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let config_manager = ConfigManager::new(&args.config_dir)?;
    let config = config_manager.load_config()?;
    let game_folder = config.importer.game_folder.clone();

    let package = HwmiPackage::new(config, args.app_root.clone());

    match args.command {
        Command::Version => {
            let version = package
                .installed_version()
                .context("Failed to read installed HWMI version")?;
            println!("{}", version);
        }
        Command::Detect => {
            let folders = package.autodetect_game_folders();
            if folders.is_empty() {
                println!("No Horizon Walker installation found");
            }
            for folder in folders {
                println!("{}", folder);
            }
        }
        Command::Validate { game_dir } => {
            let exe = package.validate_game_exe_path(&game_dir)?;
            println!("{}", exe);
        }
        Command::Launch { game_dir } => {
            let game_dir = game_dir
                .or_else(|| (!game_folder.is_empty()).then(|| Utf8PathBuf::from(game_folder)))
                .context("No game folder given and none configured")?;
            package.initialize_game_launch(&game_dir)?;
            println!("Launch prepared for {}", game_dir);
        }
    }

    tracing::info!("Done");
    Ok(())
}
