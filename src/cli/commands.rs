//! Subcommand handlers for render and config actions.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::args::{ConfigAction, RenderArgs};
use crate::config::{default_path, Config, DEFAULT_CONFIG_TOML};
use crate::lifecycle::LifecycleManager;
use crate::settings::SettingsStore;
use crate::source::FileImageSource;
use crate::surface::TerminalSurface;

/// How often the render loop checks for Ctrl+C and the frame limit.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Global flag for handling Ctrl+C across the application
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Check if Ctrl+C has been received.
pub fn ctrlc_received() -> bool {
    CTRLC_RECEIVED.load(Ordering::SeqCst)
}

/// Set up the Ctrl+C handler.
///
/// This should be called once at program startup.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        CTRLC_RECEIVED.store(true, Ordering::SeqCst);
    })
}

/// Animate an image in the terminal until Ctrl+C or the frame limit.
pub async fn run_render(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(args.config.as_deref())?;
    let store = SettingsStore::new();
    config.apply(&store)?;

    let cols = args.cols.unwrap_or(config.terminal.cols);
    let rows = args.rows.unwrap_or(config.terminal.rows);
    let surface = Arc::new(TerminalSurface::new(cols, rows, args.attributes()));
    let source = Arc::new(FileImageSource::new(&args.image));

    let mut manager = LifecycleManager::new(store, source);
    if let Some(seed) = args.seed {
        manager = manager.with_seed(seed);
    }

    setup_ctrlc_handler()?;
    let id = manager.activate(surface.clone()).await?;

    loop {
        tokio::time::sleep(POLL_INTERVAL).await;
        if ctrlc_received() {
            log::info!("Received Ctrl+C, shutting down");
            break;
        }
        if args.frames.is_some_and(|limit| surface.frames() >= limit) {
            break;
        }
    }

    manager.deactivate(id)?;
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>) {
    match action {
        ConfigAction::Show => {
            let config = match Config::load(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            let store = SettingsStore::new();
            if let Err(e) = config.apply(&store) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            let settings = store.snapshot();

            println!("Current configuration:");
            println!("  Content: {}", settings.content);
            println!("  Letters: {}", settings.letters);
            if settings.words.is_empty() {
                println!("  Words: (none)");
            } else {
                println!("  Words: {}", settings.words.join(", "));
            }
            println!("  Font: {} {}", settings.font_weight, settings.font_family);
            println!("  Tick interval: {}ms", settings.tick_interval_ms);
            println!(
                "  Terminal: {}x{} cells",
                config.terminal.cols, config.terminal.rows
            );
            println!();

            let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_path);
            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_path);

            if config_path.exists() {
                eprintln!("Config file already exists: {}", config_path.display());
                eprintln!("Use 'ascii-noise config show' to view current settings.");
                std::process::exit(1);
            }

            if let Some(parent) = config_path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    eprintln!("Error creating config directory: {}", e);
                    std::process::exit(1);
                }
            }

            if let Err(e) = std::fs::write(&config_path, DEFAULT_CONFIG_TOML) {
                eprintln!("Error writing config file: {}", e);
                std::process::exit(1);
            }

            println!("Created config file: {}", config_path.display());
        }
    }
}
