//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::settings::attr;

/// Render an image as animated ASCII static in the terminal
#[derive(Parser, Debug)]
#[command(name = "ascii-noise")]
#[command(version, about = "Animated ASCII static from an image", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Animate an image file in the terminal
    Render(RenderArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,

        /// Config file path
        #[arg(long, short, global = true)]
        config: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Image to render (png, jpeg, webp)
    pub image: PathBuf,

    /// Surface width in character cells
    #[arg(long)]
    pub cols: Option<u16>,

    /// Surface height in character cells (before the aspect lock applies)
    #[arg(long)]
    pub rows: Option<u16>,

    /// Characters drawn into the noise
    #[arg(long)]
    pub letters: Option<String>,

    /// Comma separated words written over runs of filled cells
    #[arg(long)]
    pub words: Option<String>,

    /// Height / width ratio; defaults to the image's own ratio
    #[arg(long)]
    pub aspect_ratio: Option<f64>,

    /// Milliseconds between frames
    #[arg(long)]
    pub interval: Option<u64>,

    /// Stop after this many frames (default: run until Ctrl+C)
    #[arg(long)]
    pub frames: Option<u64>,

    /// Seed for reproducible noise
    #[arg(long)]
    pub seed: Option<u64>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

impl RenderArgs {
    /// Flags that override global settings, as surface attributes.
    pub fn attributes(&self) -> HashMap<String, String> {
        let mut attrs = HashMap::new();
        if let Some(letters) = &self.letters {
            attrs.insert(attr::LETTERS.to_string(), letters.clone());
        }
        if let Some(words) = &self.words {
            attrs.insert(attr::WORDS.to_string(), words.clone());
        }
        if let Some(aspect) = self.aspect_ratio {
            attrs.insert(attr::ASPECT_RATIO.to_string(), aspect.to_string());
        }
        if let Some(interval) = self.interval {
            attrs.insert(attr::INTERVAL.to_string(), interval.to_string());
        }
        attrs
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
