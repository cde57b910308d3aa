use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tubeview")]
#[command(about = "Browse a video's details and comments in the terminal", long_about = None)]
pub struct Cli {
    /// Video ID to look up on startup
    pub video_id: Option<String>,

    /// Base URL of the comments API (default: http://localhost:5000/api)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Force dark mode (overrides auto-detection)
    #[arg(long, conflicts_with = "light")]
    pub dark: bool,

    /// Force light mode (overrides auto-detection)
    #[arg(long, conflicts_with = "dark")]
    pub light: bool,

    /// Custom config directory (default: ~/.config/tubeview)
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose logging (prints log path, sets DEBUG level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a video and its comments without starting the UI
    Fetch(FetchArgs),
    /// Manage the settings file
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Video ID to look up
    pub video_id: String,

    /// Number of comment pages to load
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show where the settings file lives
    Path,
    /// Write a settings file with the effective API URL and timeout
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {s}. Use 'text' or 'json'")),
        }
    }
}
