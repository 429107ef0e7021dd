use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reelshelf")]
#[command(author, version, about = "Browse and stream a local media directory")]
pub struct Cli {
    /// Directory to serve (defaults to the current directory)
    pub root: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory with the browser UI
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
