//! Command-line interface for DeskMirror.

use clap::Parser;
use deskmirror_core::config::CONFIG_PATH_ENV;
use std::path::PathBuf;

/// DeskMirror - mirrors board lists and a working folder into a live view
#[derive(Parser, Debug)]
#[command(name = "DeskMirror")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Folder to mirror (default: the `folder.root` setting)
    #[arg(value_name = "FOLDER")]
    pub folder: Option<PathBuf>,

    /// Settings file (default: deskmirror.json in the working directory)
    #[arg(long, value_name = "PATH", env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,
}
