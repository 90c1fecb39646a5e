// Command line interface module
// Parses arguments and resolves the image directory and save behavior.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

/// quickcrop - page through a directory of images and crop them
#[derive(Parser, Debug)]
#[command(name = "quickcrop")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing the image files (a folder picker opens if omitted)
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Write crops immediately instead of showing a confirmation preview
    #[arg(long, conflicts_with = "save_as")]
    pub no_confirm: bool,

    /// Choose the destination of each crop with a save dialog
    #[arg(long)]
    pub save_as: bool,
}

/// What happens to a finished crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Show the crop in a preview window; the user saves or discards it.
    Confirm,
    /// Write straight to the derived filename beside the source.
    Immediate,
    /// Ask for the destination with a file dialog.
    Dialog,
}

/// Parsed arguments with the directory resolved.
#[derive(Debug)]
pub struct ParsedArgs {
    pub directory: PathBuf,
    pub save_mode: SaveMode,
}

/// Parse command line arguments, falling back to a folder picker when no
/// directory was given.
pub fn parse_args() -> Result<ParsedArgs> {
    let args = Args::parse();

    let directory = match args.directory {
        Some(dir) => dir,
        None => match rfd::FileDialog::new().pick_folder() {
            Some(dir) => dir,
            None => bail!("No directory selected.\nUsage: quickcrop <DIRECTORY> [OPTIONS]"),
        },
    };

    let save_mode = if args.no_confirm {
        SaveMode::Immediate
    } else if args.save_as {
        SaveMode::Dialog
    } else {
        SaveMode::Confirm
    };

    Ok(ParsedArgs {
        directory,
        save_mode,
    })
}
