#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

// quickcrop - page through a directory of images, drag a rectangle on the
// one displayed and save or discard the resulting crop.

mod app;
mod cli;
mod loader;
mod scan;
mod session;

use anyhow::Result;
use eframe::egui;
use log::info;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args = cli::parse_args()?;

    // Build the image list; an empty directory is fatal at startup.
    let files = scan::list_images(&args.directory)?;
    info!(
        "Found {} image files in {}, save mode: {:?}",
        files.len(),
        args.directory.display(),
        args.save_mode
    );

    let session = session::Session::new(files);
    let save_mode = args.save_mode;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1040.0, 1120.0]),
        ..Default::default()
    };
    eframe::run_native(
        "quickcrop",
        options,
        Box::new(move |_cc| Ok(Box::new(app::CropApp::new(session, save_mode)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run the UI: {e}"))
}
