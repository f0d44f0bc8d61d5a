#![allow(unused_imports)]
#![allow(unused_doc_comments)]

pub mod appconfig;
pub mod discovery;
pub mod ledger;
pub mod logging;
pub mod options;
pub mod session;
pub mod ui;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

fn main() -> Result<()> {
    use ui::ui_types::App;

    logging::init_logs();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 1 {
        println!("usage: pixel_marker path_to_image_directory");
        std::process::exit(1);
    }
    let img_dir = PathBuf::from(&args[0]);

    let settings = appconfig::AppSettings::load_from_file(appconfig::CONFIG_FILE_NAME)
        .unwrap_or_else(|e| {
            debug!("No config file, using defaults: {}", e);
            appconfig::AppSettings::default()
        });

    let images = match discovery::find_images(&img_dir, &settings.allowed_extensions) {
        Ok(images) => images,
        Err(e) => {
            println!("{}", e);
            std::process::exit(1);
        }
    };

    let ledger = ledger::SessionLedger::load(ledger::SessionLedger::path_for(&img_dir))?;
    let session = session::Session::new(ledger, images);

    if session.is_finished() {
        println!("All images done!");
        return Ok(());
    }

    info!("{} images left to label", session.remaining());

    // set once the work queue drains; a window closed early is an abort
    let completed = Arc::new(AtomicBool::new(false));
    let completed_in_app = completed.clone();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "pixel_marker",
        native_options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, session, completed_in_app)))),
    )
    .map_err(|e| anyhow!("Failed to run display surface: {}", e))?;

    if !completed.load(Ordering::SeqCst) {
        std::process::exit(1);
    }

    println!("All images done!");
    Ok(())
}
