mod app;
mod config;
mod error;
mod search;
mod upload;
mod utils;

use app::PaperArchiveApp;
use config::AppConfig;
use eframe::CreationContext;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([640.0, 520.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "Exam Paper Archive",
        options,
        Box::new(move |cc: &CreationContext| Box::new(PaperArchiveApp::new(cc, config))),
    ) {
        log::error!("Application error: {}", e);
        std::process::exit(1);
    }
}
