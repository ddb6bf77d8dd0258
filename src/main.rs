#![windows_subsystem = "windows"]

mod app;
mod audio;
mod clock;
mod core;
mod event;
mod fonts;
mod gfx;
mod i18n;
mod palette;
mod preferences;
mod rain;
mod shortcut;
mod stats;
mod storage;
mod theme;
mod ui;
mod window_icon;

fn main() {
    env_logger::init();

    if let Err(err) = i18n::select_system_locales() {
        log::warn!("Failed to select system locales: {}", err);
    }

    let app = app::App::new().unwrap();

    app.run();
}
