use crate::{
    event::{AppStatus, EventProxy, UserEvent},
    i18n::LANGUAGE_LOADER,
    palette::CommandPalette,
    preferences::{Preferences, SPEED_MAX, SPEED_MIN},
    rain::Rain,
    stats::TypingStats,
    theme::AccentColor,
};
use egui::{
    vec2, Align, Align2, CentralPanel, Color32, Context, FontId, Frame, Key, Layout, RichText,
    ScrollArea, Slider, TextEdit, TopBottomPanel, Window,
};
use i18n_embed_fl::fl;
use std::time::Duration;

/// Transient visibility flags for the overlay surfaces. Independent of each
/// other, discarded on exit.
#[derive(Default)]
pub struct Overlays {
    pub palette_open: bool,
    pub settings_open: bool,
}

impl Overlays {
    pub fn any_open(&self) -> bool {
        self.palette_open || self.settings_open
    }
}

/// The rain viewport, or the idle backdrop while the effect is off.
pub fn viewport(ctx: &Context, rain: &mut Rain, dt: Duration, prefs: &Preferences) {
    CentralPanel::default()
        .frame(Frame::none().fill(Color32::BLACK))
        .show(ctx, |ui| {
            let rect = ui.max_rect();

            if prefs.rain_active {
                rain.step(dt, prefs.rain_speed);
                rain.paint(ui.painter(), rect, prefs.accent);
            } else {
                let painter = ui.painter();
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    "wgrain",
                    FontId::monospace(48.0),
                    prefs.accent.dim(),
                );
                painter.text(
                    rect.center() + vec2(0.0, 44.0),
                    Align2::CENTER_CENTER,
                    fl!(LANGUAGE_LOADER, "idle-hint"),
                    FontId::monospace(13.0),
                    Color32::DARK_GRAY,
                );
            }
        });
}

pub fn status_bar(
    ctx: &Context,
    status: &AppStatus,
    stats: Option<&TypingStats>,
    prefs: &Preferences,
) {
    let is_dark = ctx.style().visuals.dark_mode;

    TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            match status {
                AppStatus::Idle => {}
                AppStatus::Info(message) => {
                    ui.label(message);
                }
                AppStatus::Warning(message) => {
                    ui.colored_label(
                        if is_dark {
                            Color32::KHAKI
                        } else {
                            Color32::DARK_RED
                        },
                        message,
                    );
                }
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if prefs.muted {
                    ui.weak(fl!(LANGUAGE_LOADER, "label-muted"));
                }

                if let Some(stats) = stats {
                    ui.weak(stats_summary(stats));
                }
            });
        });
    });
}

fn stats_summary(stats: &TypingStats) -> String {
    fl!(
        LANGUAGE_LOADER,
        "stats-summary",
        tests = stats.tests_completed.to_string(),
        wpm = format!("{:.0}", stats.best_wpm),
        accuracy = format!("{:.1}", stats.accuracy),
        streak = stats.streak_days.to_string()
    )
}

pub fn settings_window(
    ctx: &Context,
    prefs: &Preferences,
    open: &mut bool,
    event_proxy: &impl EventProxy<UserEvent>,
) {
    Window::new(fl!(LANGUAGE_LOADER, "settings-title"))
        .open(open)
        .anchor(Align2::CENTER_CENTER, vec2(0.0, 0.0))
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            let mut sounds_on = !prefs.muted;
            if ui
                .checkbox(&mut sounds_on, fl!(LANGUAGE_LOADER, "settings-sound"))
                .changed()
            {
                event_proxy.send_event(UserEvent::SetMuted(!sounds_on));
            }

            let mut rain_on = prefs.rain_active;
            if ui
                .checkbox(&mut rain_on, fl!(LANGUAGE_LOADER, "settings-rain"))
                .changed()
            {
                event_proxy.send_event(UserEvent::SetRainActive(rain_on));
            }

            let mut speed = prefs.rain_speed;
            ui.horizontal(|ui| {
                ui.label(fl!(LANGUAGE_LOADER, "settings-speed"));
                if ui
                    .add(Slider::new(&mut speed, SPEED_MIN..=SPEED_MAX))
                    .changed()
                {
                    event_proxy.send_event(UserEvent::SetRainSpeed(speed));
                }
            });

            ui.horizontal(|ui| {
                ui.label(fl!(LANGUAGE_LOADER, "settings-accent"));
                for accent in AccentColor::ALL {
                    let selected = prefs.accent == accent;
                    let label = RichText::new(accent.name()).color(accent.color());
                    if ui.selectable_label(selected, label).clicked() && !selected {
                        event_proxy.send_event(UserEvent::SetAccent(accent));
                    }
                }
            });

            ui.separator();

            if ui.button(fl!(LANGUAGE_LOADER, "settings-reset")).clicked() {
                event_proxy.send_event(UserEvent::ResetPreferences);
            }
        });
}

pub fn palette_window(
    ctx: &Context,
    palette: &mut CommandPalette,
    event_proxy: &impl EventProxy<UserEvent>,
) {
    if ctx.input(|i| i.key_pressed(Key::ArrowDown)) {
        palette.select_next();
    }
    if ctx.input(|i| i.key_pressed(Key::ArrowUp)) {
        palette.select_previous();
    }
    let run_selected = ctx.input(|i| i.key_pressed(Key::Enter));

    Window::new("palette")
        .title_bar(false)
        .anchor(Align2::CENTER_TOP, vec2(0.0, 96.0))
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            let response = ui.add(
                TextEdit::singleline(&mut palette.query)
                    .hint_text(fl!(LANGUAGE_LOADER, "palette-hint"))
                    .desired_width(360.0)
                    .lock_focus(true),
            );
            if response.changed() {
                palette.on_query_edited();
            }
            // Keeps focus through selection changes and list clicks.
            response.request_focus();

            ui.separator();

            let selected = palette.selected_index();
            let matches = palette.matches();

            if matches.is_empty() {
                ui.weak(fl!(LANGUAGE_LOADER, "palette-empty"));
            } else {
                ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                    for (index, entry) in matches.iter().enumerate() {
                        if ui.selectable_label(index == selected, &entry.label).clicked() {
                            event_proxy.send_event(UserEvent::RunCommand(entry.command));
                        }
                    }
                });
            }
        });

    if run_selected {
        if let Some(command) = palette.selected_command() {
            event_proxy.send_event(UserEvent::RunCommand(command));
        }
    }
}
