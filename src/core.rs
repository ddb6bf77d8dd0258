use crate::{
    audio::{AudioSink, SoundCue, Sounds},
    clock::FrameClock,
    event::{AppResponse, AppStatus, EventProxy, UserEvent},
    i18n::LANGUAGE_LOADER,
    palette::{CommandPalette, PaletteCommand},
    preferences::PreferenceStore,
    rain::Rain,
    shortcut::{KeyPress, ShortcutAction, ShortcutDispatcher},
    stats::TypingStats,
    storage::Storage,
    theme::ThemeSink,
    ui::{self, Overlays},
};
use i18n_embed_fl::fl;
use std::time::Instant;
use winit::event::{ModifiersState, VirtualKeyCode};

const STATUS_SECS: u64 = 5;

/// Central application state. Owns the preference store and everything that
/// consumes it; all mutation funnels through [`Core::handle_key`] and
/// [`Core::handle_user_event`].
pub struct Core<P: EventProxy<UserEvent>> {
    clock: FrameClock,
    dispatcher: ShortcutDispatcher,
    event_proxy: P,
    modifiers: ModifiersState,
    overlays: Overlays,
    palette: CommandPalette,
    rain: Rain,
    sounds: Sounds,
    stats: Option<TypingStats>,
    status: AppStatus,
    status_clock: Instant,
    store: PreferenceStore,
}

impl<P: EventProxy<UserEvent> + Clone + 'static> Core<P> {
    pub fn new(
        event_proxy: P,
        storage: Box<dyn Storage>,
        theme: Box<dyn ThemeSink>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let mut store = PreferenceStore::initialize(storage, theme);

        let proxy = event_proxy.clone();
        store.subscribe(Box::new(move |_| {
            proxy.send_event(UserEvent::PreferencesChanged);
        }));

        Self {
            clock: FrameClock::new(),
            dispatcher: ShortcutDispatcher::new(),
            event_proxy,
            modifiers: ModifiersState::default(),
            overlays: Overlays::default(),
            palette: CommandPalette::new(),
            rain: Rain::new(),
            sounds: Sounds::new(audio),
            stats: None,
            status: AppStatus::Info(fl!(LANGUAGE_LOADER, "status-prefs-loaded")),
            status_clock: Instant::now(),
            store,
        }
    }

    pub fn set_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Feeds one pressed key through the dispatcher. Returns whether it
    /// resolved to an action.
    pub fn handle_key(&mut self, key: VirtualKeyCode, typing: bool) -> bool {
        let press = KeyPress {
            ctrl: self.modifiers.ctrl(),
            key,
            meta: self.modifiers.logo(),
            shift: self.modifiers.shift(),
        };

        let Some(action) = self.dispatcher.handle(press, typing) else {
            return false;
        };

        match action {
            ShortcutAction::ToggleCommandPalette => {
                self.overlays.palette_open = !self.overlays.palette_open;
                if self.overlays.palette_open {
                    self.palette.clear();
                    self.play(SoundCue::OverlayOpen);
                } else {
                    self.play(SoundCue::OverlayClose);
                }
            }
            ShortcutAction::ToggleSettings => {
                self.overlays.settings_open = !self.overlays.settings_open;
                if self.overlays.settings_open {
                    self.play(SoundCue::OverlayOpen);
                } else {
                    self.play(SoundCue::OverlayClose);
                }
            }
            ShortcutAction::CloseOverlays => {
                if !self.overlays.any_open() {
                    return false;
                }
                self.overlays.palette_open = false;
                self.overlays.settings_open = false;
                self.play(SoundCue::OverlayClose);
            }
            ShortcutAction::ToggleRain => {
                self.store.toggle_rain();
                self.play(SoundCue::GestureComplete);
                self.flash_rain_status();
            }
        }

        true
    }

    pub fn handle_user_event(&mut self, event: UserEvent) -> AppResponse {
        let mut response = AppResponse::default();

        match event {
            UserEvent::PreferencesChanged => response.request_redraw = true,
            UserEvent::ResetPreferences => self.reset_preferences(),
            UserEvent::RunCommand(command) => {
                self.overlays.palette_open = false;
                self.run_command(command, &mut response);
            }
            UserEvent::SetAccent(accent) => self.store.set_accent(accent),
            UserEvent::SetMuted(muted) => self.store.set_muted(muted),
            UserEvent::SetRainActive(active) => {
                self.store.set_rain_active(active);
                self.flash_rain_status();
            }
            UserEvent::SetRainSpeed(speed) => self.store.set_rain_speed(speed),
            UserEvent::StatsLoaded(stats) => {
                if stats == TypingStats::fallback() {
                    self.change_status(AppStatus::Warning(fl!(
                        LANGUAGE_LOADER,
                        "status-stats-fallback"
                    )));
                }
                self.stats = Some(stats);
                response.request_redraw = true;
            }
        }

        response
    }

    /// Composes one frame.
    pub fn ui(&mut self, ctx: &egui::Context) {
        if !matches!(self.status, AppStatus::Idle)
            && self.status_clock.elapsed().as_secs() > STATUS_SECS
        {
            self.status = AppStatus::Idle;
        }

        let dt = self.clock.tick();

        ui::viewport(ctx, &mut self.rain, dt, self.store.prefs());
        ui::status_bar(ctx, &self.status, self.stats.as_ref(), self.store.prefs());

        if self.overlays.settings_open {
            ui::settings_window(
                ctx,
                self.store.prefs(),
                &mut self.overlays.settings_open,
                &self.event_proxy,
            );
        }

        if self.overlays.palette_open {
            ui::palette_window(ctx, &mut self.palette, &self.event_proxy);
        }

        #[cfg(feature = "fps")]
        log::info!("FPS: {}", self.clock.fps());
    }

    fn run_command(&mut self, command: PaletteCommand, response: &mut AppResponse) {
        match command {
            PaletteCommand::OpenSettings => {
                self.overlays.settings_open = true;
                self.play(SoundCue::OverlayOpen);
            }
            PaletteCommand::Quit => response.quit = true,
            PaletteCommand::ResetPreferences => self.reset_preferences(),
            PaletteCommand::SetAccent(accent) => {
                self.store.set_accent(accent);
                self.play(SoundCue::Toggle);
            }
            PaletteCommand::ToggleRain => {
                self.store.toggle_rain();
                self.play(SoundCue::Toggle);
                self.flash_rain_status();
            }
            PaletteCommand::ToggleSound => {
                let muted = !self.store.prefs().muted;
                self.store.set_muted(muted);
                self.play(SoundCue::Toggle);
            }
        }
    }

    fn reset_preferences(&mut self) {
        self.store.reset();
        self.change_status(AppStatus::Info(fl!(LANGUAGE_LOADER, "status-prefs-reset")));
    }

    fn flash_rain_status(&mut self) {
        let message = if self.store.prefs().rain_active {
            fl!(LANGUAGE_LOADER, "status-rain-on")
        } else {
            fl!(LANGUAGE_LOADER, "status-rain-off")
        };
        self.change_status(AppStatus::Info(message));
    }

    fn change_status(&mut self, status: AppStatus) {
        self.status = status;
        self.status_clock = Instant::now();
    }

    fn play(&mut self, cue: SoundCue) {
        let muted = self.store.prefs().muted;
        self.sounds.play(cue, muted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        audio::LogAudio,
        shortcut::GESTURE,
        storage::MemoryStorage,
        theme::{AccentColor, ThemeSink},
    };
    use std::{cell::RefCell, rc::Rc};

    #[derive(Clone, Default)]
    struct RecordingProxy {
        events: Rc<RefCell<Vec<UserEvent>>>,
    }

    impl EventProxy<UserEvent> for RecordingProxy {
        fn send_event(&self, event: UserEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    struct NullTheme;

    impl ThemeSink for NullTheme {
        fn publish(&mut self, _accent: AccentColor) {}
    }

    fn test_core() -> Core<RecordingProxy> {
        Core::new(
            RecordingProxy::default(),
            Box::<MemoryStorage>::default(),
            Box::new(NullTheme),
            Box::<LogAudio>::default(),
        )
    }

    #[test]
    fn palette_chord_toggles_without_touching_gesture_progress() {
        let mut core = test_core();
        core.set_modifiers(ModifiersState::CTRL);

        assert!(core.handle_key(VirtualKeyCode::K, false));
        assert!(core.overlays.palette_open);
        assert_eq!(core.dispatcher.progress(), 0);

        assert!(core.handle_key(VirtualKeyCode::K, false));
        assert!(!core.overlays.palette_open);
        assert_eq!(core.dispatcher.progress(), 0);
    }

    #[test]
    fn settings_chord_opens_the_settings_window() {
        let mut core = test_core();
        core.set_modifiers(ModifiersState::LOGO);

        assert!(core.handle_key(VirtualKeyCode::Comma, false));
        assert!(core.overlays.settings_open);
        assert!(!core.overlays.palette_open);
    }

    #[test]
    fn gesture_end_to_end_toggles_rain() {
        let mut core = test_core();
        assert!(!core.store.prefs().rain_active);

        for &key in &GESTURE {
            core.handle_key(key, false);
        }

        assert!(core.store.prefs().rain_active);
        assert_eq!(core.dispatcher.progress(), 0);
    }

    #[test]
    fn escape_without_overlays_is_not_an_action() {
        let mut core = test_core();
        assert!(!core.handle_key(VirtualKeyCode::Escape, false));
    }

    #[test]
    fn escape_closes_both_overlays() {
        let mut core = test_core();
        core.overlays.palette_open = true;
        core.overlays.settings_open = true;

        assert!(core.handle_key(VirtualKeyCode::Escape, false));
        assert!(!core.overlays.any_open());
    }

    #[test]
    fn running_a_command_closes_the_palette() {
        let mut core = test_core();
        core.overlays.palette_open = true;

        let response = core.handle_user_event(UserEvent::RunCommand(PaletteCommand::ToggleRain));
        assert!(!core.overlays.palette_open);
        assert!(!response.quit);
        assert!(core.store.prefs().rain_active);
    }

    #[test]
    fn quit_command_requests_exit() {
        let mut core = test_core();
        let response = core.handle_user_event(UserEvent::RunCommand(PaletteCommand::Quit));
        assert!(response.quit);
    }

    #[test]
    fn store_mutations_notify_through_the_proxy() {
        let proxy = RecordingProxy::default();
        let mut core = Core::new(
            proxy.clone(),
            Box::<MemoryStorage>::default(),
            Box::new(NullTheme),
            Box::<LogAudio>::default(),
        );

        core.handle_user_event(UserEvent::SetMuted(false));

        let events = proxy.events.borrow();
        assert!(events
            .iter()
            .any(|event| matches!(event, UserEvent::PreferencesChanged)));
    }

    #[test]
    fn fallback_stats_surface_a_warning() {
        let mut core = test_core();
        core.handle_user_event(UserEvent::StatsLoaded(TypingStats::fallback()));

        assert!(matches!(core.status, AppStatus::Warning(_)));
        assert_eq!(core.stats, Some(TypingStats::fallback()));
    }
}
