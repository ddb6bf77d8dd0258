use crate::{palette::PaletteCommand, stats::TypingStats, theme::AccentColor};
use winit::event_loop::EventLoopProxy;

/// Transient status line shown in the bottom bar. Messages expire back to
/// `Idle` after a few seconds.
#[derive(Clone, Debug)]
pub enum AppStatus {
    Idle,
    Info(String),
    Warning(String),
}

/// Events sent from UI surfaces and background work into the core.
#[derive(Debug)]
pub enum UserEvent {
    PreferencesChanged,
    ResetPreferences,
    RunCommand(PaletteCommand),
    SetAccent(AccentColor),
    SetMuted(bool),
    SetRainActive(bool),
    SetRainSpeed(u8),
    StatsLoaded(TypingStats),
}

pub trait EventProxy<T> {
    fn send_event(&self, event: T);
}

/// What the core asks of the event loop after handling an event.
#[derive(Debug, Default)]
pub struct AppResponse {
    pub quit: bool,
    pub request_redraw: bool,
}

pub struct EventProxyWinit<T: 'static> {
    inner: EventLoopProxy<T>,
}

impl<T> EventProxy<T> for EventProxyWinit<T> {
    fn send_event(&self, event: T) {
        // The loop only closes during shutdown, where dropping is fine.
        let _ = self.inner.send_event(event);
    }
}

impl<T> EventProxyWinit<T> {
    pub fn from_proxy(inner: EventLoopProxy<T>) -> Self {
        Self { inner }
    }
}

impl<T> Clone for EventProxyWinit<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
