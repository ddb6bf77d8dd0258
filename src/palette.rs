use crate::{i18n::LANGUAGE_LOADER, theme::AccentColor};
use i18n_embed_fl::fl;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteCommand {
    OpenSettings,
    Quit,
    ResetPreferences,
    SetAccent(AccentColor),
    ToggleRain,
    ToggleSound,
}

pub struct PaletteEntry {
    pub command: PaletteCommand,
    pub label: String,
}

/// Command palette model: a fixed command list filtered by a query string,
/// with a movable selection. Purely transient; nothing here is persisted.
pub struct CommandPalette {
    entries: Vec<PaletteEntry>,
    pub query: String,
    selected: usize,
}

impl CommandPalette {
    pub fn new() -> Self {
        let mut entries = vec![
            PaletteEntry {
                command: PaletteCommand::ToggleRain,
                label: fl!(LANGUAGE_LOADER, "cmd-toggle-rain"),
            },
            PaletteEntry {
                command: PaletteCommand::OpenSettings,
                label: fl!(LANGUAGE_LOADER, "cmd-open-settings"),
            },
            PaletteEntry {
                command: PaletteCommand::ToggleSound,
                label: fl!(LANGUAGE_LOADER, "cmd-toggle-sound"),
            },
        ];

        for accent in AccentColor::ALL {
            entries.push(PaletteEntry {
                command: PaletteCommand::SetAccent(accent),
                label: fl!(LANGUAGE_LOADER, "cmd-accent", name = accent.name()),
            });
        }

        entries.push(PaletteEntry {
            command: PaletteCommand::ResetPreferences,
            label: fl!(LANGUAGE_LOADER, "cmd-reset-preferences"),
        });
        entries.push(PaletteEntry {
            command: PaletteCommand::Quit,
            label: fl!(LANGUAGE_LOADER, "cmd-quit"),
        });

        Self {
            entries,
            query: String::new(),
            selected: 0,
        }
    }

    /// Called when the palette is opened so a stale query never greets the
    /// user.
    pub fn clear(&mut self) {
        self.query.clear();
        self.selected = 0;
    }

    /// Entries whose label contains the query, case-insensitively. An empty
    /// query matches everything.
    pub fn matches(&self) -> Vec<&PaletteEntry> {
        let needle = self.query.trim().to_lowercase();

        self.entries
            .iter()
            .filter(|entry| needle.is_empty() || entry.label.to_lowercase().contains(&needle))
            .collect()
    }

    /// Selection clamped into the current match list.
    pub fn selected_index(&self) -> usize {
        self.selected.min(self.matches().len().saturating_sub(1))
    }

    pub fn select_next(&mut self) {
        let count = self.matches().len();
        if count > 0 {
            self.selected = (self.selected_index() + 1) % count;
        }
    }

    pub fn select_previous(&mut self) {
        let count = self.matches().len();
        if count > 0 {
            self.selected = (self.selected_index() + count - 1) % count;
        }
    }

    pub fn on_query_edited(&mut self) {
        self.selected = 0;
    }

    pub fn selected_command(&self) -> Option<PaletteCommand> {
        self.matches()
            .get(self.selected_index())
            .map(|entry| entry.command)
    }
}
