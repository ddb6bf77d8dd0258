use crate::{
    storage::Storage,
    theme::{AccentColor, ThemeSink},
};

pub const KEY_MUTED: &str = "sound_muted";
pub const KEY_RAIN_ACTIVE: &str = "rain_active";
pub const KEY_RAIN_SPEED: &str = "rain_speed";
pub const KEY_ACCENT: &str = "accent_color";

pub const SPEED_MIN: u8 = 1;
pub const SPEED_MAX: u8 = 10;

/// User-adjustable display and interaction preferences.
///
/// Always fully populated: loading substitutes the default for any field
/// that is absent from storage or fails to parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preferences {
    pub accent: AccentColor,
    pub muted: bool,
    pub rain_active: bool,
    pub rain_speed: u8,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            accent: AccentColor::default(),
            muted: true,
            rain_active: false,
            rain_speed: 5,
        }
    }
}

type Listener = Box<dyn Fn(&Preferences)>;

/// The single authoritative copy of [`Preferences`], kept in sync with a
/// [`Storage`] backend.
///
/// Every mutation writes through to storage, publishes the accent where
/// relevant, and notifies subscribers synchronously, in that order. Nothing
/// here can fail: a backend that drops writes just means the next session
/// starts from defaults again.
pub struct PreferenceStore {
    listeners: Vec<Listener>,
    prefs: Preferences,
    storage: Box<dyn Storage>,
    theme: Box<dyn ThemeSink>,
}

impl PreferenceStore {
    /// Loads preferences from `storage`, field by field, and publishes the
    /// resolved accent color.
    pub fn initialize(storage: Box<dyn Storage>, mut theme: Box<dyn ThemeSink>) -> Self {
        let defaults = Preferences::default();

        let prefs = Preferences {
            accent: read_accent(storage.as_ref(), defaults.accent),
            muted: read_bool(storage.as_ref(), KEY_MUTED, defaults.muted),
            rain_active: read_bool(storage.as_ref(), KEY_RAIN_ACTIVE, defaults.rain_active),
            rain_speed: read_speed(storage.as_ref(), defaults.rain_speed),
        };

        theme.publish(prefs.accent);

        Self {
            listeners: Vec::new(),
            prefs,
            storage,
            theme,
        }
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    /// Registers a listener invoked synchronously after every mutation.
    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.prefs.muted = muted;
        self.storage.set(KEY_MUTED, &muted.to_string());
        self.notify();
    }

    pub fn set_rain_active(&mut self, active: bool) {
        self.prefs.rain_active = active;
        self.storage.set(KEY_RAIN_ACTIVE, &active.to_string());
        self.notify();
    }

    pub fn toggle_rain(&mut self) {
        let active = !self.prefs.rain_active;
        self.set_rain_active(active);
    }

    /// Speed outside [`SPEED_MIN`]..=[`SPEED_MAX`] is clamped, not rejected.
    pub fn set_rain_speed(&mut self, speed: u8) {
        let speed = speed.clamp(SPEED_MIN, SPEED_MAX);
        self.prefs.rain_speed = speed;
        self.storage.set(KEY_RAIN_SPEED, &speed.to_string());
        self.notify();
    }

    pub fn set_accent(&mut self, accent: AccentColor) {
        self.prefs.accent = accent;
        self.storage.set(KEY_ACCENT, accent.name());
        self.theme.publish(accent);
        self.notify();
    }

    /// Restores compiled-in defaults and clears the stored keys, so a fresh
    /// load against the same backend also yields defaults.
    pub fn reset(&mut self) {
        for key in [KEY_MUTED, KEY_RAIN_ACTIVE, KEY_RAIN_SPEED, KEY_ACCENT] {
            self.storage.remove(key);
        }

        self.prefs = Preferences::default();
        self.theme.publish(self.prefs.accent);
        self.notify();
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(&self.prefs);
        }
    }

    #[cfg(test)]
    fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }
}

fn read_bool(storage: &dyn Storage, key: &str, default: bool) -> bool {
    match storage.get(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring malformed value {:?} for {}", raw, key);
            default
        }),
        None => default,
    }
}

fn read_speed(storage: &dyn Storage, default: u8) -> u8 {
    match storage.get(KEY_RAIN_SPEED) {
        Some(raw) => match raw.parse::<u8>() {
            Ok(speed) if (SPEED_MIN..=SPEED_MAX).contains(&speed) => speed,
            _ => {
                log::warn!("Ignoring malformed value {:?} for {}", raw, KEY_RAIN_SPEED);
                default
            }
        },
        None => default,
    }
}

fn read_accent(storage: &dyn Storage, default: AccentColor) -> AccentColor {
    match storage.get(KEY_ACCENT) {
        Some(raw) => AccentColor::from_name(&raw).unwrap_or_else(|| {
            log::warn!("Ignoring malformed value {:?} for {}", raw, KEY_ACCENT);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, NullStorage};
    use std::{cell::RefCell, rc::Rc};

    #[derive(Default)]
    struct RecordingTheme {
        published: Rc<RefCell<Vec<AccentColor>>>,
    }

    impl ThemeSink for RecordingTheme {
        fn publish(&mut self, accent: AccentColor) {
            self.published.borrow_mut().push(accent);
        }
    }

    /// Counts writes while delegating to a shared in-memory map, so a test
    /// can both observe write-through and reload from the same backend.
    struct SharedStorage {
        entries: Rc<RefCell<MemoryStorage>>,
        sets: Rc<RefCell<usize>>,
    }

    impl SharedStorage {
        fn new() -> (Self, Rc<RefCell<MemoryStorage>>, Rc<RefCell<usize>>) {
            let entries = Rc::new(RefCell::new(MemoryStorage::default()));
            let sets = Rc::new(RefCell::new(0));
            let storage = Self {
                entries: Rc::clone(&entries),
                sets: Rc::clone(&sets),
            };
            (storage, entries, sets)
        }

        fn reopen(entries: &Rc<RefCell<MemoryStorage>>) -> Self {
            Self {
                entries: Rc::clone(entries),
                sets: Rc::new(RefCell::new(0)),
            }
        }
    }

    impl Storage for SharedStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.entries.borrow().get(key)
        }

        fn set(&mut self, key: &str, value: &str) {
            *self.sets.borrow_mut() += 1;
            self.entries.borrow_mut().set(key, value);
        }

        fn remove(&mut self, key: &str) {
            self.entries.borrow_mut().remove(key);
        }
    }

    fn store_over(storage: Box<dyn Storage>) -> PreferenceStore {
        PreferenceStore::initialize(storage, Box::<RecordingTheme>::default())
    }

    #[test]
    fn initialize_without_stored_values_yields_defaults() {
        let store = store_over(Box::<MemoryStorage>::default());
        assert_eq!(*store.prefs(), Preferences::default());
    }

    #[test]
    fn every_field_round_trips_through_storage() {
        let (storage, entries, _) = SharedStorage::new();

        let mut store = store_over(Box::new(storage));
        store.set_muted(false);
        store.set_rain_active(true);
        store.set_rain_speed(9);
        store.set_accent(AccentColor::Magenta);
        drop(store);

        let reloaded = store_over(Box::new(SharedStorage::reopen(&entries)));
        assert_eq!(
            *reloaded.prefs(),
            Preferences {
                accent: AccentColor::Magenta,
                muted: false,
                rain_active: true,
                rain_speed: 9,
            }
        );
    }

    #[test]
    fn reset_then_reload_yields_defaults() {
        let (mut storage, entries, _) = SharedStorage::new();
        storage.set(KEY_MUTED, "false");
        storage.set(KEY_RAIN_ACTIVE, "true");
        storage.set(KEY_RAIN_SPEED, "2");
        storage.set(KEY_ACCENT, "red");

        let mut store = store_over(Box::new(storage));
        assert_ne!(*store.prefs(), Preferences::default());

        store.reset();
        assert_eq!(*store.prefs(), Preferences::default());

        // Nothing left behind to resurrect the old values on reload.
        for key in [KEY_MUTED, KEY_RAIN_ACTIVE, KEY_RAIN_SPEED, KEY_ACCENT] {
            assert_eq!(store.storage().get(key), None);
        }

        let reloaded = store_over(Box::new(SharedStorage::reopen(&entries)));
        assert_eq!(*reloaded.prefs(), Preferences::default());
    }

    #[test]
    fn malformed_value_falls_back_for_that_field_only() {
        let mut storage = MemoryStorage::default();
        storage.set(KEY_MUTED, "false");
        storage.set(KEY_RAIN_ACTIVE, "definitely");
        storage.set(KEY_RAIN_SPEED, "7");
        storage.set(KEY_ACCENT, "cyan");

        let store = store_over(Box::new(storage));
        let prefs = store.prefs();
        assert!(!prefs.muted);
        assert!(!prefs.rain_active); // fell back
        assert_eq!(prefs.rain_speed, 7);
        assert_eq!(prefs.accent, AccentColor::Cyan);
    }

    #[test]
    fn out_of_range_speed_falls_back() {
        let mut storage = MemoryStorage::default();
        storage.set(KEY_RAIN_SPEED, "42");

        let store = store_over(Box::new(storage));
        assert_eq!(store.prefs().rain_speed, Preferences::default().rain_speed);
    }

    #[test]
    fn double_toggle_restores_state_with_two_writes() {
        let (storage, _, sets) = SharedStorage::new();

        let mut store = store_over(Box::new(storage));
        let before = store.prefs().rain_active;

        store.toggle_rain();
        store.toggle_rain();

        assert_eq!(store.prefs().rain_active, before);
        assert_eq!(*sets.borrow(), 2);
    }

    #[test]
    fn set_speed_is_clamped() {
        let mut store = store_over(Box::<MemoryStorage>::default());

        store.set_rain_speed(0);
        assert_eq!(store.prefs().rain_speed, SPEED_MIN);

        store.set_rain_speed(200);
        assert_eq!(store.prefs().rain_speed, SPEED_MAX);
    }

    #[test]
    fn listeners_see_every_mutation_synchronously() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = store_over(Box::<MemoryStorage>::default());

        let sink = Rc::clone(&seen);
        store.subscribe(Box::new(move |prefs| {
            sink.borrow_mut().push(prefs.clone());
        }));

        store.set_muted(false);
        store.set_rain_speed(8);
        store.reset();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert!(!seen[0].muted);
        assert_eq!(seen[1].rain_speed, 8);
        assert_eq!(seen[2], Preferences::default());
    }

    #[test]
    fn accent_changes_publish_to_the_theme_sink() {
        let published = Rc::new(RefCell::new(Vec::new()));
        let theme = RecordingTheme {
            published: Rc::clone(&published),
        };

        let mut store =
            PreferenceStore::initialize(Box::<MemoryStorage>::default(), Box::new(theme));
        store.set_accent(AccentColor::Amber);
        store.reset();

        assert_eq!(
            *published.borrow(),
            vec![
                AccentColor::default(), // initialize
                AccentColor::Amber,     // set_accent
                AccentColor::default(), // reset
            ]
        );
    }

    #[test]
    fn mutators_work_without_any_backend() {
        let mut store = store_over(Box::new(NullStorage));
        assert_eq!(*store.prefs(), Preferences::default());

        store.set_muted(false);
        store.set_accent(AccentColor::Red);
        store.toggle_rain();
        store.reset();

        assert_eq!(*store.prefs(), Preferences::default());
    }
}
