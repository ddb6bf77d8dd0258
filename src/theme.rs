use egui::Color32;

/// Named accent palette. The name is also the persisted string form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccentColor {
    #[default]
    Green,
    Cyan,
    Amber,
    Magenta,
    Red,
}

impl AccentColor {
    pub const ALL: [AccentColor; 5] = [
        AccentColor::Green,
        AccentColor::Cyan,
        AccentColor::Amber,
        AccentColor::Magenta,
        AccentColor::Red,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AccentColor::Green => "green",
            AccentColor::Cyan => "cyan",
            AccentColor::Amber => "amber",
            AccentColor::Magenta => "magenta",
            AccentColor::Red => "red",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|accent| accent.name().eq_ignore_ascii_case(name))
    }

    pub fn color(self) -> Color32 {
        match self {
            AccentColor::Green => Color32::from_rgb(0x00, 0xe6, 0x4b),
            AccentColor::Cyan => Color32::from_rgb(0x22, 0xd3, 0xee),
            AccentColor::Amber => Color32::from_rgb(0xfb, 0xbf, 0x24),
            AccentColor::Magenta => Color32::from_rgb(0xe8, 0x55, 0xd4),
            AccentColor::Red => Color32::from_rgb(0xf8, 0x51, 0x49),
        }
    }

    /// Faded variant used for rain trails and secondary text.
    pub fn dim(self) -> Color32 {
        self.color().linear_multiply(0.45)
    }
}

/// The one seam through which the preference layer mutates anything outside
/// itself. The store is the sole caller.
pub trait ThemeSink {
    fn publish(&mut self, accent: AccentColor);
}

/// Applies the accent to a shared egui context.
pub struct EguiThemeSink {
    context: egui::Context,
}

impl EguiThemeSink {
    pub fn new(context: egui::Context) -> Self {
        Self { context }
    }
}

impl ThemeSink for EguiThemeSink {
    fn publish(&mut self, accent: AccentColor) {
        let mut visuals = egui::Visuals::dark();

        visuals.hyperlink_color = accent.color();
        visuals.selection.bg_fill = accent.color().linear_multiply(0.35);
        visuals.selection.stroke.color = accent.color();
        visuals.widgets.hovered.fg_stroke.color = accent.color();
        visuals.widgets.active.fg_stroke.color = accent.color();

        self.context.set_visuals(visuals);
    }
}
