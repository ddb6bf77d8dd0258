use crate::theme::AccentColor;
use egui::{vec2, Align2, Color32, FontId, Painter, Rect};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::time::Duration;

const GLYPHS: &[char] = &[
    'ｱ', 'ｲ', 'ｳ', 'ｴ', 'ｵ', 'ｶ', 'ｷ', 'ｸ', 'ｹ', 'ｺ', 'ｻ', 'ｼ', 'ｽ', 'ｾ', 'ｿ', 'ﾀ', 'ﾁ', 'ﾂ',
    'ﾃ', 'ﾄ', 'ﾅ', 'ﾆ', 'ﾇ', 'ﾈ', 'ﾉ', 'ﾊ', 'ﾋ', 'ﾌ', '0', '1', '2', '3', '4', '5', '6', '7',
    '8', '9', '<', '>', '*', '+', '=',
];

const CELL_WIDTH: f32 = 14.0;
const CELL_HEIGHT: f32 = 18.0;

struct Column {
    /// Fractional row of the head glyph. Negative while still above the
    /// viewport.
    head: f32,
    /// Per-column speed multiplier.
    jitter: f32,
    /// Glyphs trailing behind the head.
    trail: usize,
}

/// The falling-glyph field. Advanced by wall-clock deltas and painted with
/// the egui painter; reflows itself whenever the viewport size changes.
pub struct Rain {
    columns: Vec<Column>,
    rng: SmallRng,
    rows: usize,
}

impl Rain {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rng: SmallRng::from_entropy(),
            rows: 0,
        }
    }

    /// Fall rate for a preference speed of 1..=10, in cells per second.
    fn cells_per_second(speed: u8) -> f32 {
        2.0 + 2.4 * f32::from(speed)
    }

    pub fn step(&mut self, dt: Duration, speed: u8) {
        let rate = Self::cells_per_second(speed);

        for index in 0..self.columns.len() {
            let column = &mut self.columns[index];
            column.head += dt.as_secs_f32() * rate * column.jitter;

            if column.head - column.trail as f32 > self.rows as f32 {
                let fresh = spawn(&mut self.rng, self.rows);
                self.columns[index] = fresh;
            }
        }
    }

    pub fn paint(&mut self, painter: &Painter, rect: Rect, accent: AccentColor) {
        let columns = (rect.width() / CELL_WIDTH) as usize;
        let rows = (rect.height() / CELL_HEIGHT) as usize;
        self.reflow(columns, rows);

        let font = FontId::monospace(CELL_HEIGHT - 2.0);

        for (index, column) in self.columns.iter().enumerate() {
            let head_row = column.head.floor() as i32;

            for offset in 0..column.trail {
                let row = head_row - offset as i32;
                if row < 0 || row >= self.rows as i32 {
                    continue;
                }

                let color = if offset == 0 {
                    Color32::from_rgb(0xe6, 0xff, 0xe6)
                } else {
                    let fade = 1.0 - offset as f32 / column.trail as f32;
                    accent.color().linear_multiply(fade)
                };

                let pos = rect.left_top()
                    + vec2(
                        index as f32 * CELL_WIDTH + CELL_WIDTH / 2.0,
                        row as f32 * CELL_HEIGHT,
                    );

                painter.text(pos, Align2::CENTER_TOP, glyph_at(index, row), font.clone(), color);
            }
        }
    }

    fn reflow(&mut self, columns: usize, rows: usize) {
        self.rows = rows;

        while self.columns.len() < columns {
            let column = spawn(&mut self.rng, rows);
            self.columns.push(column);
        }
        self.columns.truncate(columns);
    }
}

fn spawn(rng: &mut SmallRng, rows: usize) -> Column {
    Column {
        head: -rng.gen_range(0.0..rows.max(1) as f32),
        jitter: rng.gen_range(0.6..1.4),
        trail: rng.gen_range(6..24),
    }
}

/// Stable per-cell glyph pick, so the field shimmers with movement instead
/// of flickering every frame.
fn glyph_at(column: usize, row: i32) -> char {
    let index = column.wrapping_mul(31).wrapping_add(row as usize * 17);
    GLYPHS[index % GLYPHS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fall_rate_is_monotonic_in_speed() {
        for speed in 1..10u8 {
            assert!(Rain::cells_per_second(speed + 1) > Rain::cells_per_second(speed));
        }
        assert!(Rain::cells_per_second(1) > 0.0);
    }

    #[test]
    fn step_advances_every_column() {
        let mut rain = Rain::new();
        rain.reflow(12, 40);

        let before: Vec<f32> = rain.columns.iter().map(|c| c.head).collect();
        rain.step(Duration::from_millis(500), 5);

        for (column, &start) in rain.columns.iter().zip(&before) {
            assert!(column.head > start);
        }
    }

    #[test]
    fn faster_speed_falls_further() {
        let mut slow = Rain::new();
        let mut fast = Rain::new();
        slow.reflow(1, 40);
        fast.reflow(1, 40);
        slow.columns[0].head = 0.0;
        fast.columns[0].head = 0.0;
        slow.columns[0].jitter = 1.0;
        fast.columns[0].jitter = 1.0;

        slow.step(Duration::from_secs(1), 1);
        fast.step(Duration::from_secs(1), 10);

        assert!(fast.columns[0].head > slow.columns[0].head);
    }

    #[test]
    fn column_respawns_above_the_viewport_after_leaving_it() {
        let mut rain = Rain::new();
        rain.reflow(1, 40);
        rain.columns[0].head = 100.0; // trail fully below 40 rows

        rain.step(Duration::from_millis(1), 5);

        let column = &rain.columns[0];
        assert!(column.head <= 0.1, "respawned head at {}", column.head);
    }

    #[test]
    fn reflow_grows_and_shrinks_the_field() {
        let mut rain = Rain::new();

        rain.reflow(8, 20);
        assert_eq!(rain.columns.len(), 8);

        rain.reflow(3, 20);
        assert_eq!(rain.columns.len(), 3);

        rain.reflow(10, 20);
        assert_eq!(rain.columns.len(), 10);
    }

    #[test]
    fn glyph_pick_is_stable_per_cell() {
        assert_eq!(glyph_at(4, 17), glyph_at(4, 17));
        assert!(GLYPHS.contains(&glyph_at(0, 0)));
    }
}
