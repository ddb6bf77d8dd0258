use winit::window::Icon;

#[cfg(target_os = "macos")]
pub fn window_icon() -> Option<Icon> {
    None
}

#[cfg(not(target_os = "macos"))]
pub fn window_icon() -> Option<Icon> {
    match build_icon() {
        Ok(icon) => Some(icon),
        Err(err) => {
            log::warn!("Failed to build window icon: {}", err);
            None
        }
    }
}

/// Draws the icon instead of bundling one: green glyph streaks on black,
/// head pixel brightest.
#[cfg(not(target_os = "macos"))]
fn build_icon() -> Result<Icon, winit::window::BadIcon> {
    const SIZE: u32 = 32;

    let mut rgba = vec![0u8; (SIZE * SIZE * 4) as usize];

    for column in (2..SIZE).step_by(5) {
        let head = (column * 7 + 3) % SIZE;
        let trail = 9;

        for offset in 0..trail {
            let row = (head + SIZE - offset) % SIZE;
            let fade = 255 - (offset * 255 / trail) as u8;

            let index = ((row * SIZE + column) * 4) as usize;
            rgba[index] = if offset == 0 { 0xd0 } else { 0x00 };
            rgba[index + 1] = fade;
            rgba[index + 2] = if offset == 0 { 0xd0 } else { 0x30 };
            rgba[index + 3] = 0xff;
        }
    }

    Icon::from_rgba(rgba, SIZE, SIZE)
}
