use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::{
    blend::MixFactor,
    buffer::FrameRGB,
    error::{MorphixError, MorphixResult},
    session::BlendSession,
};

/// Height of the slider strip rendered below the image.
const SLIDER_HEIGHT: usize = 24;
const TRACK_MARGIN: usize = 10;

const COLOR_STRIP: u32 = 0x00_20_20_20;
const COLOR_TRACK: u32 = 0x00_55_55_55;
const COLOR_FILL: u32 = 0x00_C8_C8_C8;
const COLOR_HANDLE: u32 = 0x00_FF_FF_FF;

#[derive(Clone, Debug)]
pub struct ViewerOpts {
    pub title: String,
    pub initial: MixFactor,
}

impl Default for ViewerOpts {
    fn default() -> Self {
        Self {
            title: "morphix".to_string(),
            initial: MixFactor::HALF,
        }
    }
}

/// Pixel geometry of the slider track; pure so the value<->pixel mapping can
/// be tested without a window.
#[derive(Clone, Copy, Debug)]
struct SliderGeometry {
    width: usize,
}

impl SliderGeometry {
    fn track(self) -> (usize, usize) {
        let x1 = self.width.saturating_sub(TRACK_MARGIN);
        (TRACK_MARGIN.min(x1), x1)
    }

    fn value_at(self, x: f32) -> MixFactor {
        let (x0, x1) = self.track();
        if x1 <= x0 {
            return MixFactor::ZERO;
        }
        let t = (x - x0 as f32) / (x1 - x0) as f32;
        MixFactor::from_fraction(t)
    }

    fn handle_x(self, mix: MixFactor) -> usize {
        let (x0, x1) = self.track();
        x0 + (mix.as_fraction() * (x1 - x0) as f32).round() as usize
    }
}

/// Interactive blend preview. Click or drag on the slider strip to set the
/// mix factor; Left/Right step by 1, Up/Down by 10, Home/End jump to the
/// endpoints; B toggles the blur post-pass; Escape (or closing the window)
/// exits. The frame is only re-rendered when something changed.
pub fn run_viewer(session: &mut BlendSession, opts: ViewerOpts) -> MorphixResult<()> {
    let (width, height) = session.dimensions();
    let (w, h) = (width as usize, height as usize);
    let slider = SliderGeometry { width: w };

    let mut window = Window::new(&opts.title, w, h + SLIDER_HEIGHT, WindowOptions::default())
        .map_err(|e| MorphixError::display(format!("failed to open window: {e}")))?;
    window.set_target_fps(60);

    let blur_opts = session.blur().unwrap_or_default();
    let mut blur_on = session.blur().is_some();
    let mut mix = opts.initial;
    let mut screen = vec![0u32; w * (h + SLIDER_HEIGHT)];
    let mut needs_render = true;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let mut next = i32::from(mix.as_percent());
        if window.is_key_pressed(Key::Right, KeyRepeat::Yes) {
            next += 1;
        }
        if window.is_key_pressed(Key::Left, KeyRepeat::Yes) {
            next -= 1;
        }
        if window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
            next += 10;
        }
        if window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
            next -= 10;
        }
        if window.is_key_pressed(Key::Home, KeyRepeat::No) {
            next = 0;
        }
        if window.is_key_pressed(Key::End, KeyRepeat::No) {
            next = 100;
        }

        if window.get_mouse_down(MouseButton::Left)
            && let Some((mx, my)) = window.get_mouse_pos(MouseMode::Clamp)
            && my as usize >= h
        {
            next = i32::from(slider.value_at(mx).as_percent());
        }

        let clamped = MixFactor::percent(next.clamp(0, 100) as u32)?;
        if clamped != mix {
            mix = clamped;
            needs_render = true;
        }

        if window.is_key_pressed(Key::B, KeyRepeat::No) {
            blur_on = !blur_on;
            session.set_blur(blur_on.then_some(blur_opts));
            needs_render = true;
        }

        if needs_render {
            let frame = session.render(mix)?;
            pack_rgb(frame, &mut screen[..w * h]);
            draw_slider(&mut screen[w * h..], slider, mix);
            needs_render = false;
        }

        window
            .update_with_buffer(&screen, w, h + SLIDER_HEIGHT)
            .map_err(|e| MorphixError::display(format!("failed to update window: {e}")))?;
    }

    Ok(())
}

/// RGB8 to minifb's 0x00RRGGBB packing.
fn pack_rgb(frame: &FrameRGB, dst: &mut [u32]) {
    for (d, px) in dst.iter_mut().zip(frame.data.chunks_exact(3)) {
        *d = (u32::from(px[0]) << 16) | (u32::from(px[1]) << 8) | u32::from(px[2]);
    }
}

fn draw_slider(strip: &mut [u32], slider: SliderGeometry, mix: MixFactor) {
    let w = slider.width;
    strip.fill(COLOR_STRIP);

    let (x0, x1) = slider.track();
    let handle = slider.handle_x(mix);
    let mid = SLIDER_HEIGHT / 2;

    for row in [mid - 1, mid, mid + 1] {
        for x in x0..x1 {
            let color = if x <= handle { COLOR_FILL } else { COLOR_TRACK };
            strip[row * w + x] = color;
        }
    }

    // 3px-wide handle over the full strip height, minus a small inset.
    for row in 3..SLIDER_HEIGHT - 3 {
        for x in handle.saturating_sub(1)..=(handle + 1).min(w - 1) {
            strip[row * w + x] = COLOR_HANDLE;
        }
    }
}
