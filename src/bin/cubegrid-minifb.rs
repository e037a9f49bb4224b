//! Pixel-buffer frontend: polls the mouse every frame and blits the panel's
//! software surface straight into a minifb window.

use anyhow::{Context, Result};
use cubegrid::{GridConfig, Panel, PixelSurface, Point, PointerEvent};
use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};

/// Turns per-frame mouse polling into press/move/release events
#[derive(Default)]
struct MouseTracker {
    down: bool,
    last: Option<(f32, f32)>,
}

impl MouseTracker {
    fn poll(&mut self, down: bool, pos: Option<(f32, f32)>) -> Option<PointerEvent> {
        let (x, y) = pos.or(self.last)?;
        let at = Point::new(x as f64, y as f64);
        let moved = self.last != Some((x, y));
        self.last = Some((x, y));
        match (self.down, down) {
            (false, true) => {
                self.down = true;
                Some(PointerEvent::Press(at))
            }
            (true, false) => {
                self.down = false;
                Some(PointerEvent::Release(at))
            }
            (true, true) if moved => Some(PointerEvent::Move(at)),
            _ => None,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let panel = Panel::new(GridConfig::load())?;
    let (width, height) = {
        let config = panel.config();
        (config.surface_width as usize, config.surface_height as usize)
    };

    let mut window = Window::new("cubegrid", width, height, WindowOptions::default())
        .context("opening window")?;
    window.set_target_fps(60);

    run(window, panel)
}

fn run(mut window: Window, mut panel: Panel) -> Result<()> {
    let mut frame: PixelSurface = panel.snapshot();
    let mut mouse = MouseTracker::default();
    let (width, height) = (panel.config().surface_width as usize, panel.config().surface_height as usize);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let down = window.get_mouse_down(MouseButton::Left);
        let pos = window.get_mouse_pos(MouseMode::Clamp);
        if let Some(event) = mouse.poll(down, pos) {
            let response = panel.handle(event);
            if response.redraw {
                panel.render(&mut frame, panel.background());
            }
            if let Some(outcome) = response.outcome {
                log::debug!("release: {outcome:?}, {} coverings", panel.coverings().len());
            }
        }
        window
            .update_with_buffer(frame.pixels(), width, height)
            .context("presenting frame")?;
    }
    Ok(())
}
