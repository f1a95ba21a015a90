//! Frames: the engine's tech demo (default binary).
//!
//! A main menu, a playing scene that shows the measured frame rate next to a
//! bouncing block, and a pause menu. Settings come from `GG_*` environment
//! variables; logs go to `GG_LOG_FILE` (default `gg.log`).
//!
//! Keys: `Enter` start/resume, `p` pause, `Esc` back to the menu,
//! `q` or `Ctrl-C` quit.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use crossterm::terminal::{self, ClearType};
use crossterm::QueueableCommand;
use tracing::{info, warn};

use tui_gg::engine::{Blink, Context, Game, GameLoop, Scene, SceneManager, Transition};
use tui_gg::term::{Palette, Renderer};
use tui_gg::types::{glyph, Color, Flow, InputEvent, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SceneId {
    Menu,
    Playing,
    Paused,
}

fn clear_screen(out: &mut impl Write) -> io::Result<()> {
    out.queue(terminal::Clear(ClearType::All))?;
    out.flush()
}

fn draw_centered(renderer: &mut Renderer, text: &str, dy: i32, color: Color) {
    let (w, h) = renderer.size();
    let x = (i32::from(w) - text.chars().count() as i32) / 2;
    let y = i32::from(h) / 2 + dy;
    // Text wider than the screen is clipped.
    let _ = renderer.draw_text(text, x.max(0), y, color);
}

fn draw_border(renderer: &mut Renderer, color: Color) {
    let (w, h) = renderer.size();
    let (right, bottom) = (i32::from(w) - 1, i32::from(h) - 1);
    for x in 1..right {
        let _ = renderer.draw_char(glyph::LIGHT_HORIZONTAL, x, 0, color);
        let _ = renderer.draw_char(glyph::LIGHT_HORIZONTAL, x, bottom, color);
    }
    for y in 1..bottom {
        let _ = renderer.draw_char(glyph::LIGHT_VERTICAL, 0, y, color);
        let _ = renderer.draw_char(glyph::LIGHT_VERTICAL, right, y, color);
    }
    let _ = renderer.draw_char(glyph::LIGHT_DOWN_AND_RIGHT, 0, 0, color);
    let _ = renderer.draw_char(glyph::LIGHT_DOWN_AND_LEFT, right, 0, color);
    let _ = renderer.draw_char(glyph::LIGHT_UP_AND_RIGHT, 0, bottom, color);
    let _ = renderer.draw_char(glyph::LIGHT_UP_AND_LEFT, right, bottom, color);
}

struct Menu {
    prompt: Blink,
}

impl Scene<SceneId> for Menu {
    fn name(&self) -> &str {
        "menu"
    }

    fn enter(&mut self) {
        self.prompt.reset();
    }

    fn update(&mut self, dt: f64) -> Result<Transition<SceneId>> {
        self.prompt.tick(dt);
        Ok(Transition::Stay)
    }

    fn draw(&mut self, renderer: &mut Renderer) {
        draw_border(renderer, Color::BrightBlack);
        draw_centered(renderer, "F R A M E S", -3, Color::BrightCyan);
        if self.prompt.visible() {
            draw_centered(renderer, "Press ENTER", 0, Color::White);
        }
        draw_centered(renderer, "q to quit", 2, Color::BrightBlack);
    }

    fn handle_input(&mut self, event: InputEvent) -> Result<Transition<SceneId>> {
        Ok(match event.key {
            Key::Enter if event.is_press() => Transition::Switch(SceneId::Playing),
            _ => Transition::Stay,
        })
    }
}

/// Frame-rate readout plus a block bouncing off the screen edges.
struct Playing {
    fps: f64,
    frames: u64,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    bounds: (u16, u16),
    color: usize,
}

impl Playing {
    const BLOCK_W: u16 = 4;
    const BLOCK_H: u16 = 2;
    const COLORS: [Color; 6] = [
        Color::Red,
        Color::Yellow,
        Color::Green,
        Color::Cyan,
        Color::Blue,
        Color::Magenta,
    ];

    fn new() -> Self {
        Self {
            fps: 0.0,
            frames: 0,
            x: 1.0,
            y: 1.0,
            vx: 18.0,
            vy: 7.0,
            bounds: (0, 0),
            color: 0,
        }
    }

    fn bounce(pos: &mut f64, vel: &mut f64, max: f64) -> bool {
        if *pos < 1.0 {
            *pos = 1.0;
            *vel = vel.abs();
            true
        } else if *pos > max {
            *pos = max;
            *vel = -vel.abs();
            true
        } else {
            false
        }
    }
}

impl Scene<SceneId> for Playing {
    fn name(&self) -> &str {
        "playing"
    }

    fn update(&mut self, dt: f64) -> Result<Transition<SceneId>> {
        self.frames += 1;
        if dt > 0.0 {
            self.fps = 1.0 / dt;
        }

        let (w, h) = self.bounds;
        if w <= Self::BLOCK_W + 1 || h <= Self::BLOCK_H + 1 {
            return Ok(Transition::Stay);
        }
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        let max_x = f64::from(w - Self::BLOCK_W - 1);
        let max_y = f64::from(h - Self::BLOCK_H - 1);
        let hit_x = Self::bounce(&mut self.x, &mut self.vx, max_x);
        let hit_y = Self::bounce(&mut self.y, &mut self.vy, max_y);
        if hit_x || hit_y {
            self.color = (self.color + 1) % Self::COLORS.len();
        }
        Ok(Transition::Stay)
    }

    fn draw(&mut self, renderer: &mut Renderer) {
        self.bounds = renderer.size();
        draw_border(renderer, Color::BrightBlack);
        let _ = renderer.draw_rect(
            self.x as i32,
            self.y as i32,
            Self::BLOCK_W,
            Self::BLOCK_H,
            glyph::FULL_BLOCK,
            Self::COLORS[self.color],
        );
        draw_centered(renderer, &format!("FPS: {:.2}", self.fps), -1, Color::Blue);
        draw_centered(renderer, &format!("frame {}", self.frames), 0, Color::BrightBlack);
    }

    fn handle_input(&mut self, event: InputEvent) -> Result<Transition<SceneId>> {
        if event.key == Key::Escape {
            return Ok(Transition::Switch(SceneId::Menu));
        }
        if event.is_char('p') {
            return Ok(Transition::Switch(SceneId::Paused));
        }
        Ok(Transition::Stay)
    }
}

struct Paused;

impl Scene<SceneId> for Paused {
    fn name(&self) -> &str {
        "paused"
    }

    fn draw(&mut self, renderer: &mut Renderer) {
        draw_border(renderer, Color::Yellow);
        draw_centered(renderer, "PAUSED", -1, Color::BrightYellow);
        draw_centered(renderer, "ENTER resume  ESC menu", 1, Color::White);
    }

    fn handle_input(&mut self, event: InputEvent) -> Result<Transition<SceneId>> {
        Ok(match event.key {
            Key::Enter | Key::Char('p') | Key::Char('P') => Transition::Switch(SceneId::Playing),
            Key::Escape => Transition::Switch(SceneId::Menu),
            _ => Transition::Stay,
        })
    }
}

struct Frames {
    scenes: SceneManager<SceneId>,
    renderer: Renderer,
    palette: Arc<Palette>,
    size: (u16, u16),
}

impl Frames {
    fn new(ctx: &Context) -> Result<Self> {
        let mut scenes = SceneManager::new();
        scenes.add_scene(
            SceneId::Menu,
            Menu {
                prompt: Blink::new(0.5),
            },
        );
        scenes.add_scene(SceneId::Playing, Playing::new());
        scenes.add_scene(SceneId::Paused, Paused);
        let renderer = ctx.renderer()?;
        Ok(Self {
            scenes,
            size: renderer.size(),
            renderer,
            palette: ctx.palette(),
        })
    }
}

impl Game for Frames {
    fn init(&mut self) -> Result<()> {
        self.scenes.change_scene(SceneId::Menu)?;
        info!("frames initialized");
        Ok(())
    }

    fn update(&mut self, dt: f64) -> Result<Flow> {
        self.scenes.update(dt)
    }

    fn draw(&mut self) {
        self.renderer.clear();
        self.scenes.draw(&mut self.renderer);
        if let Err(err) = self.renderer.render(&mut io::stdout().lock()) {
            warn!(%err, "frame dropped");
        }
    }

    fn handle_input(&mut self, event: InputEvent) -> Result<Flow> {
        if event.is_char('q') || (event.ctrl && event.is_char('c')) {
            return Ok(Flow::Quit);
        }
        self.scenes.handle_input(event)
    }

    fn size(&self) -> Option<(u16, u16)> {
        Some(self.size)
    }

    /// `columns`/`rows` arrive already clamped to [`Game::size`].
    fn resize(&mut self, columns: u16, rows: u16) {
        if (columns, rows) == self.renderer.size() {
            return;
        }
        match Renderer::new(columns, rows, Arc::clone(&self.palette)) {
            Ok(renderer) => {
                info!(width = columns, height = rows, "renderer resized");
                self.renderer = renderer;
                // Old frame content may sit outside the new grid.
                if let Err(err) = clear_screen(&mut io::stdout().lock()) {
                    warn!(%err, "unable to clear screen");
                }
            }
            Err(err) => warn!(%err, "terminal too small, keeping previous size"),
        }
    }

    fn cleanup(&mut self) {
        if let Err(err) = self.renderer.show_cursor(&mut io::stdout().lock()) {
            warn!(%err, "unable to show cursor");
        }
        info!("frames cleaned up");
    }
}

fn main() -> Result<()> {
    let ctx = Context::from_env()?;
    let game = ctx.in_scope(|| Frames::new(&ctx))?;
    let reason = GameLoop::new(game, &ctx).run()?;
    ctx.in_scope(|| info!(?reason, "exited"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_screen_erases_whole_display() {
        let mut out = Vec::new();
        clear_screen(&mut out).unwrap();
        assert_eq!(out, b"\x1b[2J");
    }
}
