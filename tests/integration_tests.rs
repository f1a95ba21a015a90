//! End-to-end: a scene-driven game run headless through the facade crate,
//! rendering into memory instead of a terminal.

use std::io;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;

use tui_gg::engine::{
    Context, Game, GameLoop, LoopConfig, Scene, SceneManager, Signals, StopReason, Transition,
};
use tui_gg::input::{AfterScript, ScriptedSource};
use tui_gg::term::{Palette, Renderer, TerminalMode};
use tui_gg::types::{Color, Flow, InputEvent, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Screen {
    Title,
    Play,
}

struct Title;

impl Scene<Screen> for Title {
    fn draw(&mut self, renderer: &mut Renderer) {
        renderer.draw_text("TITLE", 0, 0, Color::Yellow).unwrap();
    }

    fn handle_input(&mut self, event: InputEvent) -> anyhow::Result<Transition<Screen>> {
        Ok(if event.key == Key::Enter {
            Transition::Switch(Screen::Play)
        } else {
            Transition::Stay
        })
    }
}

struct Play {
    ticks: u32,
}

impl Scene<Screen> for Play {
    fn update(&mut self, _dt: f64) -> anyhow::Result<Transition<Screen>> {
        self.ticks += 1;
        Ok(if self.ticks >= 3 {
            Transition::Quit
        } else {
            Transition::Stay
        })
    }

    fn draw(&mut self, renderer: &mut Renderer) {
        renderer.draw_pixel(1, 1, Color::Green).unwrap();
    }
}

struct Headless;

impl TerminalMode for Headless {
    fn enter(&self) -> io::Result<()> {
        Ok(())
    }

    fn restore(&self) -> io::Result<()> {
        Ok(())
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((10, 3))
    }
}

struct Demo {
    scenes: SceneManager<Screen>,
    renderer: Renderer,
    frames: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl Game for Demo {
    fn init(&mut self) -> anyhow::Result<()> {
        self.scenes.change_scene(Screen::Title)?;
        Ok(())
    }

    fn update(&mut self, dt: f64) -> anyhow::Result<Flow> {
        self.scenes.update(dt)
    }

    fn draw(&mut self) {
        self.renderer.clear();
        self.scenes.draw(&mut self.renderer);
        let mut out = Vec::new();
        self.renderer.render(&mut out).unwrap();
        self.frames.lock().unwrap().push(out);
    }

    fn handle_input(&mut self, event: InputEvent) -> anyhow::Result<Flow> {
        self.scenes.handle_input(event)
    }
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle.as_bytes())
}

#[test]
fn title_then_play_then_quit() {
    let ctx = Context::silent(LoopConfig {
        width: 10,
        height: 3,
        target_fps: 500.0,
        ..LoopConfig::default()
    })
    .with_palette(Palette::ansi16().with_default(Color::White));

    let mut scenes = SceneManager::new();
    scenes.add_scene(Screen::Title, Title);
    scenes.add_scene(Screen::Play, Play { ticks: 0 });
    let frames = Arc::new(Mutex::new(Vec::new()));
    let game = Demo {
        scenes,
        renderer: ctx.renderer().unwrap(),
        frames: Arc::clone(&frames),
    };

    let (_trigger, signals) = Signals::manual();
    let script = ScriptedSource::new([InputEvent::press(Key::Enter)], AfterScript::Idle);
    let mut game_loop = GameLoop::new(game, &ctx)
        .with_terminal(Headless)
        .with_signals(signals)
        .with_input_source(script);

    assert_eq!(game_loop.run().unwrap(), StopReason::Quit);

    let frames = frames.lock().unwrap();
    let last = frames.last().unwrap();
    assert!(contains(last, "\x1b[32m█"), "play scene drew its pixel");
    assert!(!contains(last, "TITLE"));
    assert!(last.starts_with(b"\x1b[1;1H\x1b[?25l"));
    assert_eq!(game_loop.into_game().scenes.active(), Some(Screen::Play));
}
