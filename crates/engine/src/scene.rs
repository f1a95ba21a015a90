//! Scene state machine.
//!
//! A game registers its scenes (menu, playing, pause, game over, ...) under
//! small identifiers and the manager keeps exactly one of them active,
//! forwarding update/draw/input to it. Switching scenes always runs the old
//! scene's `exit` to completion before the new scene's `enter`.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;
use tracing::debug;

use crate::term::Renderer;
use crate::types::{Flow, InputEvent};

/// What a scene wants after handling input or an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<Id> {
    Stay,
    Switch(Id),
    Quit,
}

/// One mode of the application.
pub trait Scene<Id> {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn enter(&mut self) {}

    fn exit(&mut self) {}

    fn update(&mut self, _dt: f64) -> anyhow::Result<Transition<Id>> {
        Ok(Transition::Stay)
    }

    fn draw(&mut self, renderer: &mut Renderer);

    fn handle_input(&mut self, _event: InputEvent) -> anyhow::Result<Transition<Id>> {
        Ok(Transition::Stay)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// Switching to an id nobody registered is a programming error.
    #[error("scene {0} is not registered")]
    Unregistered(String),
}

pub struct SceneManager<Id> {
    scenes: HashMap<Id, Box<dyn Scene<Id>>>,
    active: Option<Id>,
}

impl<Id> Default for SceneManager<Id> {
    fn default() -> Self {
        Self {
            scenes: HashMap::new(),
            active: None,
        }
    }
}

impl<Id: Copy + Eq + Hash + Debug> SceneManager<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `scene` under `id`, returning any scene it replaces.
    pub fn add_scene(
        &mut self,
        id: Id,
        scene: impl Scene<Id> + 'static,
    ) -> Option<Box<dyn Scene<Id>>> {
        self.scenes.insert(id, Box::new(scene))
    }

    pub fn active(&self) -> Option<Id> {
        self.active
    }

    pub fn contains(&self, id: Id) -> bool {
        self.scenes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Exit the active scene (if any), then enter `id`.
    ///
    /// Switching to the scene that is already active still runs a full
    /// exit/enter cycle. An unregistered `id` fails before anything is exited.
    pub fn change_scene(&mut self, id: Id) -> Result<(), SceneError> {
        if !self.scenes.contains_key(&id) {
            return Err(SceneError::Unregistered(format!("{id:?}")));
        }

        if let Some(current) = self.active.take() {
            if let Some(scene) = self.scenes.get_mut(&current) {
                debug!(scene = scene.name(), "exiting scene");
                scene.exit();
            }
        }

        self.active = Some(id);
        if let Some(scene) = self.scenes.get_mut(&id) {
            debug!(scene = scene.name(), "entering scene");
            scene.enter();
        }
        Ok(())
    }

    pub fn update(&mut self, dt: f64) -> anyhow::Result<Flow> {
        let transition = match self.active_scene() {
            Some(scene) => scene.update(dt)?,
            None => return Ok(Flow::Continue),
        };
        Ok(self.apply(transition)?)
    }

    pub fn draw(&mut self, renderer: &mut Renderer) {
        if let Some(scene) = self.active_scene() {
            scene.draw(renderer);
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) -> anyhow::Result<Flow> {
        let transition = match self.active_scene() {
            Some(scene) => scene.handle_input(event)?,
            None => return Ok(Flow::Continue),
        };
        Ok(self.apply(transition)?)
    }

    fn active_scene(&mut self) -> Option<&mut Box<dyn Scene<Id>>> {
        let id = self.active?;
        self.scenes.get_mut(&id)
    }

    fn apply(&mut self, transition: Transition<Id>) -> Result<Flow, SceneError> {
        match transition {
            Transition::Stay => Ok(Flow::Continue),
            Transition::Switch(id) => {
                self.change_scene(id)?;
                Ok(Flow::Continue)
            }
            Transition::Quit => Ok(Flow::Quit),
        }
    }
}

/// Toggling visibility timer, e.g. for a blinking "press enter" prompt.
///
/// Scenes embed one and tick it from `update`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blink {
    interval: f64,
    elapsed: f64,
    visible: bool,
}

impl Blink {
    /// Starts visible; flips every `interval` seconds.
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            elapsed: 0.0,
            visible: true,
        }
    }

    /// Advance by `dt` seconds. Returns `true` when visibility flipped.
    pub fn tick(&mut self, dt: f64) -> bool {
        if self.interval <= 0.0 {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return false;
        }
        self.elapsed %= self.interval;
        self.visible = !self.visible;
        true
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.visible = true;
    }
}
