//! Scene presentation: the menu, the running session, and the fade between them
//!
//! `Director` owns exactly one active scene. The menu starts a fresh session on
//! a tap on its start button; a session that terminates is dropped and replaced
//! by a fresh menu in the same update.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::sim::{GameEvent, GameSession, TickInput, tick};

/// Which scene is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneKind {
    Menu,
    Session,
}

/// A line of text drawn by the frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    /// Centre of the text box, not its baseline
    pub position: Vec2,
    pub font_size: f32,
}

impl Label {
    fn new(text: &str, position: Vec2, font_size: f32) -> Self {
        Self {
            text: text.to_string(),
            position,
            font_size,
        }
    }

    /// Approximate half extents of the rendered text
    pub fn half_extents(&self) -> Vec2 {
        let chars = self.text.chars().count() as f32;
        Vec2::new(chars * self.font_size * 0.3, self.font_size / 2.0)
    }

    /// Whether a point lands on the text
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.position).abs();
        let half = self.half_extents();
        d.x <= half.x && d.y <= half.y
    }
}

/// Title screen waiting for a start gesture
#[derive(Debug, Clone)]
pub struct MenuScene {
    pub title: Label,
    pub start_button: Label,
}

impl MenuScene {
    pub fn new(config: &GameConfig) -> Self {
        let w = config.playfield_width;
        let h = config.playfield_height;
        Self {
            title: Label::new("Flappy Bird", Vec2::new(w / 2.0, h * 0.7), 50.0),
            start_button: Label::new("Start Game", Vec2::new(w / 2.0, h * 0.5), 40.0),
        }
    }

    /// Whether this input asks for a new session
    pub fn wants_start(&self, input: &TickInput) -> bool {
        input.autopilot || input.tap.is_some_and(|p| self.start_button.contains(p))
    }

    pub fn labels(&self) -> [&Label; 2] {
        [&self.title, &self.start_button]
    }
}

/// The active scene
#[derive(Debug)]
pub enum Scene {
    Menu(MenuScene),
    Session(Box<GameSession>),
}

impl Scene {
    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Menu(_) => SceneKind::Menu,
            Scene::Session(_) => SceneKind::Session,
        }
    }
}

/// Cosmetic cross-fade between scenes
#[derive(Debug, Clone)]
pub struct Transition {
    pub duration: f32,
    pub elapsed: f32,
}

impl Transition {
    pub fn fade(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
        }
    }

    /// Fade progress (0 = just started, 1 = done)
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_done(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Owns the active scene and swaps it on start/game over
#[derive(Debug)]
pub struct Director {
    config: GameConfig,
    scene: Scene,
    transition: Option<Transition>,
    /// Seeds each new session
    seeds: Pcg32,
    sessions_started: u32,
    last_score: Option<u32>,
    events: Vec<GameEvent>,
}

impl Director {
    /// Start on the menu
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let menu = MenuScene::new(&config);
        Self {
            config,
            scene: Scene::Menu(menu),
            transition: None,
            seeds: Pcg32::seed_from_u64(seed),
            sessions_started: 0,
            last_score: None,
            events: Vec::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_kind(&self) -> SceneKind {
        self.scene.kind()
    }

    /// The running session, if one is on screen
    pub fn session(&self) -> Option<&GameSession> {
        match &self.scene {
            Scene::Session(session) => Some(session.as_ref()),
            Scene::Menu(_) => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut GameSession> {
        match &mut self.scene {
            Scene::Session(session) => Some(session.as_mut()),
            Scene::Menu(_) => None,
        }
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn sessions_started(&self) -> u32 {
        self.sessions_started
    }

    /// Score of the most recently finished session
    pub fn last_score(&self) -> Option<u32> {
        self.last_score
    }

    /// Take session events collected since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace the active scene, dropping the old one
    pub fn present(&mut self, scene: Scene) {
        log::info!("Presenting {:?}", scene.kind());
        self.scene = scene;
        self.transition = Some(Transition::fade(self.config.transition_duration));
    }

    /// Build and present a fresh session
    pub fn start_session(&mut self) {
        let seed = self.seeds.random::<u64>();
        self.sessions_started += 1;
        let session = GameSession::new(self.config.clone(), seed);
        self.present(Scene::Session(Box::new(session)));
    }

    /// Advance the active scene by one fixed step
    pub fn update(&mut self, input: &TickInput, dt: f32) {
        if let Some(transition) = &mut self.transition {
            transition.elapsed += dt;
            if transition.is_done() {
                self.transition = None;
            }
        }

        let mut finished = None;
        let mut start = false;
        match &mut self.scene {
            Scene::Menu(menu) => start = menu.wants_start(input),
            Scene::Session(session) => {
                tick(session.as_mut(), input, dt);
                self.events.extend(session.drain_events());
                if !session.is_run_active() {
                    finished = Some(session.score());
                }
            }
        }

        if start {
            self.start_session();
        } else if let Some(score) = finished {
            self.last_score = Some(score);
            self.present(Scene::Menu(MenuScene::new(&self.config)));
        }
    }
}
