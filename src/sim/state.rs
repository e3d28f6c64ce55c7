//! World state
//!
//! Everything the tick mutates lives here: the entities, the mode flags and
//! the timers that drive spawning, pebble groups and the debug freeze.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::fish::Fish;
use super::pebbles::Pebbles;
use super::salmon::Salmon;
use super::turtle::Turtle;
use crate::assets::{AssetRegistry, Skin, Species};
use crate::audio::SoundTheme;
use crate::consts::*;
use crate::settings::Settings;

/// Things that happened during a tick, for audio and UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A turtle caught the salmon
    SalmonDied,
    /// The salmon ate a fish
    FishEaten,
    /// A pebble was shot in shooting mode
    PebbleShot,
    /// Shooting mode toggled the sound bank
    ThemeChanged,
    /// The world started over
    WorldReset,
}

/// Gameplay mode flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modes {
    /// Mode 1: the salmon keeps gliding after a move key is released
    pub momentum: bool,
    /// Mode 2: a single lead turtle chases the salmon
    pub chase: bool,
    /// Mode 3: click to shoot pebbles against the current
    pub shooting: bool,
    /// Debug overlays and wall-hit freeze
    pub debug: bool,
}

impl Modes {
    /// Texture skin for newly spawned and reskinned critters
    pub fn skin(&self) -> Skin {
        if self.shooting {
            Skin::Alternate
        } else {
            Skin::Default
        }
    }
}

/// Automatic pebble group emission outside shooting mode
#[derive(Debug, Clone, Default)]
pub struct PebbleGroup {
    pub group_timer_ms: f32,
    pub pebble_timer_ms: f32,
    pub to_spawn: u32,
    pub spawned: u32,
    pub active: bool,
}

/// A wall-hit vertex shown by the debug overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionMark {
    /// Local salmon vertex
    pub point: Vec2,
    pub age_ms: f32,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub assets: AssetRegistry,
    pub rng: Pcg32,

    pub salmon: Salmon,
    pub turtles: Vec<Turtle>,
    pub fishes: Vec<Fish>,
    pub pebbles: Pebbles,

    pub modes: Modes,
    pub points: u32,
    pub current_speed: f32,
    pub frame_skip: u32,
    /// Ticks since paths were last recomputed
    pub frame_count: u32,

    pub next_turtle_spawn_ms: f32,
    pub next_fish_spawn_ms: f32,
    pub turtle_delay_ms: f32,

    /// Momentum mode: direction of the last move key
    pub momentum_velocity: Vec2,
    /// Momentum mode: remaining glide, decays once the key is up
    pub move_timer: f32,
    pub key_up: bool,

    /// Debug mode: salmon frozen after a wall hit
    pub frozen: bool,
    pub freeze_elapsed_ms: f32,
    /// Velocity at the frozen wall hit, replayed when the freeze ends
    pub collision_velocity: Vec2,
    /// Debug overlay: paths of the last recompute
    pub debug_paths: Vec<Vec<Vec2>>,
    /// Debug overlay: local salmon vertices that crossed a wall, one mark per vertex
    pub debug_collision_points: Vec<CollisionMark>,

    pub pebble_group: PebbleGroup,
    pub shoot_timer_ms: f32,
    pub can_shoot: bool,

    /// Time since the salmon died
    pub dead_ms: Option<f32>,
    /// Events emitted by the last tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(settings: Settings) -> Self {
        let settings = settings.sanitized();
        let level = settings.level_bounds();
        let seed = settings.seed;
        Self {
            assets: AssetRegistry::default(),
            rng: Pcg32::seed_from_u64(seed),
            salmon: Salmon::new(level),
            turtles: Vec::new(),
            fishes: Vec::new(),
            pebbles: Pebbles::new(settings.screen, seed.wrapping_add(1)),
            modes: Modes::default(),
            points: 0,
            current_speed: settings.current_speed,
            frame_skip: settings.frame_skip,
            frame_count: 0,
            next_turtle_spawn_ms: 0.0,
            next_fish_spawn_ms: 0.0,
            turtle_delay_ms: TURTLE_DELAY_MS,
            momentum_velocity: Vec2::ZERO,
            move_timer: 0.0,
            key_up: true,
            frozen: false,
            freeze_elapsed_ms: 0.0,
            collision_velocity: Vec2::ZERO,
            debug_paths: Vec::new(),
            debug_collision_points: Vec::new(),
            pebble_group: PebbleGroup::default(),
            shoot_timer_ms: 0.0,
            can_shoot: true,
            dead_ms: None,
            events: Vec::new(),
            settings,
        }
    }

    /// Start over with a fresh salmon and no critters. The RNG keeps running.
    pub fn reset(&mut self) {
        self.salmon = Salmon::new(self.settings.level_bounds());
        self.pebbles.clear();
        self.turtles.clear();
        self.fishes.clear();
        self.current_speed = self.settings.current_speed;
        self.points = 0;
        self.frame_count = 0;
        self.next_turtle_spawn_ms = 0.0;
        self.next_fish_spawn_ms = 0.0;
        self.turtle_delay_ms = TURTLE_DELAY_MS;
        self.modes = Modes::default();
        self.key_up = false;
        self.move_timer = 0.0;
        self.frozen = false;
        self.freeze_elapsed_ms = 0.0;
        self.debug_paths.clear();
        self.debug_collision_points.clear();
        self.pebble_group = PebbleGroup::default();
        self.shoot_timer_ms = 0.0;
        self.can_shoot = true;
        self.dead_ms = None;
        self.assets.sound_theme = SoundTheme::Default;
        self.events.push(GameEvent::WorldReset);
        log::info!("World reset");
    }

    /// Random height for a critter entering from the right
    fn spawn_position(&mut self) -> Vec2 {
        let screen = self.settings.screen;
        Vec2::new(
            screen.x + SPAWN_OFFSET_X,
            50.0 + self.rng.random::<f32>() * (screen.y - 100.0),
        )
    }

    /// Random delay in `[delay / 2, delay)`
    pub fn next_delay(&mut self, delay_ms: f32) -> f32 {
        delay_ms / 2.0 + self.rng.random::<f32>() * (delay_ms / 2.0)
    }

    /// Add a turtle at the right edge. False if no turtle texture is registered.
    pub fn spawn_turtle(&mut self) -> bool {
        let skin = self.modes.skin();
        let Some(texture) = self.assets.handle(Species::Turtle, skin) else {
            log::warn!("Failed to spawn turtle: no texture registered");
            return false;
        };
        let position = self.spawn_position();
        self.turtles.push(Turtle::new(texture, skin, position));
        true
    }

    /// Add a fish at the right edge. False if no fish texture is registered.
    pub fn spawn_fish(&mut self) -> bool {
        let skin = self.modes.skin();
        let Some(texture) = self.assets.handle(Species::Fish, skin) else {
            log::warn!("Failed to spawn fish: no texture registered");
            return false;
        };
        let position = self.spawn_position();
        self.fishes.push(Fish::new(texture, skin, position));
        true
    }

    /// Swap every critter to the skin of the current mode
    pub fn reskin_all(&mut self) {
        let skin = self.modes.skin();
        if let Some(texture) = self.assets.handle(Species::Fish, skin) {
            for fish in &mut self.fishes {
                fish.reskin(texture, skin);
            }
        }
        if let Some(texture) = self.assets.handle(Species::Turtle, skin) {
            for turtle in &mut self.turtles {
                turtle.reskin(texture, skin);
            }
        }
    }

    /// Mark a wall-hit vertex, restarting its age if it is already shown
    pub fn add_collision_point(&mut self, point: Vec2) {
        match self.debug_collision_points.iter_mut().find(|m| m.point == point) {
            Some(mark) => mark.age_ms = 0.0,
            None => self
                .debug_collision_points
                .push(CollisionMark { point, age_ms: 0.0 }),
        }
    }

    /// Age the wall-hit marks and drop those older than `DEBUG_POINT_LIFE_MS`
    pub fn age_collision_points(&mut self, ms: f32) {
        for mark in &mut self.debug_collision_points {
            mark.age_ms += ms;
        }
        self.debug_collision_points
            .retain(|m| m.age_ms <= DEBUG_POINT_LIFE_MS);
    }

    /// Replan every fish (and the lead turtle when chasing), refreshing the debug overlay
    pub fn recompute_paths(&mut self) {
        self.debug_paths.clear();
        for fish in &mut self.fishes {
            fish.calculate_path(&self.salmon);
            self.debug_paths.push(fish.path().iter().copied().collect());
        }
        if self.modes.chase {
            if let Some(lead) = self.turtles.first_mut() {
                lead.calculate_path(self.salmon.position, &self.fishes);
                self.debug_paths.push(lead.path().iter().copied().collect());
            }
        }
        log::debug!("Recomputed {} paths", self.debug_paths.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(Settings::default());
        assert!(state.salmon.is_alive());
        assert!(state.turtles.is_empty());
        assert_eq!(state.current_speed, 0.25);
        assert_eq!(state.frame_skip, 40);
        assert!(state.can_shoot);
    }

    #[test]
    fn test_spawn_uses_mode_skin() {
        let mut state = GameState::new(Settings::default());
        assert!(state.spawn_fish());
        state.modes.shooting = true;
        assert!(state.spawn_turtle());

        let fish_default = state.assets.handle(Species::Fish, Skin::Default);
        let turtle_alt = state.assets.handle(Species::Turtle, Skin::Alternate);
        assert_eq!(Some(state.fishes[0].texture), fish_default);
        assert_eq!(Some(state.turtles[0].texture), turtle_alt);
    }

    #[test]
    fn test_spawn_position_in_band() {
        let mut state = GameState::new(Settings::default());
        for _ in 0..50 {
            assert!(state.spawn_fish());
        }
        for fish in &state.fishes {
            assert_eq!(fish.position.x, 1350.0);
            assert!(fish.position.y >= 50.0 && fish.position.y <= 750.0);
        }
    }

    #[test]
    fn test_spawn_without_texture_fails() {
        let mut state = GameState::new(Settings::default());
        state.assets = AssetRegistry::empty();
        assert!(!state.spawn_turtle());
        assert!(state.turtles.is_empty());
    }

    #[test]
    fn test_next_delay_range() {
        let mut state = GameState::new(Settings::default());
        for _ in 0..100 {
            let d = state.next_delay(3000.0);
            assert!((1500.0..3000.0).contains(&d));
        }
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = GameState::new(Settings::default());
        let mut b = GameState::new(Settings::default());
        for _ in 0..5 {
            a.spawn_fish();
            b.spawn_fish();
        }
        let ya: Vec<f32> = a.fishes.iter().map(|f| f.position.y).collect();
        let yb: Vec<f32> = b.fishes.iter().map(|f| f.position.y).collect();
        assert_eq!(ya, yb);
    }

    #[test]
    fn test_reset_clears_world() {
        let mut state = GameState::new(Settings::default());
        state.spawn_fish();
        state.spawn_turtle();
        state.points = 4;
        state.modes.shooting = true;
        state.salmon.kill();
        state.reset();
        assert!(state.salmon.is_alive());
        assert!(state.fishes.is_empty() && state.turtles.is_empty());
        assert_eq!(state.points, 0);
        assert_eq!(state.modes, Modes::default());
        assert_eq!(state.events.last(), Some(&GameEvent::WorldReset));
    }

    #[test]
    fn test_collision_marks_refresh_and_expire() {
        let mut state = GameState::new(Settings::default());
        state.add_collision_point(Vec2::new(-3.0, 0.0));
        state.add_collision_point(Vec2::new(1.0, 2.0));
        state.age_collision_points(1000.0);

        // Same vertex again: no duplicate, age restarts
        state.add_collision_point(Vec2::new(-3.0, 0.0));
        assert_eq!(state.debug_collision_points.len(), 2);

        state.age_collision_points(600.0);
        assert_eq!(
            state.debug_collision_points,
            vec![CollisionMark {
                point: Vec2::new(-3.0, 0.0),
                age_ms: 600.0,
            }]
        );

        state.age_collision_points(1000.0);
        assert!(state.debug_collision_points.is_empty());
    }

    #[test]
    fn test_recompute_paths_fills_overlay() {
        let mut state = GameState::new(Settings::default());
        state.spawn_fish();
        state.spawn_fish();
        state.recompute_paths();
        assert_eq!(state.debug_paths.len(), 2);
        for (fish, path) in state.fishes.iter().zip(&state.debug_paths) {
            assert_eq!(path.last().copied(), Some(Vec2::new(FISH_GOAL_X, fish.position.y)));
        }
    }
}
