//! Frame-stepped world update
//!
//! One call to [`tick`] applies queued input and advances every entity by the
//! elapsed frame time. The order of the steps matters: collisions are
//! resolved before movement, and later pebble collisions see the effects of
//! earlier ones.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GameState};
use crate::audio::SoundTheme;
use crate::consts::*;
use crate::settings::{FRAME_SKIP_STEP, clamp_frame_skip};

/// Keyboard keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Letter keys, lowercase
    Letter(char),
    Comma,
    Period,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Repeat,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub action: KeyAction,
    pub shift: bool,
}

impl KeyEvent {
    pub fn press(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Press,
            shift: false,
        }
    }

    pub fn release(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Release,
            shift: false,
        }
    }

    pub fn with_shift(self) -> Self {
        Self { shift: true, ..self }
    }
}

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keyboard events in arrival order
    pub keys: Vec<KeyEvent>,
    /// Left mouse button pressed
    pub shoot: bool,
}

fn is_forward(key: Key) -> bool {
    matches!(key, Key::Up | Key::Letter('w'))
}

fn is_backward(key: Key) -> bool {
    matches!(key, Key::Down | Key::Letter('s'))
}

fn is_turn_right(key: Key) -> bool {
    matches!(key, Key::Right | Key::Letter('d'))
}

fn is_turn_left(key: Key) -> bool {
    matches!(key, Key::Left | Key::Letter('a'))
}

/// Apply one keyboard event
pub fn handle_key(state: &mut GameState, event: KeyEvent) {
    let key = event.key;
    let held = matches!(event.action, KeyAction::Press | KeyAction::Repeat);
    let released = event.action == KeyAction::Release;

    let direction = if is_forward(key) {
        Some(Vec2::new(1.0, 0.0))
    } else if is_backward(key) {
        Some(Vec2::new(-1.0, 0.0))
    } else {
        None
    };

    if let Some(direction) = direction {
        if held {
            if state.modes.momentum {
                state.momentum_velocity = direction;
                state.move_timer = 1.0;
                state.key_up = false;
            }
            state.salmon.set_velocity(direction);
        } else if released {
            if state.modes.momentum {
                state.key_up = true;
            } else {
                state.salmon.set_velocity(Vec2::ZERO);
            }
        }
    }

    if is_turn_right(key) || is_turn_left(key) {
        if held {
            let turn = if is_turn_right(key) { 1.0 } else { -1.0 };
            state.salmon.start_rotating(turn);
        } else if released {
            state.salmon.stop_rotating();
        }
    }

    match (key, event.action) {
        (Key::Letter('n'), KeyAction::Release) => {
            state.modes.momentum = true;
            log::info!("Momentum mode on");
        }
        (Key::Letter('m'), KeyAction::Release) => {
            state.modes.momentum = false;
            log::info!("Momentum mode off");
        }
        (Key::Letter('k'), KeyAction::Release) if !state.modes.shooting => {
            state.modes.chase = true;
            state.turtles.truncate(1);
            if let Some(lead) = state.turtles.first_mut() {
                lead.set_chasing(true);
            }
            log::info!("Chase mode on");
        }
        (Key::Letter('l'), KeyAction::Release) => {
            state.modes.chase = false;
            if let Some(lead) = state.turtles.first_mut() {
                lead.set_chasing(false);
            }
            log::info!("Chase mode off");
        }
        (Key::Letter('b'), KeyAction::Press) => {
            state.modes.debug = !state.modes.debug;
            if !state.modes.debug {
                state.frozen = false;
                state.freeze_elapsed_ms = 0.0;
            }
            log::info!("Debug mode {}", if state.modes.debug { "on" } else { "off" });
        }
        (Key::Letter('u'), KeyAction::Release) => {
            state.modes.shooting = true;
            state.modes.chase = false;
            state.turtle_delay_ms = TURTLE_DELAY_MS / 2.0;
            state.assets.sound_theme = SoundTheme::Alternate;
            state.reskin_all();
            if let Some(lead) = state.turtles.first_mut() {
                lead.set_chasing(false);
            }
            state.events.push(GameEvent::ThemeChanged);
            log::info!("Shooting mode on");
        }
        (Key::Letter('i'), KeyAction::Release) => {
            state.modes.shooting = false;
            state.turtle_delay_ms = TURTLE_DELAY_MS;
            state.assets.sound_theme = SoundTheme::Default;
            state.reskin_all();
            state.events.push(GameEvent::ThemeChanged);
            log::info!("Shooting mode off");
        }
        (Key::Letter('r'), KeyAction::Release) => state.reset(),
        (Key::Comma, KeyAction::Release) if event.shift => state.current_speed -= 0.1,
        (Key::Period, KeyAction::Release) if event.shift => state.current_speed += 0.1,
        (Key::Letter('p'), KeyAction::Release) => {
            state.frame_skip = clamp_frame_skip(state.frame_skip.saturating_sub(FRAME_SKIP_STEP));
        }
        (Key::Letter('o'), KeyAction::Release) => {
            state.frame_skip = clamp_frame_skip(state.frame_skip + FRAME_SKIP_STEP);
        }
        _ => {}
    }

    state.current_speed = state.current_speed.max(0.0);
}

/// Shoot a pebble from the mouth if shooting mode is on and the cooldown is over
pub fn shoot(state: &mut GameState) {
    if !state.modes.shooting || !state.can_shoot {
        return;
    }
    state.can_shoot = false;
    let mouth = state.salmon.mouth_position();
    if state
        .pebbles
        .spawn(mouth, state.salmon.radians, state.settings.gravity)
    {
        state.events.push(GameEvent::PebbleShot);
    }
}

/// Advance the world by `elapsed_ms`
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f32) {
    state.events.clear();

    for &event in &input.keys {
        handle_key(state, event);
    }
    if input.shoot {
        shoot(state);
    }

    if let Some(dead_ms) = state.dead_ms.as_mut() {
        *dead_ms += elapsed_ms;
    }

    if state.modes.shooting && !state.can_shoot {
        state.shoot_timer_ms += elapsed_ms;
        if state.shoot_timer_ms > state.settings.shoot_frequency_ms {
            state.can_shoot = true;
            state.shoot_timer_ms = 0.0;
        }
    }

    if state.modes.debug {
        state.age_collision_points(elapsed_ms);
    }

    if state.frozen && state.modes.debug && state.salmon.is_alive() {
        state.freeze_elapsed_ms += elapsed_ms;
        if state.freeze_elapsed_ms > state.settings.freeze_time_ms {
            let velocity = state.collision_velocity;
            state.salmon.reverse_direction(velocity);
            state.freeze_elapsed_ms = 0.0;
            state.frozen = false;
            if state.modes.momentum {
                state.salmon.set_velocity(velocity);
            }
        }
    }

    if state.frozen && state.modes.debug {
        return;
    }

    step_world(state, elapsed_ms);
}

fn step_world(state: &mut GameState, ms: f32) {
    state.frame_count += 1;
    let screen = state.settings.screen;

    resolve_salmon_contacts(state);

    if state.modes.momentum && state.key_up {
        state.move_timer = (state.move_timer - MOMENTUM_DECAY).max(0.0);
        state
            .salmon
            .set_velocity(state.momentum_velocity * state.move_timer);
    }

    if state.salmon.is_alive() && state.salmon.collides_with_wall() {
        if state.modes.debug {
            let points = state.salmon.collision_points().to_vec();
            for point in points {
                state.add_collision_point(point);
            }
            state.frozen = true;
            state.freeze_elapsed_ms = 0.0;
            state.collision_velocity = state.salmon.velocity();
            state.salmon.set_velocity(Vec2::ZERO);
        } else {
            let velocity = state.salmon.velocity();
            state.salmon.reverse_direction(velocity);
        }
    }

    resolve_pebble_collisions(state);

    state.salmon.update(ms);
    if state.modes.chase && state.salmon.is_alive() {
        if let Some(lead) = state.turtles.first_mut() {
            lead.update_speed(state.salmon.position);
        }
    }
    let critter_ms = ms * state.current_speed;
    for turtle in &mut state.turtles {
        turtle.update(critter_ms);
    }
    for fish in &mut state.fishes {
        fish.update(critter_ms);
    }
    let current = state.modes.shooting.then_some(state.current_speed);
    state.pebbles.update(ms, &state.salmon, current);

    if !state.modes.shooting {
        emit_pebble_groups(state, ms);
    }

    let assets = &state.assets;
    if !state.modes.chase {
        state.turtles.retain(|t| {
            let half_width = t.bounding_box(assets).x / 2.0;
            !(t.position.x + half_width < 0.0 || t.position.x - TURTLE_CULL_MARGIN > screen.x)
        });
    }
    state
        .fishes
        .retain(|f| f.position.x + f.bounding_box(assets).x / 2.0 >= 0.0);

    spawn_critters(state, ms);

    if state.frame_count > state.frame_skip && state.salmon.is_alive() {
        state.recompute_paths();
        state.frame_count = 0;
    }

    if state.dead_ms.is_some_and(|t| t > DEATH_RESET_MS) {
        state.reset();
    }
}

/// Salmon against turtles (death) and fish (food)
fn resolve_salmon_contacts(state: &mut GameState) {
    let assets = &state.assets;
    let salmon = &state.salmon;
    let caught = state
        .turtles
        .iter()
        .any(|t| salmon.collides_with(t.position, t.bounding_box(assets)));
    if caught {
        if state.salmon.is_alive() {
            state.events.push(GameEvent::SalmonDied);
            state.dead_ms = Some(0.0);
            log::info!("Salmon caught with {} points", state.points);
        }
        state.salmon.kill();
    }

    if !state.salmon.is_alive() {
        return;
    }
    let before = state.fishes.len();
    let salmon = &state.salmon;
    state
        .fishes
        .retain(|f| !salmon.collides_with(f.position, f.bounding_box(assets)));
    for _ in state.fishes.len()..before {
        state.salmon.light_up();
        state.points += 1;
        state.events.push(GameEvent::FishEaten);
    }
}

/// Pebbles against each other, then turtles, fish and the salmon
fn resolve_pebble_collisions(state: &mut GameState) {
    state.pebbles.collide_pebbles();

    let shooting = state.modes.shooting;
    for turtle in &mut state.turtles {
        let hits = state
            .pebbles
            .collide_with_body(turtle.position, turtle.bounding_box(&state.assets));
        if shooting {
            for _ in 0..hits {
                turtle.turn_around();
            }
        }
    }
    for fish in &mut state.fishes {
        let hits = state
            .pebbles
            .collide_with_body(fish.position, fish.bounding_box(&state.assets));
        if shooting && hits > 0 {
            fish.slow_down();
        }
    }
    state.pebbles.collide_with_salmon(&state.salmon);
}

fn emit_pebble_groups(state: &mut GameState, ms: f32) {
    let (min_size, extra) = state.settings.pebble_group_size;
    let group = &mut state.pebble_group;

    if !group.active {
        group.group_timer_ms += ms;
    }

    if group.group_timer_ms > state.settings.pebble_group_frequency_ms && state.salmon.is_alive() {
        let extra = if extra > 0 {
            state.rng.random_range(0..extra)
        } else {
            0
        };
        group.to_spawn = extra + min_size;
        group.active = true;
        group.group_timer_ms = 0.0;
    }

    if group.active {
        group.pebble_timer_ms += ms;
        if group.pebble_timer_ms > state.settings.pebble_frequency_ms {
            state.pebbles.spawn(
                state.salmon.mouth_position(),
                state.salmon.radians,
                state.settings.gravity,
            );
            group.spawned += 1;
            group.pebble_timer_ms = 0.0;
        }
        if group.spawned >= group.to_spawn {
            group.active = false;
            group.spawned = 0;
        }
    }
}

fn spawn_critters(state: &mut GameState, ms: f32) {
    let critter_ms = ms * state.current_speed;

    if !state.modes.chase {
        state.next_turtle_spawn_ms -= critter_ms;
        if state.turtles.len() <= MAX_TURTLES
            && state.next_turtle_spawn_ms < 0.0
            && state.spawn_turtle()
        {
            state.next_turtle_spawn_ms = state.next_delay(state.turtle_delay_ms);
        }
    }

    state.next_fish_spawn_ms -= critter_ms;
    if state.fishes.len() <= MAX_FISH && state.next_fish_spawn_ms < 0.0 && state.spawn_fish() {
        if state.salmon.is_alive() {
            if let Some(fish) = state.fishes.last_mut() {
                fish.calculate_path(&state.salmon);
                state.debug_paths.push(fish.path().iter().copied().collect());
            }
        }
        state.next_fish_spawn_ms = state.next_delay(FISH_DELAY_MS);
    }
}
