//! Salmon Chase entry point
//!
//! Runs the simulation headless with a scripted input sequence. Rendering and
//! a real audio mixer plug in at the frame loop and the audio sink.

mod native_game {
    use std::path::PathBuf;

    use salmon_chase::Settings;
    use salmon_chase::audio::{AudioManager, LogAudio};
    use salmon_chase::consts::*;
    use salmon_chase::sim::{GameState, Key, KeyEvent, TickInput, tick};

    /// Game instance holding all state
    pub struct Game {
        pub state: GameState,
        audio: AudioManager<LogAudio>,
        accumulator: f32,
        input: TickInput,
    }

    impl Game {
        pub fn new(settings: Settings) -> Self {
            let mut audio = AudioManager::new(LogAudio::default());
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);
            Self {
                state: GameState::new(settings),
                audio,
                accumulator: 0.0,
                input: TickInput::default(),
            }
        }

        /// Queue a key event for the next tick
        pub fn key(&mut self, event: KeyEvent) {
            self.input.keys.push(event);
        }

        pub fn click(&mut self) {
            self.input.shoot = true;
        }

        /// Run simulation ticks for `dt_ms` of wall time
        pub fn update(&mut self, dt_ms: f32) {
            self.accumulator += dt_ms.min(100.0);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
                let input = std::mem::take(&mut self.input);
                tick(&mut self.state, &input, SIM_DT_MS);
                self.audio
                    .dispatch(&self.state.events, self.state.assets.sound_theme);
                self.accumulator -= SIM_DT_MS;
                substeps += 1;
            }
        }
    }

    /// Scripted session: swim, turn, glide in momentum mode, then shoot
    pub fn run(settings_path: Option<PathBuf>) {
        let settings = match settings_path {
            Some(path) => Settings::load(&path),
            None => Settings::default(),
        };
        let mut game = Game::new(settings);

        let frame_ms = 1000.0 / 60.0;
        for frame in 0..3600u32 {
            match frame {
                0 => game.key(KeyEvent::press(Key::Up)),
                60 => game.key(KeyEvent::press(Key::Right)),
                90 => game.key(KeyEvent::release(Key::Right)),
                240 => {
                    game.key(KeyEvent::release(Key::Up));
                    game.key(KeyEvent::release(Key::Letter('n')));
                    game.key(KeyEvent::press(Key::Up));
                }
                300 => game.key(KeyEvent::release(Key::Up)),
                600 => game.key(KeyEvent::release(Key::Letter('u'))),
                f if f > 600 && f % 90 == 0 => game.click(),
                _ => {}
            }
            game.update(frame_ms);

            if frame % 600 == 0 {
                let s = &game.state;
                log::info!(
                    "frame {}: points={} turtles={} fish={} pebbles={} alive={}",
                    frame,
                    s.points,
                    s.turtles.len(),
                    s.fishes.len(),
                    s.pebbles.len(),
                    s.salmon.is_alive()
                );
            }
        }

        log::info!(
            "Session over with {} points, {} sounds played",
            game.state.points,
            game.audio.sink().played.len()
        );
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Salmon Chase (headless) starting...");

    let settings_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    native_game::run(settings_path);
}
