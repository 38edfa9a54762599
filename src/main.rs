//! Tilt Bounce headless host
//!
//! Runs the simulation in real time with a scripted tilt feed on a sensor
//! thread, auto-playing Title -> InGame -> GameOver -> Title.
//!
//! Usage: `tilt-bounce [tuning.json] [seed] [seconds]`

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;

use tilt_bounce::Tuning;
use tilt_bounce::consts::*;
use tilt_bounce::presentation::{LogPresenter, Presenter};
use tilt_bounce::sim::{GameEvent, GamePhase, SharedTilt, Viewport, World, tick};

/// Seconds spent on the title and game-over screens before moving on
const SCREEN_HOLD_SECS: f32 = 1.0;

/// Game instance holding all state
struct Game {
    world: World,
    tilt: SharedTilt,
    presenter: LogPresenter,
    accumulator: f32,
    /// Seconds since the current phase was entered
    phase_time: f32,
}

impl Game {
    fn new(seed: u64, tuning: Tuning, tilt: SharedTilt) -> Self {
        let mut world = World::new(seed, tuning);
        world.set_viewport(Some(Viewport::new(390.0, 844.0)));
        Self {
            world,
            tilt,
            presenter: LogPresenter::new(60),
            accumulator: 0.0,
            phase_time: 0.0,
        }
    }

    /// Run simulation ticks for `dt` seconds of wall time
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.world, &self.tilt, SIM_DT);
            self.accumulator -= SIM_DT;
            self.phase_time += SIM_DT;
            substeps += 1;

            let events = self.world.drain_events();
            self.presenter.play_events(&events);
            self.drive_phases(&events);
            self.presenter.present(&self.world.snapshot());
        }
    }

    /// Stand-in for the menu: advance phases on a timer or a fall
    fn drive_phases(&mut self, events: &[GameEvent]) {
        let fell = events
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerFell { .. }));
        let next = match self.world.phase() {
            GamePhase::Title if self.phase_time >= SCREEN_HOLD_SECS => Some(GamePhase::InGame),
            GamePhase::InGame if fell => Some(GamePhase::GameOver),
            GamePhase::GameOver if self.phase_time >= SCREEN_HOLD_SECS => Some(GamePhase::Title),
            _ => None,
        };
        if let Some(next) = next {
            match self.world.request_transition(next) {
                Ok(_) => self.phase_time = 0.0,
                Err(e) => log::warn!("{}", e),
            }
        }
    }
}

/// Publish a swaying tilt at the sensor rate until told to stop
fn spawn_sensor(tilt: SharedTilt, running: Arc<AtomicBool>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let period = Duration::from_secs_f32(1.0 / TILT_SAMPLE_HZ);
        let start = Instant::now();
        while running.load(Ordering::Relaxed) {
            let t = start.elapsed().as_secs_f32();
            tilt.publish(Vec2::new((t * 0.8).sin() * 0.25, 0.0));
            thread::sleep(period);
        }
    })
}

fn load_tuning(path: Option<&String>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    match Tuning::load(path) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::warn!("{}, using default tuning", e);
            Tuning::default()
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Tilt Bounce starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let tuning = load_tuning(args.first());
    let seed = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    let seconds: f32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(10.0);

    let tilt = SharedTilt::new();
    let running = Arc::new(AtomicBool::new(true));
    let sensor = spawn_sensor(tilt.clone(), running.clone());

    let mut game = Game::new(seed, tuning, tilt);
    log::info!("Game initialized with seed: {}", seed);

    let frame = Duration::from_secs_f32(SIM_DT);
    let start = Instant::now();
    let mut last = start;
    while start.elapsed().as_secs_f32() < seconds {
        let now = Instant::now();
        game.update((now - last).as_secs_f32());
        last = now;
        thread::sleep(frame.saturating_sub(now.elapsed()));
    }

    running.store(false, Ordering::Relaxed);
    if sensor.join().is_err() {
        log::error!("Sensor thread panicked");
    }
    log::info!(
        "Stopped after {} ticks, {} sounds, max altitude {:.0}",
        game.world.time_ticks,
        game.presenter.sounds_played,
        game.world.max_altitude
    );
}
