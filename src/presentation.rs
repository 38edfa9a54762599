//! Presentation seam
//!
//! The simulation never draws or plays anything itself. After each tick the
//! host hands a [`FrameSnapshot`] and the tick's sound cues to a [`Presenter`].

use crate::sim::{FrameSnapshot, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player launched upward
    Jump,
    /// Player touched a platform
    Land,
    /// Player dropped out of view
    Fall,
}

impl SoundEffect {
    /// Sound cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jump => Some(SoundEffect::Jump),
            GameEvent::Land { .. } => Some(SoundEffect::Land),
            GameEvent::PlayerFell { .. } => Some(SoundEffect::Fall),
            _ => None,
        }
    }
}

/// Renderer and sound player consuming simulation output
pub trait Presenter {
    /// Draw one frame
    fn present(&mut self, snapshot: &FrameSnapshot);

    /// Fire-and-forget sound trigger
    fn play(&mut self, effect: SoundEffect);

    /// Forward every cue carried by `events`
    fn play_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }
}

/// Headless presenter that reports through the log
#[derive(Debug, Default)]
pub struct LogPresenter {
    /// Log a JSON snapshot every this many ticks (0 disables)
    pub snapshot_every: u64,
    pub sounds_played: usize,
}

impl LogPresenter {
    pub fn new(snapshot_every: u64) -> Self {
        Self {
            snapshot_every,
            sounds_played: 0,
        }
    }
}

impl Presenter for LogPresenter {
    fn present(&mut self, snapshot: &FrameSnapshot) {
        if self.snapshot_every == 0 || snapshot.tick % self.snapshot_every != 0 {
            return;
        }
        match serde_json::to_string(snapshot) {
            Ok(json) => log::debug!("frame {}", json),
            Err(e) => log::warn!("Failed to encode snapshot: {}", e),
        }
        log::info!(
            "[{}] tick {} camera y {:.0} altitude {:.0}, {} platforms",
            snapshot.phase.as_str(),
            snapshot.tick,
            snapshot.camera.y,
            snapshot.max_altitude,
            snapshot.platforms.len()
        );
    }

    fn play(&mut self, effect: SoundEffect) {
        self.sounds_played += 1;
        log::debug!("sound {:?}", effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    #[derive(Default)]
    struct Recorder {
        played: Vec<SoundEffect>,
    }

    impl Presenter for Recorder {
        fn present(&mut self, _snapshot: &FrameSnapshot) {}

        fn play(&mut self, effect: SoundEffect) {
            self.played.push(effect);
        }
    }

    #[test]
    fn test_only_cue_events_play() {
        let events = [
            GameEvent::Land { platform: 4 },
            GameEvent::Jump,
            GameEvent::PlatformsSpawned {
                count: 3,
                frontier: 800.0,
            },
            GameEvent::PhaseChanged {
                from: GamePhase::Title,
                to: GamePhase::InGame,
            },
        ];
        let mut recorder = Recorder::default();
        recorder.play_events(&events);
        assert_eq!(recorder.played, vec![SoundEffect::Land, SoundEffect::Jump]);
    }

    #[test]
    fn test_log_presenter_counts_sounds() {
        let mut presenter = LogPresenter::new(0);
        presenter.play_events(&[GameEvent::Jump, GameEvent::PlayerFell { altitude: 10.0 }]);
        assert_eq!(presenter.sounds_played, 2);
    }
}
