use crate::core::horse::{Flash, Horse, HorseStatus};
use crate::core::race::RacePhase;
use crate::post::race_result::RaceResult;
use std::time::Duration;

/// (px) Upper bound of the screen shake intensity
pub const MAX_SHAKE_INTENSITY: f64 = 5.0;

/// (px/tick) Maximum change of the shake intensity per tick
pub const SHAKE_STEP: f64 = 0.2;

/// HorseState is the read-only view of a horse that is handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HorseState {
    pub id: u32,
    pub name: String,
    pub position: f64,
    pub status: HorseStatus,
    pub flash: Option<Flash>,
    pub rank: Option<u32>,
    pub finish_time: Option<Duration>,
}

impl From<&Horse> for HorseState {
    fn from(horse: &Horse) -> Self {
        HorseState {
            id: horse.id,
            name: horse.name.to_owned(),
            position: horse.position,
            status: horse.status,
            flash: horse.flash,
            rank: horse.rank,
            finish_time: horse.finish_time,
        }
    }
}

/// Signals for sound playback and similar one-shot effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceSignal {
    Started,
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct RaceState {
    pub phase: RacePhase,
    pub horse_states: Vec<HorseState>,
    pub cur_racetime: Duration,
    pub shake_intensity: f64,

    // one-shot signal attached to the snapshot it belongs to
    pub signal: Option<RaceSignal>,

    // final results payload (sent once when race finishes)
    pub final_result: Option<RaceResult>,
}

impl RaceState {
    /// Returns the horses ordered by rank. Unranked horses keep their order behind the ranked
    /// ones.
    pub fn sorted_by_rank(&self) -> Vec<&HorseState> {
        let mut sorted: Vec<&HorseState> = self.horse_states.iter().collect();
        sorted.sort_by_key(|h| h.rank.unwrap_or(u32::MAX));
        sorted
    }

    pub fn get_no_finished(&self) -> usize {
        self.horse_states
            .iter()
            .filter(|h| h.status == HorseStatus::Finished)
            .count()
    }
}

/// target_shake_intensity calculates the shake intensity caused by the current special events:
/// teleporting horses count 2, fallen horses count 3, the sum is halved and capped.
pub fn target_shake_intensity(horses: &[Horse]) -> f64 {
    let no_teleports = horses
        .iter()
        .filter(|h| h.status == HorseStatus::Teleporting)
        .count();
    let no_falls = horses
        .iter()
        .filter(|h| h.status == HorseStatus::Fallen)
        .count();

    ((no_teleports * 2 + no_falls * 3) as f64 / 2.0).min(MAX_SHAKE_INTENSITY)
}

/// ease_shake_intensity moves the shake intensity one step towards the target.
pub fn ease_shake_intensity(cur: f64, target: f64) -> f64 {
    if (cur - target).abs() < SHAKE_STEP {
        target
    } else if target > cur {
        cur + SHAKE_STEP
    } else {
        cur - SHAKE_STEP
    }
}
