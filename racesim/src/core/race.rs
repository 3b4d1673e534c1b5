use crate::core::horse::{default_horse_name, Horse};
use crate::core::random::RandomSource;
use crate::core::state_handler::{next_horse_state, HorseEvent, TickRolls};
use crate::error::SimError;
use crate::interfaces::view_interface::{
    ease_shake_intensity, target_shake_intensity, HorseState, RaceSignal, RaceState,
};
use crate::post::race_result::{RaceResult, RankedHorse};
use helpers::general::{argsort, SortOrder};
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const MIN_HORSE_COUNT: u32 = 2;
pub const MAX_HORSE_COUNT: u32 = 10;
pub const DEFAULT_HORSE_COUNT: u32 = 6;

/// * `start_line` - (%) Start line position
/// * `finish_line` - (%) Finish line position
/// * `teleport_distance` - (%) Distance a horse jumps forward when a teleport completes
/// * `fall_margin` - (%) Horses closer than this to the finish line cannot fall
/// * `teleport_chance` - Probability per tick that a running horse starts teleporting
/// * `fall_chance` - Probability per tick that a running horse falls
/// * `teleport_complete_chance` - Probability per tick that a teleport completes
/// * `recover_chance` - Probability per tick that a fallen horse gets up again
/// * `speed_min` - (%/tick) Lower bound of the sampled horse speed (inclusive)
/// * `speed_max` - (%/tick) Upper bound of the sampled horse speed (exclusive)
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimConstants {
    pub start_line: f64,
    pub finish_line: f64,
    pub teleport_distance: f64,
    pub fall_margin: f64,
    pub teleport_chance: f64,
    pub fall_chance: f64,
    pub teleport_complete_chance: f64,
    pub recover_chance: f64,
    pub speed_min: f64,
    pub speed_max: f64,
}

impl Default for SimConstants {
    fn default() -> Self {
        SimConstants {
            start_line: 5.0,
            finish_line: 90.0,
            teleport_distance: 15.0,
            fall_margin: 10.0,
            teleport_chance: 0.005,
            fall_chance: 0.003,
            teleport_complete_chance: 0.2,
            recover_chance: 0.05,
            speed_min: 1.0,
            speed_max: 3.0,
        }
    }
}

impl SimConstants {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.start_line < self.finish_line) {
            return Err(SimError::InvalidConfig(format!(
                "start line ({}) must lie before finish line ({})",
                self.start_line, self.finish_line
            )));
        }
        if !(self.teleport_distance >= 0.0 && self.fall_margin >= 0.0) {
            return Err(SimError::InvalidConfig(
                "teleport distance and fall margin must not be negative".to_owned(),
            ));
        }
        let chances = [
            ("teleport_chance", self.teleport_chance),
            ("fall_chance", self.fall_chance),
            ("teleport_complete_chance", self.teleport_complete_chance),
            ("recover_chance", self.recover_chance),
        ];
        for (name, chance) in chances.iter() {
            if !(0.0..=1.0).contains(chance) {
                return Err(SimError::InvalidConfig(format!(
                    "{} must be in [0, 1], got {}",
                    name, chance
                )));
            }
        }
        if !(self.speed_min > 0.0 && self.speed_min < self.speed_max) {
            return Err(SimError::InvalidConfig(format!(
                "speed range [{}, {}) is invalid",
                self.speed_min, self.speed_max
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacePhase {
    Idle,
    Racing,
    Finished,
}

impl Default for RacePhase {
    fn default() -> Self {
        RacePhase::Idle
    }
}

/// Result of a single tick.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub race_state: RaceState,
    /// true only on the tick on which the last horse finished
    pub just_finished: bool,
}

/// RaceSimulator owns all horses of a race and advances them tick by tick. The random source is
/// injected, see `RngSource` and `ScriptedRolls`.
#[derive(Debug)]
pub struct RaceSimulator<R: RandomSource> {
    sim_consts: SimConstants,
    rng: R,
    names: HashMap<u32, String>,
    horses: Vec<Horse>,
    phase: RacePhase,
    started_at: Option<Instant>,
    cur_racetime: Duration,
    wall_time: Duration,
    shake_intensity: f64,
}

impl<R: RandomSource> RaceSimulator<R> {
    /// Creates an idle race with the default number of horses.
    pub fn new(sim_consts: SimConstants, rng: R) -> Result<RaceSimulator<R>, SimError> {
        sim_consts.validate()?;

        let mut race = RaceSimulator {
            sim_consts,
            rng,
            names: HashMap::new(),
            horses: Vec::new(),
            phase: RacePhase::Idle,
            started_at: None,
            cur_racetime: Duration::ZERO,
            wall_time: Duration::ZERO,
            shake_intensity: 0.0,
        };
        race.init_horses(DEFAULT_HORSE_COUNT);

        Ok(race)
    }

    // ---------------------------------------------------------------------------------------------
    // LIFECYCLE -----------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// configure sets the number of horses and their custom names (keyed by horse id). Names of
    /// ids above the horse count are dropped, empty names fall back to the default name.
    pub fn configure(&mut self, count: u32, names: HashMap<u32, String>) -> Result<(), SimError> {
        if self.phase == RacePhase::Racing {
            return Err(SimError::InvalidConfig(
                "horses cannot be configured while racing".to_owned(),
            ));
        }
        if !(MIN_HORSE_COUNT..=MAX_HORSE_COUNT).contains(&count) {
            return Err(SimError::InvalidConfig(format!(
                "horse count must be in [{}, {}], got {}",
                MIN_HORSE_COUNT, MAX_HORSE_COUNT, count
            )));
        }

        self.names = names
            .into_iter()
            .filter(|(id, name)| *id >= 1 && *id <= count && !name.trim().is_empty())
            .collect();
        self.init_horses(count);
        self.clear_race();

        debug!("Configured race with {} horses", count);
        Ok(())
    }

    /// set_horse_count changes the number of horses and keeps the custom names that still
    /// belong to a horse.
    pub fn set_horse_count(&mut self, count: u32) -> Result<(), SimError> {
        let names = self.names.clone();
        self.configure(count, names)
    }

    /// start samples the horse speeds and starts the race. It returns the start signal, or None
    /// if the race was already running. A finished race is reset first.
    pub fn start(&mut self) -> Option<RaceSignal> {
        match self.phase {
            RacePhase::Racing => return None,
            RacePhase::Finished => self.reset(),
            RacePhase::Idle => {}
        }

        for horse in self.horses.iter_mut() {
            horse.speed = self
                .rng
                .sample_speed(self.sim_consts.speed_min, self.sim_consts.speed_max);
        }

        self.started_at = Some(Instant::now());
        self.cur_racetime = Duration::ZERO;
        self.phase = RacePhase::Racing;

        info!("Race started with {} horses", self.horses.len());
        Some(RaceSignal::Started)
    }

    /// reset puts all horses back to the start line and clears the race. Allowed in any phase.
    pub fn reset(&mut self) {
        let count = self.horses.len() as u32;
        self.init_horses(count);
        self.clear_race();
        debug!("Race reset");
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHOD ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// advance simulates one tick of the given duration and returns the resulting snapshot.
    pub fn advance(&mut self, timestep_size: Duration) -> Result<TickOutcome, SimError> {
        if self.phase != RacePhase::Racing {
            return Err(SimError::InvalidState {
                operation: "advance",
                phase: self.phase,
            });
        }

        // increment race clock
        self.cur_racetime += timestep_size;

        // update horses
        for idx in 0..self.horses.len() {
            if self.horses[idx].is_finished() {
                self.horses[idx].flash = None;
                continue;
            }

            let rolls = TickRolls {
                teleport: self.rng.roll(),
                fall: self.rng.roll(),
            };
            let (next, event) =
                next_horse_state(&self.horses[idx], rolls, &self.sim_consts, self.cur_racetime);
            if let Some(event) = event {
                self.log_event(&next, event);
            }
            self.horses[idx] = next;
        }

        // shake intensity follows the horses updated in this tick
        self.shake_intensity = ease_shake_intensity(
            self.shake_intensity,
            target_shake_intensity(&self.horses),
        );

        // handle race finish
        let just_finished = self.get_all_finished();
        if just_finished {
            self.rank_horses();
            self.phase = RacePhase::Finished;
            self.shake_intensity = 0.0;
            self.wall_time = self.started_at.map(|t| t.elapsed()).unwrap_or_default();
            info!(
                "Race finished after {:.1}s of race time",
                self.cur_racetime.as_secs_f64()
            );
        }

        let mut race_state = self.snapshot();
        if just_finished {
            race_state.signal = Some(RaceSignal::Finished);
            race_state.final_result = self.race_result();
        }

        Ok(TickOutcome {
            race_state,
            just_finished,
        })
    }

    // ---------------------------------------------------------------------------------------------
    // RACE SIMULATOR PARTS ------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    fn init_horses(&mut self, count: u32) {
        let start_line = self.sim_consts.start_line;
        let names = &self.names;

        self.horses = (1..=count)
            .map(|id| {
                let name = names
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| default_horse_name(id));
                Horse::new(id, name, start_line)
            })
            .collect();
    }

    fn clear_race(&mut self) {
        self.phase = RacePhase::Idle;
        self.started_at = None;
        self.cur_racetime = Duration::ZERO;
        self.wall_time = Duration::ZERO;
        self.shake_intensity = 0.0;
    }

    /// Assigns ranks by ascending finish time. Ties keep the horse order, i.e. the lower id wins.
    fn rank_horses(&mut self) {
        let finish_times: Vec<Duration> = self
            .horses
            .iter()
            .map(|h| h.finish_time.unwrap_or(Duration::MAX))
            .collect();

        for (pos, &idx) in argsort(&finish_times, SortOrder::Ascending)
            .iter()
            .enumerate()
        {
            self.horses[idx].rank = Some(pos as u32 + 1);
            self.horses[idx].flash = None;
        }
    }

    fn log_event(&self, horse: &Horse, event: HorseEvent) {
        match event {
            HorseEvent::Finished => info!(
                "{} (#{}) crossed the finish line after {:.1}s",
                horse.name,
                horse.id,
                self.cur_racetime.as_secs_f64()
            ),
            HorseEvent::TeleportStarted => debug!("{} (#{}) teleports", horse.name, horse.id),
            HorseEvent::TeleportCompleted => debug!(
                "{} (#{}) reappears at {:.1}%",
                horse.name, horse.id, horse.position
            ),
            HorseEvent::Fell => debug!(
                "{} (#{}) fell at {:.1}%",
                horse.name, horse.id, horse.position
            ),
            HorseEvent::Recovered => debug!("{} (#{}) is back on its feet", horse.name, horse.id),
        }
    }

    // ---------------------------------------------------------------------------------------------
    // METHODS (HELPERS) ---------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn horses(&self) -> &[Horse] {
        &self.horses
    }

    pub fn sim_consts(&self) -> &SimConstants {
        &self.sim_consts
    }

    pub fn cur_racetime(&self) -> Duration {
        self.cur_racetime
    }

    pub fn shake_intensity(&self) -> f64 {
        self.shake_intensity
    }

    pub fn get_all_finished(&self) -> bool {
        self.horses.iter().all(|h| h.is_finished())
    }

    pub fn snapshot(&self) -> RaceState {
        RaceState {
            phase: self.phase,
            horse_states: self.horses.iter().map(HorseState::from).collect(),
            cur_racetime: self.cur_racetime,
            shake_intensity: self.shake_intensity,
            signal: None,
            final_result: None,
        }
    }

    /// Returns the final ranking, only available once the race is finished.
    pub fn race_result(&self) -> Option<RaceResult> {
        if self.phase != RacePhase::Finished {
            return None;
        }

        let mut ranking: Vec<RankedHorse> = self
            .horses
            .iter()
            .map(|h| RankedHorse {
                rank: h.rank.unwrap_or(u32::MAX),
                id: h.id,
                name: h.name.to_owned(),
                finish_time: h.finish_time.unwrap_or(self.cur_racetime),
            })
            .collect();
        ranking.sort_by_key(|r| r.rank);

        Some(RaceResult {
            ranking,
            tot_racetime: self.cur_racetime,
            wall_time: self.wall_time,
        })
    }
}
