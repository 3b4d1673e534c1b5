use std::time::Duration;

/// Status of a single horse. The variants are mutually exclusive, `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorseStatus {
    Running,
    Teleporting,
    Fallen,
    Finished,
}

impl Default for HorseStatus {
    fn default() -> Self {
        HorseStatus::Running
    }
}

/// Cosmetic flash marker for the presentation layer. It carries no simulation meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Teleport,
    Fall,
    Recovered,
    Finish,
}

/// * `id` - Unique horse number (1-based), stable for the lifetime of the horse
/// * `name` - Display name
/// * `speed` - (%/tick) Sampled once at race start, 0.0 while idle
/// * `position` - (%) Position along the track between start and finish line
/// * `status` - Current status
/// * `flash` - Cosmetic flash marker
/// * `finish_time` - Race time when the horse crossed the finish line
/// * `rank` - Final rank, only set once all horses finished
#[derive(Debug, Clone, PartialEq)]
pub struct Horse {
    pub id: u32,
    pub name: String,
    pub speed: f64,
    pub position: f64,
    pub status: HorseStatus,
    pub flash: Option<Flash>,
    pub finish_time: Option<Duration>,
    pub rank: Option<u32>,
}

impl Horse {
    /// Creates an idle horse standing at the start line.
    pub fn new(id: u32, name: String, start_line: f64) -> Horse {
        Horse {
            id,
            name,
            speed: 0.0,
            position: start_line,
            status: HorseStatus::Running,
            flash: None,
            finish_time: None,
            rank: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == HorseStatus::Finished
    }
}

/// default_horse_name returns the name used if no (or an empty) custom name was configured.
pub fn default_horse_name(id: u32) -> String {
    format!("Horse {}", id)
}
