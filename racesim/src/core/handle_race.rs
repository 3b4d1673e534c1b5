use crate::core::race::{RacePhase, RaceSimulator};
use crate::core::random::RandomSource;
use crate::core::tick_source::{RaceCommand, TickControl, TickSource};
use crate::interfaces::view_interface::RaceState;
use crate::post::race_result::RaceResult;
use anyhow::Context;
use flume::Sender;
use log::{debug, info};
use std::time::Duration;

/// handle_race starts the race (if not yet running) and drives it with the given tick source
/// until all horses finished. Every snapshot is sent to the presentation layer if a sender was
/// inserted. Returns the result for post-processing, or None if the race was stopped or reset
/// by a command.
pub fn handle_race<R: RandomSource, T: TickSource>(
    race: &mut RaceSimulator<R>,
    ticker: &mut T,
    timestep_size: Duration,
    tx: Option<&Sender<RaceState>>,
) -> anyhow::Result<Option<RaceResult>> {
    if let Some(signal) = race.start() {
        let mut race_state = race.snapshot();
        race_state.signal = Some(signal);
        send_race_state(tx, race_state)?;
    }

    let mut t_race_update_print = Duration::ZERO;

    while race.phase() == RacePhase::Racing {
        match ticker.next_tick() {
            TickControl::Command(RaceCommand::Stop) => {
                info!("Race stopped after {:.1}s", race.cur_racetime().as_secs_f64());
                return Ok(None);
            }
            TickControl::Command(RaceCommand::Reset) => {
                race.reset();
                send_race_state(tx, race.snapshot())?;
                return Ok(None);
            }
            TickControl::Tick => {}
        }

        let outcome = race.advance(timestep_size)?;

        if race.cur_racetime() >= t_race_update_print + Duration::from_secs(1) {
            debug!(
                "Simulating... Current race time is {:.1}s, {} of {} horses finished",
                race.cur_racetime().as_secs_f64(),
                outcome.race_state.get_no_finished(),
                outcome.race_state.horse_states.len()
            );
            t_race_update_print = race.cur_racetime();
        }

        send_race_state(tx, outcome.race_state)?;
    }

    Ok(race.race_result())
}

fn send_race_state(tx: Option<&Sender<RaceState>>, race_state: RaceState) -> anyhow::Result<()> {
    if let Some(tx) = tx {
        tx.send(race_state)
            .context("Failed to send race state to the presentation layer!")?;
    }
    Ok(())
}
