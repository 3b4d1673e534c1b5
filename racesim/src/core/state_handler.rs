use crate::core::horse::{Flash, Horse, HorseStatus};
use crate::core::race::SimConstants;
use std::time::Duration;

/// Probability rolls drawn for one horse in one tick, each in [0, 1).
///
/// * `teleport` - Starts a teleport (running) or completes it (teleporting)
/// * `fall` - Starts a fall (running) or recovers from it (fallen)
#[derive(Debug, Clone, Copy)]
pub struct TickRolls {
    pub teleport: f64,
    pub fall: f64,
}

/// Transition a horse went through within a tick. Normal movement is not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorseEvent {
    TeleportStarted,
    TeleportCompleted,
    Fell,
    Recovered,
    Finished,
}

/// next_horse_state calculates the state of a horse after one tick. The function is pure: it
/// only depends on the current state, the rolls, the constants and the current race time. At
/// most one transition happens per tick.
pub fn next_horse_state(
    horse: &Horse,
    rolls: TickRolls,
    consts: &SimConstants,
    cur_racetime: Duration,
) -> (Horse, Option<HorseEvent>) {
    let mut next = horse.clone();

    match horse.status {
        HorseStatus::Finished => {
            next.flash = None;
            (next, None)
        }

        HorseStatus::Fallen => {
            if rolls.fall < consts.recover_chance {
                next.status = HorseStatus::Running;
                next.flash = Some(Flash::Recovered);
                (next, Some(HorseEvent::Recovered))
            } else {
                next.flash = toggle_flash(horse.flash, Flash::Fall);
                (next, None)
            }
        }

        HorseStatus::Teleporting => {
            if rolls.teleport < consts.teleport_complete_chance {
                next.position = (horse.position + consts.teleport_distance).min(consts.finish_line);
                next.status = HorseStatus::Running;
                next.flash = None;
                (next, Some(HorseEvent::TeleportCompleted))
            } else {
                next.flash = toggle_flash(horse.flash, Flash::Teleport);
                (next, None)
            }
        }

        HorseStatus::Running => {
            let new_position = horse.position + horse.speed;

            if new_position >= consts.finish_line {
                next.position = consts.finish_line;
                next.status = HorseStatus::Finished;
                next.finish_time = Some(cur_racetime);
                next.flash = Some(Flash::Finish);
                (next, Some(HorseEvent::Finished))
            } else if new_position < consts.finish_line - consts.teleport_distance
                && rolls.teleport < consts.teleport_chance
            {
                // position is kept until the teleport completes
                next.status = HorseStatus::Teleporting;
                next.flash = Some(Flash::Teleport);
                (next, Some(HorseEvent::TeleportStarted))
            } else if new_position < consts.finish_line - consts.fall_margin
                && rolls.fall < consts.fall_chance
            {
                next.status = HorseStatus::Fallen;
                next.flash = Some(Flash::Fall);
                (next, Some(HorseEvent::Fell))
            } else {
                next.position = new_position;
                next.flash = None;
                (next, None)
            }
        }
    }
}

fn toggle_flash(cur: Option<Flash>, on: Flash) -> Option<Flash> {
    match cur {
        Some(_) => None,
        None => Some(on),
    }
}
