use proptest::prelude::*;
use racesim::core::horse::{Horse, HorseStatus};
use racesim::core::race::{RacePhase, RaceSimulator, SimConstants};
use racesim::core::random::{RngSource, ScriptedRolls};
use racesim::error::SimError;
use std::collections::HashMap;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);
const MAX_TICKS: usize = 100_000;

/// Runs a seeded race to the end and returns the horses after every tick.
fn run_race(seed: u64, count: u32, sim_consts: SimConstants) -> Vec<Vec<Horse>> {
    let mut race = RaceSimulator::new(sim_consts, RngSource::from_seed(seed)).unwrap();
    race.configure(count, HashMap::new()).unwrap();
    race.start();

    let mut history = vec![race.horses().to_vec()];
    for _ in 0..MAX_TICKS {
        if race.phase() != RacePhase::Racing {
            break;
        }
        race.advance(TICK).unwrap();
        history.push(race.horses().to_vec());
    }
    assert_eq!(race.phase(), RacePhase::Finished, "race did not finish");
    history
}

fn eventful_consts() -> SimConstants {
    // frequent events to exercise teleports and falls
    SimConstants {
        teleport_chance: 0.1,
        fall_chance: 0.1,
        ..SimConstants::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_positions_never_decrease(seed in any::<u64>(), count in 2u32..=10) {
        let history = run_race(seed, count, eventful_consts());
        for pair in history.windows(2) {
            for (prev, cur) in pair[0].iter().zip(pair[1].iter()) {
                prop_assert!(cur.position >= prev.position);
                prop_assert!(cur.position <= 90.0);
                prop_assert!(cur.position >= 5.0);
            }
        }
    }

    #[test]
    fn prop_finished_horses_are_frozen(seed in any::<u64>(), count in 2u32..=10) {
        let history = run_race(seed, count, eventful_consts());
        for pair in history.windows(2) {
            for (prev, cur) in pair[0].iter().zip(pair[1].iter()) {
                if prev.status == HorseStatus::Finished {
                    prop_assert_eq!(cur.status, HorseStatus::Finished);
                    prop_assert_eq!(cur.position, prev.position);
                    prop_assert_eq!(cur.finish_time, prev.finish_time);
                }
                if cur.status == HorseStatus::Finished {
                    prop_assert_eq!(cur.position, 90.0);
                }
            }
        }
    }

    #[test]
    fn prop_ranks_follow_finish_times(seed in any::<u64>(), count in 2u32..=10) {
        let history = run_race(seed, count, SimConstants::default());

        // no ranks before the last tick
        for horses in history[..history.len() - 1].iter() {
            prop_assert!(horses.iter().all(|h| h.rank.is_none()));
        }

        let last = history.last().unwrap();
        let mut ranks: Vec<u32> = last.iter().map(|h| h.rank.unwrap()).collect();
        ranks.sort_unstable();
        prop_assert_eq!(ranks, (1..=count).collect::<Vec<u32>>());

        let mut by_rank: Vec<&Horse> = last.iter().collect();
        by_rank.sort_by_key(|h| h.rank);
        for pair in by_rank.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            prop_assert!(a.finish_time <= b.finish_time);
            if a.finish_time == b.finish_time {
                prop_assert!(a.id < b.id);
            }
        }
    }

    #[test]
    fn prop_speeds_are_sampled_in_range(seed in any::<u64>(), count in 2u32..=10) {
        let mut race = RaceSimulator::new(SimConstants::default(), RngSource::from_seed(seed)).unwrap();
        race.configure(count, HashMap::new()).unwrap();
        let not_started = matches!(race.advance(TICK), Err(SimError::InvalidState { .. }));
        prop_assert!(not_started);

        race.start();
        prop_assert_eq!(race.horses().len(), count as usize);
        for horse in race.horses() {
            prop_assert!(horse.speed >= 1.0 && horse.speed < 3.0);
        }
    }
}

#[test]
fn three_equal_horses_tie_and_rank_by_id() {
    let mut race =
        RaceSimulator::new(SimConstants::default(), ScriptedRolls::uneventful(2.0)).unwrap();
    race.configure(3, HashMap::new()).unwrap();
    race.start();

    let mut ticks = 0;
    while race.phase() == RacePhase::Racing {
        race.advance(TICK).unwrap();
        ticks += 1;
    }

    assert_eq!(ticks, 43);
    let ranks: Vec<u32> = race.horses().iter().map(|h| h.rank.unwrap()).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn reset_mid_race_clears_everything() {
    let mut race = RaceSimulator::new(SimConstants::default(), RngSource::from_seed(11)).unwrap();
    race.configure(8, HashMap::new()).unwrap();
    race.start();
    for _ in 0..20 {
        race.advance(TICK).unwrap();
    }

    race.reset();
    assert_eq!(race.phase(), RacePhase::Idle);
    assert!(race.horses().iter().all(|h| h.position == 5.0
        && h.status == HorseStatus::Running
        && h.rank.is_none()
        && h.finish_time.is_none()));

    // a fresh race can be started right away
    race.start();
    assert_eq!(race.phase(), RacePhase::Racing);
}
