use anyhow::Context;
use clap::Parser;
use helpers::general::format_race_time;
use log::info;
use racesim::core::handle_race::handle_race;
use racesim::core::horse::HorseStatus;
use racesim::core::race::RaceSimulator;
use racesim::core::random::{RngSource, StdRngSource};
use racesim::core::tick_source::{ImmediateTicker, IntervalTicker};
use racesim::interfaces::view_interface::{RaceSignal, RaceState};
use racesim::post::race_result::RaceResult;
use racesim::pre::read_sim_pars::{read_race_pars, RacePars};
use racesim::pre::sim_opts::SimOpts;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::thread;
use std::time::{Duration, Instant};

/// (chars) Width of the text track between start and finish line
const TRACK_WIDTH: usize = 50;

fn create_race(
    race_pars: &RacePars,
    seed: Option<u64>,
) -> anyhow::Result<RaceSimulator<StdRngSource>> {
    let rng = match seed {
        Some(seed) => RngSource::from_seed(seed),
        None => RngSource::from_entropy(),
    };
    let mut race = RaceSimulator::new(race_pars.sim_consts.to_owned(), rng)?;
    race.configure(race_pars.horse_count, race_pars.names.to_owned())?;
    Ok(race)
}

/// realtime_period converts the simulated tick duration into the wall-clock period between two
/// ticks.
fn realtime_period(timestep_size: Duration, realtime_factor: f64) -> anyhow::Result<Duration> {
    if !(realtime_factor > 0.0) {
        anyhow::bail!("Real-time factor must be positive!");
    }
    Duration::try_from_secs_f64(timestep_size.as_secs_f64() / realtime_factor).with_context(|| {
        format!(
            "Tick period of {}ms at real-time factor {} is out of range!",
            timestep_size.as_millis(),
            realtime_factor
        )
    })
}

fn render_race_state(race_state: &RaceState, start_line: f64, finish_line: f64) {
    println!("--- {:>8} ---", format_race_time(race_state.cur_racetime.as_millis() as u64));
    for horse in race_state.horse_states.iter() {
        let frac = ((horse.position - start_line) / (finish_line - start_line)).clamp(0.0, 1.0);
        let filled = (frac * TRACK_WIDTH as f64).round() as usize;
        let marker = match horse.status {
            HorseStatus::Running => '>',
            HorseStatus::Teleporting => '*',
            HorseStatus::Fallen => 'x',
            HorseStatus::Finished => '|',
        };
        println!(
            "{:>12} |{}{}{}|",
            horse.name,
            "-".repeat(filled),
            marker,
            " ".repeat(TRACK_WIDTH - filled)
        );
    }
}

fn print_win_statistics(results: &[RaceResult]) {
    let mut wins: BTreeMap<(u32, String), u32> = BTreeMap::new();
    for result in results.iter() {
        if let Some(winner) = result.get_winner() {
            *wins.entry((winner.id, winner.name.to_owned())).or_insert(0) += 1;
        }
    }

    println!("RESULT: Wins after {} races", results.len());
    for ((id, name), no_wins) in wins.iter() {
        println!(
            "{:3}, {:20}, {:5}, {:5.1}%",
            id,
            name,
            no_wins,
            *no_wins as f64 / results.len() as f64 * 100.0
        );
    }
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments
    let sim_opts: SimOpts = SimOpts::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if sim_opts.debug { "debug" } else { "info" }),
    )
    .init();

    // get race parameters
    let mut race_pars = if let Some(parfile_path) = &sim_opts.parfile_path {
        info!("Reading race parameters from {:?}", parfile_path);
        read_race_pars(parfile_path)?
    } else {
        RacePars::default()
    };
    if let Some(horse_count) = sim_opts.horse_count {
        race_pars.horse_count = horse_count;
    }
    if let Some(timestep_ms) = sim_opts.timestep_size {
        if timestep_ms == 0 {
            anyhow::bail!("Tick duration must be positive!");
        }
        race_pars.timestep_ms = timestep_ms;
    }
    let timestep_size = race_pars.get_timestep_size();
    let period = realtime_period(timestep_size, sim_opts.realtime_factor)?;

    info!(
        "Simulating a race of {} horses with a tick duration of {}ms",
        race_pars.horse_count, race_pars.timestep_ms
    );

    // EXECUTION -----------------------------------------------------------------------------------
    if sim_opts.no_sim_runs > 1 {
        // BATCH CASE - independent seeded races in parallel
        let t_start = Instant::now();
        let base_seed = sim_opts.seed.unwrap_or_else(rand::random);

        let results: Vec<RaceResult> = (0..sim_opts.no_sim_runs)
            .into_par_iter()
            .map(|run| -> anyhow::Result<RaceResult> {
                let mut race = create_race(&race_pars, Some(base_seed.wrapping_add(run as u64)))?;
                handle_race(&mut race, &mut ImmediateTicker::default(), timestep_size, None)?
                    .ok_or_else(|| anyhow::anyhow!("Race {} did not finish!", run))
            })
            .collect::<anyhow::Result<Vec<RaceResult>>>()?;

        info!("Execution time: {}ms", t_start.elapsed().as_millis());
        print_win_statistics(&results);
        return Ok(());
    }

    let mut race = create_race(&race_pars, sim_opts.seed)?;

    let race_result = if sim_opts.fast {
        // FAST CASE - no waiting, no intermediate output
        handle_race(&mut race, &mut ImmediateTicker::default(), timestep_size, None)?
    } else {
        // REAL-TIME CASE - simulator thread ticks, main thread renders
        let (tx, rx) = flume::unbounded();

        let sim_thread = thread::spawn(move || {
            let mut ticker = IntervalTicker::new(period, None);
            handle_race(&mut race, &mut ticker, timestep_size, Some(&tx))
        });

        let (start_line, finish_line) = (
            race_pars.sim_consts.start_line,
            race_pars.sim_consts.finish_line,
        );
        let ticks_per_render = (1000 / race_pars.timestep_ms).max(1);
        let mut no_ticks = 0u64;

        for race_state in rx.iter() {
            match race_state.signal {
                Some(RaceSignal::Started) => info!("And they're off!"),
                Some(RaceSignal::Finished) => info!("All horses crossed the finish line!"),
                None => {}
            }
            if no_ticks % ticks_per_render == 0 || race_state.final_result.is_some() {
                render_race_state(&race_state, start_line, finish_line);
            }
            no_ticks += 1;
        }

        sim_thread
            .join()
            .map_err(|_| anyhow::anyhow!("Simulator thread panicked!"))??
    };

    // POST-PROCESSING -----------------------------------------------------------------------------
    let race_result =
        race_result.ok_or_else(|| anyhow::anyhow!("Race was stopped before the finish!"))?;
    race_result.print_results();

    if let Some(output_path) = &sim_opts.output_path {
        let path = race_result.write_results_to_file(Some(output_path))?;
        info!("Results written to {}", path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_period_scales_tick() {
        let period = realtime_period(Duration::from_millis(100), 2.0).unwrap();
        assert_eq!(period, Duration::from_millis(50));
    }

    #[test]
    fn test_realtime_period_rejects_bad_factors() {
        assert!(realtime_period(Duration::from_millis(100), 0.0).is_err());
        assert!(realtime_period(Duration::from_millis(100), -1.0).is_err());
        assert!(realtime_period(Duration::from_millis(100), f64::NAN).is_err());
    }

    #[test]
    fn test_realtime_period_out_of_range() {
        let err = realtime_period(Duration::from_millis(u64::MAX), 1e-6).unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(realtime_period(Duration::from_millis(100), f64::MIN_POSITIVE).is_err());
    }
}
