use helpers::general::format_race_time;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// RankedHorse is one line of the final ranking board.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedHorse {
    pub rank: u32,
    pub id: u32,
    pub name: String,
    pub finish_time: Duration,
}

/// RaceResult contains all race information that is required for post-processing the results.
/// The ranking is sorted by rank.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceResult {
    pub ranking: Vec<RankedHorse>,
    pub tot_racetime: Duration,
    pub wall_time: Duration,
}

#[derive(Debug, Serialize)]
struct ResultRecord<'a> {
    rank: u32,
    id: u32,
    name: &'a str,
    finish_time_ms: u64,
    finish_time: String,
}

impl RaceResult {
    pub fn get_winner(&self) -> Option<&RankedHorse> {
        self.ranking.first()
    }

    /// write_results_to_file writes the ranking board as CSV to the given path, or to
    /// output/last_run.csv if no path is given. Returns the path of the written file.
    pub fn write_results_to_file(&self, path: Option<&Path>) -> anyhow::Result<String> {
        let out_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let out_dir = Path::new("output");
                std::fs::create_dir_all(out_dir)?;
                out_dir.join("last_run.csv")
            }
        };

        let mut wtr = csv::Writer::from_path(&out_path)?;
        for ranked in self.ranking.iter() {
            let finish_time_ms = ranked.finish_time.as_millis() as u64;
            wtr.serialize(ResultRecord {
                rank: ranked.rank,
                id: ranked.id,
                name: &ranked.name,
                finish_time_ms,
                finish_time: format_race_time(finish_time_ms),
            })?;
        }
        wtr.flush()?;

        Ok(out_path.to_string_lossy().into_owned())
    }

    /// print_results prints the ranking board to the console output.
    pub fn print_results(&self) {
        println!("RESULT: Ranking");
        println!("rank,  id, {:20}, finish time", "name");
        for ranked in self.ranking.iter() {
            println!(
                "{:4}, {:3}, {:20}, {:>11}",
                ranked.rank,
                ranked.id,
                ranked.name,
                format_race_time(ranked.finish_time.as_millis() as u64)
            );
        }
        println!(
            "RESULT: Race time {} (wall-clock {})",
            format_race_time(self.tot_racetime.as_millis() as u64),
            format_race_time(self.wall_time.as_millis() as u64)
        );
    }
}
