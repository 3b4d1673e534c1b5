use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// argsort returns the indices that would sort an array. The sort is stable, i.e. equal values
/// keep their original order. Incomparable values (NaN) are treated as equal.
pub fn argsort<T: std::cmp::PartialOrd>(x: &[T], order: SortOrder) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..x.len()).collect();
    match order {
        SortOrder::Ascending => {
            indices.sort_by(|&a, &b| x[a].partial_cmp(&x[b]).unwrap_or(Ordering::Equal))
        }
        SortOrder::Descending => {
            indices.sort_by(|&a, &b| x[b].partial_cmp(&x[a]).unwrap_or(Ordering::Equal))
        }
    }
    indices
}

/// format_race_time converts a race time in milliseconds into a readable string. Minutes are
/// only shown if the race time reaches one minute, the fractional part is truncated to
/// centiseconds, e.g. `9.87s` or `1m 05.30s`.
pub fn format_race_time(time_ms: u64) -> String {
    let minutes = time_ms / 60_000;
    let seconds = (time_ms / 1000) % 60;
    let centis = (time_ms % 1000) / 10;

    if minutes == 0 {
        format!("{}.{:02}s", seconds, centis)
    } else {
        format!("{}m {:02}.{:02}s", minutes, seconds, centis)
    }
}
