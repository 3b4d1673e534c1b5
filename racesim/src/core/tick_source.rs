use flume::{Receiver, RecvTimeoutError, TryRecvError};
use log::warn;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// Commands the presentation layer can send to a running race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceCommand {
    /// Stop ticking and leave the race as it is (e.g. the view is unmounted)
    Stop,
    /// Stop ticking and reset the race
    Reset,
}

/// What the driver has to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Tick,
    Command(RaceCommand),
}

/// TickSource decides when the next tick happens. Pending commands take precedence over ticks,
/// so no tick is issued after a command was received.
pub trait TickSource {
    fn next_tick(&mut self) -> TickControl;
}

/// IntervalTicker issues ticks in real-time at a fixed period.
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    next_due: Option<Instant>,
    commands: Option<Receiver<RaceCommand>>,
}

impl IntervalTicker {
    pub fn new(period: Duration, commands: Option<Receiver<RaceCommand>>) -> IntervalTicker {
        IntervalTicker {
            period,
            next_due: None,
            commands,
        }
    }
}

impl TickSource for IntervalTicker {
    fn next_tick(&mut self) -> TickControl {
        let deadline = self
            .next_due
            .unwrap_or_else(|| Instant::now() + self.period);

        // wait for the deadline, a command ends the wait early
        let mut disconnected = false;
        match &self.commands {
            Some(rx) => match rx.recv_deadline(deadline) {
                Ok(cmd) => return TickControl::Command(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => disconnected = true,
            },
            None => {
                let now = Instant::now();
                if deadline > now {
                    sleep(deadline - now);
                }
            }
        }
        if disconnected {
            // nobody can send commands anymore, keep ticking without them
            self.commands = None;
            let now = Instant::now();
            if deadline > now {
                sleep(deadline - now);
            }
        }

        let now = Instant::now();
        let next_due = deadline + self.period;
        if next_due <= now {
            warn!("Could not keep up with real-time!");
            self.next_due = Some(now + self.period);
        } else {
            self.next_due = Some(next_due);
        }

        TickControl::Tick
    }
}

/// ImmediateTicker issues ticks without waiting, used for fast simulation and tests.
#[derive(Debug, Default)]
pub struct ImmediateTicker {
    commands: Option<Receiver<RaceCommand>>,
}

impl ImmediateTicker {
    pub fn new(commands: Option<Receiver<RaceCommand>>) -> ImmediateTicker {
        ImmediateTicker { commands }
    }
}

impl TickSource for ImmediateTicker {
    fn next_tick(&mut self) -> TickControl {
        if let Some(rx) = &self.commands {
            match rx.try_recv() {
                Ok(cmd) => return TickControl::Command(cmd),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
            }
        }
        TickControl::Tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_ticker_without_commands() {
        let mut ticker = ImmediateTicker::default();
        for _ in 0..5 {
            assert_eq!(ticker.next_tick(), TickControl::Tick);
        }
    }

    #[test]
    fn test_immediate_ticker_command_first() {
        let (tx, rx) = flume::unbounded();
        let mut ticker = ImmediateTicker::new(Some(rx));
        assert_eq!(ticker.next_tick(), TickControl::Tick);
        tx.send(RaceCommand::Stop).unwrap();
        assert_eq!(ticker.next_tick(), TickControl::Command(RaceCommand::Stop));
        assert_eq!(ticker.next_tick(), TickControl::Tick);
    }

    #[test]
    fn test_interval_ticker_waits_for_period() {
        let mut ticker = IntervalTicker::new(Duration::from_millis(20), None);
        let t_start = Instant::now();
        assert_eq!(ticker.next_tick(), TickControl::Tick);
        assert_eq!(ticker.next_tick(), TickControl::Tick);
        assert!(t_start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_interval_ticker_command_interrupts_wait() {
        let (tx, rx) = flume::unbounded();
        let mut ticker = IntervalTicker::new(Duration::from_secs(60), Some(rx));
        tx.send(RaceCommand::Reset).unwrap();
        let t_start = Instant::now();
        assert_eq!(ticker.next_tick(), TickControl::Command(RaceCommand::Reset));
        assert!(t_start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_interval_ticker_survives_dropped_sender() {
        let (tx, rx) = flume::unbounded::<RaceCommand>();
        drop(tx);
        let mut ticker = IntervalTicker::new(Duration::from_millis(5), Some(rx));
        assert_eq!(ticker.next_tick(), TickControl::Tick);
        assert_eq!(ticker.next_tick(), TickControl::Tick);
    }
}
