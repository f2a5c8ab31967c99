//! Lobby-to-running countdown

use log::info;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Running { remaining: u32 },
    Done,
}

/// Counts down once per `tick_interval` after `start`. A countdown runs at
/// most once per session: `start` is ignored unless the countdown is idle.
pub struct Countdown {
    state: CountdownState,
    tick_interval: Duration,
    next_tick: Option<Instant>,
}

impl Countdown {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            state: CountdownState::Idle,
            tick_interval,
            next_tick: None,
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn remaining(&self) -> Option<u32> {
        match self.state {
            CountdownState::Running { remaining } => Some(remaining),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == CountdownState::Done
    }

    /// Returns false when a countdown already ran or is running.
    pub fn start(&mut self, initial: u32, now: Instant) -> bool {
        if self.state != CountdownState::Idle {
            return false;
        }

        info!("Starting in {} seconds", initial);
        if initial == 0 {
            self.finish();
        } else {
            self.state = CountdownState::Running { remaining: initial };
            self.next_tick = Some(now + self.tick_interval);
        }
        true
    }

    /// Advances by one interval. Returns true when this tick completed the countdown.
    pub fn tick(&mut self) -> bool {
        let CountdownState::Running { remaining } = self.state else {
            return false;
        };

        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            self.finish();
            return true;
        }

        info!("Starting in {} seconds", remaining);
        self.state = CountdownState::Running { remaining };
        self.next_tick = self.next_tick.map(|at| at + self.tick_interval);
        false
    }

    /// Fires every tick that is due at `now`. Returns true if the countdown
    /// completed during this call.
    pub fn poll(&mut self, now: Instant) -> bool {
        while let Some(at) = self.next_tick {
            if now < at {
                break;
            }
            if self.tick() {
                return true;
            }
        }
        false
    }

    fn finish(&mut self) {
        info!("START");
        self.state = CountdownState::Done;
        self.next_tick = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countdown() -> Countdown {
        Countdown::new(Duration::from_millis(1000))
    }

    #[test]
    fn test_countdown_completes_on_third_tick() {
        let mut countdown = countdown();
        assert!(countdown.start(3, Instant::now()));

        assert!(!countdown.tick());
        assert_eq!(countdown.remaining(), Some(2));
        assert!(!countdown.tick());
        assert_eq!(countdown.remaining(), Some(1));
        assert!(countdown.tick());
        assert!(countdown.is_done());
    }

    #[test]
    fn test_second_start_is_rejected() {
        let mut countdown = countdown();
        let now = Instant::now();
        assert!(countdown.start(3, now));
        countdown.tick();

        assert!(!countdown.start(3, now));
        assert_eq!(countdown.remaining(), Some(2));
    }

    #[test]
    fn test_start_after_done_is_rejected() {
        let mut countdown = countdown();
        countdown.start(1, Instant::now());
        assert!(countdown.tick());

        assert!(!countdown.start(3, Instant::now()));
        assert!(countdown.is_done());
    }

    #[test]
    fn test_zero_start_finishes_immediately() {
        let mut countdown = countdown();
        assert!(countdown.start(0, Instant::now()));
        assert!(countdown.is_done());
    }

    #[test]
    fn test_tick_when_idle_does_nothing() {
        let mut countdown = countdown();
        assert!(!countdown.tick());
        assert_eq!(countdown.state(), CountdownState::Idle);
    }

    #[test]
    fn test_poll_fires_only_when_due() {
        let mut countdown = countdown();
        let start = Instant::now();
        countdown.start(3, start);

        assert!(!countdown.poll(start + Duration::from_millis(999)));
        assert_eq!(countdown.remaining(), Some(3));

        assert!(!countdown.poll(start + Duration::from_millis(1000)));
        assert_eq!(countdown.remaining(), Some(2));

        assert!(!countdown.poll(start + Duration::from_millis(2999)));
        assert_eq!(countdown.remaining(), Some(1));

        assert!(countdown.poll(start + Duration::from_millis(3000)));
        assert!(countdown.is_done());
        assert!(!countdown.poll(start + Duration::from_millis(9000)));
    }

    #[test]
    fn test_poll_catches_up_missed_ticks() {
        let mut countdown = countdown();
        let start = Instant::now();
        countdown.start(3, start);

        assert!(countdown.poll(start + Duration::from_secs(10)));
        assert!(countdown.is_done());
    }
}
