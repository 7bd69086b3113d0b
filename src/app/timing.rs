use std::time::{Duration, Instant};

/// Fixed-cadence timer for transform sampling. Only runs while something
/// is selected; `poll` reports whether a sample is due.
#[derive(Debug)]
pub struct SampleClock {
    interval: Duration,
    next_due: Option<Instant>,
    samples: u64,
}

impl SampleClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            samples: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Arm the timer. The first sample is due immediately.
    pub fn start(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now);
        }
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// True when a sample is due at `now`. Late polls do not queue up
    /// extra samples; the next one is scheduled from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        self.samples = self.samples.saturating_add(1);

        let on_schedule = due + self.interval;
        self.next_due = Some(if on_schedule > now {
            on_schedule
        } else {
            now + self.interval
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(16);

    #[test]
    fn stopped_clock_never_fires() {
        let mut clock = SampleClock::new(INTERVAL);
        let now = Instant::now();
        assert!(!clock.poll(now));
        assert!(!clock.poll(now + INTERVAL * 10));
        assert_eq!(clock.samples(), 0);
    }

    #[test]
    fn fires_once_per_interval() {
        let mut clock = SampleClock::new(INTERVAL);
        let t0 = Instant::now();
        clock.start(t0);
        assert!(clock.poll(t0));
        assert!(!clock.poll(t0 + Duration::from_millis(5)));
        assert!(clock.poll(t0 + INTERVAL));
        assert!(!clock.poll(t0 + INTERVAL + Duration::from_millis(1)));
        assert_eq!(clock.samples(), 2);
    }

    #[test]
    fn late_poll_does_not_burst() {
        let mut clock = SampleClock::new(INTERVAL);
        let t0 = Instant::now();
        clock.start(t0);
        assert!(clock.poll(t0));
        let late = t0 + INTERVAL * 5;
        assert!(clock.poll(late));
        assert!(!clock.poll(late + Duration::from_millis(1)));
        assert!(clock.poll(late + INTERVAL));
        assert_eq!(clock.samples(), 3);
    }

    #[test]
    fn stop_releases_timer() {
        let mut clock = SampleClock::new(INTERVAL);
        let t0 = Instant::now();
        clock.start(t0);
        clock.stop();
        assert!(!clock.is_running());
        assert!(!clock.poll(t0 + INTERVAL));
    }
}
