pub use self::timer::Timer;

mod timer {
    use std::time;

    // lag past this many periods is dropped instead of replayed
    const MAX_PENDING_PERIODS: u32 = 10;

    /// Fixed-period timer. Elapsed time accumulates through `update` (or
    /// `elapse`) and each successful `tick` consumes one period.
    #[derive(Debug)]
    pub struct Timer {
        period: time::Duration,
        last_update: instant::Instant,
        accumulated_delta: time::Duration,
    }

    impl Timer {
        pub fn new(period: time::Duration) -> Timer {
            Timer {
                period,
                last_update: instant::Instant::now(),
                accumulated_delta: time::Duration::from_secs(0),
            }
        }

        pub fn update(&mut self) {
            let now = instant::Instant::now();
            let diff = now - self.last_update;

            self.last_update = now;
            self.elapse(diff);
        }

        pub fn elapse(&mut self, diff: time::Duration) {
            self.accumulated_delta += diff;
            let max_delta = self.period * MAX_PENDING_PERIODS;
            if self.accumulated_delta > max_delta {
                self.accumulated_delta = max_delta;
            }
        }

        pub fn tick(&mut self) -> bool {
            if !self.period.is_zero() && self.accumulated_delta >= self.period {
                self.accumulated_delta -= self.period;
                true
            } else {
                false
            }
        }

        /// Time left until the next period is due.
        pub fn until_next_tick(&self) -> time::Duration {
            self.period
                .checked_sub(self.accumulated_delta)
                .unwrap_or_default()
        }

        /// Drops accumulated time, used when the loop resumes after idling.
        pub fn reset(&mut self) {
            self.last_update = instant::Instant::now();
            self.accumulated_delta = time::Duration::from_secs(0);
        }
    }

}
