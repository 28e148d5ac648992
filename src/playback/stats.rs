use std::time::Instant;

/// Running throughput statistics for one playback run
#[derive(Clone, Debug, Default)]
pub struct PlaybackStats {
    pub total_bits_revealed: f64,
    /// Seconds between the first reveal and the latest one
    pub elapsed_seconds: f64,
    pub average_bits_per_second: f64,
    pub chars_revealed: u64,
    first_reveal_at: Option<Instant>,
}

impl PlaybackStats {
    /// Account for one revealed character at time `now`
    pub fn record(&mut self, bit_cost: f64, now: Instant) {
        let started = *self.first_reveal_at.get_or_insert(now);
        self.elapsed_seconds = now.saturating_duration_since(started).as_secs_f64();
        self.total_bits_revealed += bit_cost;
        self.chars_revealed += 1;
        self.average_bits_per_second = if self.elapsed_seconds > 0.0 {
            self.total_bits_revealed / self.elapsed_seconds
        } else {
            0.0
        };
    }

    pub fn first_reveal_at(&self) -> Option<Instant> {
        self.first_reveal_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_reveal_has_zero_average() {
        let mut stats = PlaybackStats::default();
        let t0 = Instant::now();
        stats.record(8.0, t0);

        assert_eq!(stats.total_bits_revealed, 8.0);
        assert_eq!(stats.elapsed_seconds, 0.0);
        assert_eq!(stats.average_bits_per_second, 0.0);
        assert_eq!(stats.first_reveal_at(), Some(t0));
    }

    #[test]
    fn test_average_over_elapsed() {
        let mut stats = PlaybackStats::default();
        let t0 = Instant::now();
        stats.record(8.0, t0);
        stats.record(8.0, t0 + Duration::from_secs(2));

        assert_eq!(stats.elapsed_seconds, 2.0);
        assert_eq!(stats.average_bits_per_second, 8.0);
        assert_eq!(stats.chars_revealed, 2);
    }
}
