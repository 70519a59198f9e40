use std::time::{Duration, Instant};

/// Wall-clock timer for one phase of a round.
#[derive(Debug, Clone)]
pub struct StatsTimer {
    start_time: Instant,
    duration: Option<Duration>,
}

impl Default for StatsTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsTimer {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            duration: None,
        }
    }

    pub fn finish(&mut self) {
        self.duration = Some(self.start_time.elapsed());
    }

    /// Elapsed time at `finish`, or so far if the timer is still running.
    pub fn get_duration(&self) -> Duration {
        self.duration.unwrap_or_else(|| self.start_time.elapsed())
    }

    pub fn get_duration_secs(&self) -> f32 {
        self.get_duration().as_secs_f32()
    }

    pub fn get_duration_string(&self) -> String {
        let duration = self.get_duration();
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        let millis = duration.subsec_millis();
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    }
}
