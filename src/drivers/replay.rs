use std::collections::VecDeque;
use std::time::{Duration, Instant};
use crate::drivers::{SensorPoint, SensorSeries};
pub const DEFAULT_WINDOW_LEN: usize = 20;
/// Sliding display window that reveals a series one point per tick.
///
/// Once the series runs out the window is cleared and replay starts over from the
/// first point, forever.
pub struct ReplayWindow {
    window: VecDeque<SensorPoint>,
    capacity: usize,
    cursor: usize,
    laps: u64,
}
/// What a single advance did to the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayStep {
    Appended,
    /// The series was exhausted; the window restarted at the first point.
    Restarted,
    /// Nothing to replay.
    Idle,
}
impl ReplayWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            cursor: 0,
            laps: 0,
        }
    }
    pub fn reset(&mut self) {
        self.window.clear();
        self.cursor = 0;
        self.laps = 0;
    }
    pub fn advance(&mut self, series: &SensorSeries) -> ReplayStep {
        if series.is_empty() {
            self.window.clear();
            self.cursor = 0;
            return ReplayStep::Idle;
        }
        let mut step = ReplayStep::Appended;
        if self.cursor >= series.len() {
            self.window.clear();
            self.cursor = 0;
            self.laps += 1;
            step = ReplayStep::Restarted;
        }
        if let Some(point) = series.get(self.cursor) {
            if self.window.len() == self.capacity {
                self.window.pop_front();
            }
            self.window.push_back(point);
            self.cursor += 1;
        }
        step
    }
    pub fn len(&self) -> usize {
        self.window.len()
    }
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn laps(&self) -> u64 {
        self.laps
    }
    pub fn snapshot(&self) -> Vec<SensorPoint> {
        self.window.iter().copied().collect()
    }
    /// Labels and values in the shape the chart widget expects.
    pub fn labels_and_values(&self) -> (Vec<String>, Vec<f64>) {
        self.window.iter().map(|p| (p.label(), p.value)).unzip()
    }
}
/// Fixed-cadence timer polled from the UI loop.
///
/// Fires at most once per poll; a late poll does not produce a burst of catch-up ticks.
#[derive(Clone, Copy, Debug)]
pub struct ReplayTimer {
    interval: Duration,
    next_due: Instant,
    generation: u64,
}
impl ReplayTimer {
    pub fn arm(interval: Duration, now: Instant, generation: u64) -> Self {
        Self {
            interval,
            next_due: now + interval,
            generation,
        }
    }
    pub fn generation(&self) -> u64 {
        self.generation
    }
    pub fn until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.interval;
        if self.next_due <= now {
            self.next_due = now + self.interval;
        }
        true
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{FallbackGenerator, SensorPoint};
    use rand::{rngs::StdRng, SeedableRng};
    fn series(n: usize) -> SensorSeries {
        SensorSeries::new(
            (0..n)
                .map(|i| SensorPoint {
                    time: i as f64,
                    value: i as f64 * 10.0,
                })
                .collect(),
        )
    }
    #[test]
    fn window_never_exceeds_capacity() {
        let s = series(50);
        let mut w = ReplayWindow::new(DEFAULT_WINDOW_LEN);
        for _ in 0..200 {
            w.advance(&s);
            assert!(w.len() <= DEFAULT_WINDOW_LEN);
        }
    }
    #[test]
    fn window_keeps_most_recent_points_in_order() {
        let s = series(50);
        let mut w = ReplayWindow::new(DEFAULT_WINDOW_LEN);
        for _ in 0..25 {
            w.advance(&s);
        }
        let times: Vec<f64> = w.snapshot().iter().map(|p| p.time).collect();
        let expected: Vec<f64> = (5..25).map(|i| i as f64).collect();
        assert_eq!(times, expected);
    }
    #[test]
    fn fifty_first_advance_restarts_at_first_point() {
        let s = FallbackGenerator::default().generate("1", &mut StdRng::seed_from_u64(1));
        let mut w = ReplayWindow::new(DEFAULT_WINDOW_LEN);
        for _ in 0..50 {
            assert_eq!(w.advance(&s), ReplayStep::Appended);
        }
        assert_eq!(w.len(), DEFAULT_WINDOW_LEN);
        assert_eq!(w.advance(&s), ReplayStep::Restarted);
        assert_eq!(w.snapshot(), vec![s.points[0]]);
        assert_eq!(w.laps(), 1);
        assert_eq!(w.cursor(), 1);
    }
    #[test]
    fn empty_series_is_idle() {
        let mut w = ReplayWindow::new(DEFAULT_WINDOW_LEN);
        assert_eq!(w.advance(&SensorSeries::default()), ReplayStep::Idle);
        assert!(w.is_empty());
    }
    #[test]
    fn labels_match_values() {
        let s = series(3);
        let mut w = ReplayWindow::new(DEFAULT_WINDOW_LEN);
        w.advance(&s);
        w.advance(&s);
        let (labels, values) = w.labels_and_values();
        assert_eq!(labels, vec!["0.00000000", "1.00000000"]);
        assert_eq!(values, vec![0.0, 10.0]);
    }
    #[test]
    fn timer_fires_once_per_interval() {
        let start = Instant::now();
        let interval = Duration::from_millis(2000);
        let mut t = ReplayTimer::arm(interval, start, 0);
        assert!(!t.poll(start + Duration::from_millis(1999)));
        assert!(t.poll(start + Duration::from_millis(2000)));
        assert!(!t.poll(start + Duration::from_millis(2001)));
        assert!(t.poll(start + Duration::from_millis(4000)));
    }
    #[test]
    fn late_poll_does_not_burst() {
        let start = Instant::now();
        let interval = Duration::from_millis(100);
        let mut t = ReplayTimer::arm(interval, start, 0);
        let late = start + Duration::from_millis(1000);
        assert!(t.poll(late));
        assert!(!t.poll(late));
        assert_eq!(t.until_due(late), interval);
    }
}
