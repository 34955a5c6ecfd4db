// src/session.rs
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use rand::rngs::StdRng;

use crate::chart::ChartWidget;
use crate::config::DashboardConfig;
use crate::drivers::series::channel_index;
use crate::drivers::{
    parse_manual, select_channel, FallbackGenerator, PendingLoad, PipelineError, ReplayStep,
    ReplayTimer, ReplayWindow, SampleTable, SensorSeries, TableSource,
};
use crate::types::{Alert, UpdateMode};

/// Where the series currently on screen came from.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SeriesOrigin {
    /// Nothing selected yet; the initial load is still running.
    Pending,
    Table,
    Synthetic,
}

/// Everything one sensor view needs: the loaded table, the selected series,
/// the replay window and its timer, plus alerts waiting for the user.
///
/// The owner drives it by calling [`SensorSession::poll`] from its frame loop.
pub struct SensorSession<W: ChartWidget> {
    sensor_id: String,
    widget: W,
    channel_count: usize,
    replay_interval: Duration,
    load_timeout: Duration,
    fallback: FallbackGenerator,
    rng: StdRng,
    table: Option<SampleTable>,
    series: SensorSeries,
    origin: SeriesOrigin,
    replay: ReplayWindow,
    timer: Option<ReplayTimer>,
    timer_generation: u64,
    pending: Option<PendingLoad>,
    alerts: VecDeque<Alert>,
}

impl<W: ChartWidget> SensorSession<W> {
    pub fn new(sensor_id: &str, config: &DashboardConfig, widget: W, rng: StdRng) -> Self {
        Self {
            sensor_id: sensor_id.to_string(),
            widget,
            channel_count: config.channel_count,
            replay_interval: config.replay_interval(),
            load_timeout: config.load_timeout(),
            fallback: config.fallback(),
            rng,
            table: None,
            series: SensorSeries::default(),
            origin: SeriesOrigin::Pending,
            replay: ReplayWindow::new(config.window_len),
            timer: None,
            timer_generation: 0,
            pending: None,
            alerts: VecDeque::new(),
        }
    }

    pub fn sensor_id(&self) -> &str {
        &self.sensor_id
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn series(&self) -> &SensorSeries {
        &self.series
    }

    pub fn origin(&self) -> SeriesOrigin {
        self.origin
    }

    pub fn replay(&self) -> &ReplayWindow {
        &self.replay
    }

    pub fn table(&self) -> Option<&SampleTable> {
        self.table.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_replaying(&self) -> bool {
        self.timer.is_some()
    }

    pub fn timer_generation(&self) -> u64 {
        self.timer_generation
    }

    pub fn take_alert(&mut self) -> Option<Alert> {
        self.alerts.pop_front()
    }

    /// How long the owner may sleep before the next poll has work to do.
    pub fn next_wake(&self, now: Instant) -> Option<Duration> {
        if self.pending.is_some() {
            return Some(Duration::from_millis(50));
        }
        self.timer.map(|t| t.until_due(now))
    }

    /// Starts loading `source` in the background. Any earlier load is abandoned.
    pub fn begin_load(&mut self, source: Box<dyn TableSource>, now: Instant) {
        let pending = PendingLoad::spawn(source, self.load_timeout, now);
        info!("loading sensor data from {}", pending.origin());
        self.pending = Some(pending);
    }

    /// Resolves a finished load and fires the replay timer if due.
    pub fn poll(&mut self, now: Instant) {
        let outcome = self.pending.as_ref().and_then(|p| p.poll(now));
        if let Some(result) = outcome {
            self.pending = None;
            self.finish_load(result, now);
        }
        let due = self.timer.as_mut().map(|t| t.poll(now)).unwrap_or(false);
        if due {
            self.tick();
        }
    }

    pub fn finish_load(&mut self, result: Result<SampleTable, PipelineError>, now: Instant) {
        match result {
            Ok(table) => {
                info!(
                    "loaded {} rows with up to {} channels",
                    table.len(),
                    table.channel_count()
                );
                self.table = Some(table);
            }
            Err(err) => {
                error!("error loading sensor data: {err}");
                self.table = None;
            }
        }
        self.prepare_series(now);
    }

    /// Switches the view to another sensor and replays its series from the start.
    pub fn select_sensor(&mut self, sensor_id: &str, now: Instant) {
        self.sensor_id = sensor_id.trim().to_string();
        if self.pending.is_some() {
            // The load will select the channel when it lands.
            return;
        }
        self.prepare_series(now);
    }

    /// Replaces the table with a user-supplied file. On failure the current state is kept.
    pub fn import_manual(&mut self, bytes: &[u8], now: Instant) -> Result<(), PipelineError> {
        let table = match parse_manual(bytes) {
            Ok(table) => table,
            Err(err) => {
                error!("error parsing CSV: {err}");
                self.raise(&err);
                return Err(err);
            }
        };
        info!("imported {} rows", table.len());
        // A manual import wins over a load still in flight.
        self.pending = None;
        self.table = Some(table);
        self.prepare_series(now);
        Ok(())
    }

    /// Advances the display window by one point and pushes it to the widget.
    pub fn tick(&mut self) -> ReplayStep {
        let step = self.replay.advance(&self.series);
        match step {
            ReplayStep::Idle => return step,
            ReplayStep::Restarted => {
                info!(
                    "sensor {}: replay restarted (lap {})",
                    self.sensor_id,
                    self.replay.laps()
                )
            }
            ReplayStep::Appended => {}
        }
        let (labels, values) = self.replay.labels_and_values();
        self.widget.set_data(labels, values, UpdateMode::Immediate);
        step
    }

    /// Stops replay and abandons any load. The session can be reused after a new load.
    pub fn teardown(&mut self) {
        if self.timer.take().is_some() || self.pending.is_some() {
            info!("sensor {}: session torn down", self.sensor_id);
        }
        self.pending = None;
        self.replay.reset();
    }

    fn prepare_series(&mut self, now: Instant) {
        let selected = match &self.table {
            Some(table) => select_channel(table, &self.sensor_id, self.channel_count),
            None => channel_index(&self.sensor_id, self.channel_count).map(|_| SensorSeries::default()),
        };
        match selected {
            Ok(series) => {
                self.series = series;
                self.origin = SeriesOrigin::Table;
            }
            Err(err) => {
                warn!("{err}; using synthetic data");
                self.raise(&err);
                self.series = SensorSeries::default();
            }
        }
        self.load_into_chart(now);
    }

    fn load_into_chart(&mut self, now: Instant) {
        if self.series.is_empty() {
            self.series = self.fallback.generate(&self.sensor_id, &mut self.rng);
            self.origin = SeriesOrigin::Synthetic;
            info!(
                "sensor {}: showing {} synthetic points",
                self.sensor_id,
                self.series.len()
            );
        }
        let (labels, values): (Vec<String>, Vec<f64>) = self
            .series
            .points
            .iter()
            .map(|p| (p.label(), p.value))
            .unzip();
        self.widget.set_data(labels, values, UpdateMode::Animated);
        self.start_replay(now);
    }

    fn start_replay(&mut self, now: Instant) {
        if let Some(old) = self.timer.take() {
            debug!("cancelled replay timer #{}", old.generation());
        }
        self.replay.reset();
        self.timer_generation += 1;
        self.timer = Some(ReplayTimer::arm(
            self.replay_interval,
            now,
            self.timer_generation,
        ));
        debug!(
            "armed replay timer #{} every {:?}",
            self.timer_generation, self.replay_interval
        );
    }

    fn raise(&mut self, err: &PipelineError) {
        if let Some(alert) = Alert::from_error(err) {
            self.alerts.push_back(alert);
        }
    }
}
