// src/chart.rs
use std::time::{Duration, Instant};

use eframe::egui;
use egui::Color32;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use log::warn;

use crate::types::UpdateMode;

const TRANSITION: Duration = Duration::from_millis(400);
const LINE_COLOR: Color32 = Color32::from_rgb(75, 192, 192);

/// Anything that can show a labelled line of values.
///
/// `labels` and `values` are parallel; the widget owns them until the next call.
pub trait ChartWidget {
    fn set_data(&mut self, labels: Vec<String>, values: Vec<f64>, mode: UpdateMode);
    fn labels(&self) -> &[String];
    fn values(&self) -> &[f64];
}

struct Transition {
    from: Vec<f64>,
    started: Instant,
}

/// egui_plot line chart for a single sensor.
pub struct PlotWidget {
    title: String,
    series_name: String,
    labels: Vec<String>,
    values: Vec<f64>,
    transition: Option<Transition>,
    redraws: u64,
}

impl PlotWidget {
    pub fn new(sensor_id: &str) -> Self {
        let mut widget = Self {
            title: String::new(),
            series_name: String::new(),
            labels: Vec::new(),
            values: Vec::new(),
            transition: None,
            redraws: 0,
        };
        widget.set_sensor(sensor_id);
        widget
    }

    pub fn set_sensor(&mut self, sensor_id: &str) {
        self.title = format!("Sensor {sensor_id} Data Visualization");
        self.series_name = format!("Sensor {sensor_id} Data");
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.transition
            .as_ref()
            .map(|t| now.duration_since(t.started) < TRANSITION)
            .unwrap_or(false)
    }

    // 线性插值 (让数据切换更平滑)
    fn lerp(current: f64, target: f64, t: f64) -> f64 {
        current + (target - current) * t
    }

    /// Values as they should appear at `now`, easing out of the last animated update.
    pub fn displayed_values(&self, now: Instant) -> Vec<f64> {
        let Some(transition) = &self.transition else {
            return self.values.clone();
        };
        let elapsed = now.duration_since(transition.started).as_secs_f64();
        let t = (elapsed / TRANSITION.as_secs_f64()).clamp(0.0, 1.0);
        self.values
            .iter()
            .enumerate()
            .map(|(i, &target)| {
                let from = transition.from.get(i).copied().unwrap_or(0.0);
                Self::lerp(from, target, t)
            })
            .collect()
    }

    /// Points for egui_plot. Labels carry the timestamps; unparsable ones fall back to the index.
    fn plot_points(&self, now: Instant) -> Vec<[f64; 2]> {
        self.labels
            .iter()
            .zip(self.displayed_values(now))
            .enumerate()
            .map(|(i, (label, value))| [label.parse().unwrap_or(i as f64), value])
            .filter(|[x, y]| x.is_finite() && y.is_finite())
            .collect()
    }

    pub fn show(&self, ui: &mut egui::Ui, now: Instant) {
        ui.heading(&self.title);
        let points = self.plot_points(now);
        Plot::new("sensor_chart")
            .legend(Legend::default())
            .x_axis_label("Time")
            .y_axis_label("Sensor Value")
            .auto_bounds_x()
            .auto_bounds_y()
            .show(ui, |plot_ui| {
                if !points.is_empty() {
                    plot_ui.line(
                        Line::new(PlotPoints::new(points))
                            .name(&self.series_name)
                            .color(LINE_COLOR),
                    );
                }
            });
    }
}

impl ChartWidget for PlotWidget {
    fn set_data(&mut self, mut labels: Vec<String>, mut values: Vec<f64>, mode: UpdateMode) {
        if labels.len() != values.len() {
            warn!(
                "chart update with {} labels but {} values; truncating",
                labels.len(),
                values.len()
            );
            let n = labels.len().min(values.len());
            labels.truncate(n);
            values.truncate(n);
        }
        self.transition = match mode {
            UpdateMode::Animated => Some(Transition {
                from: std::mem::take(&mut self.values),
                started: Instant::now(),
            }),
            UpdateMode::Immediate => None,
        };
        self.labels = labels;
        self.values = values;
        self.redraws += 1;
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn values(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> (Vec<String>, Vec<f64>) {
        (
            vec!["0.00000000".into(), "0.00500000".into(), "0.01000000".into()],
            vec![1.0, 2.0, 3.0],
        )
    }

    #[test]
    fn reapplying_same_window_is_idempotent() {
        let mut w = PlotWidget::new("1");
        let (labels, values) = window();
        w.set_data(labels, values, UpdateMode::Immediate);
        let before = (w.labels().to_vec(), w.values().to_vec());
        w.set_data(before.0.clone(), before.1.clone(), UpdateMode::Immediate);
        assert_eq!(w.labels(), before.0.as_slice());
        assert_eq!(w.values(), before.1.as_slice());
        assert_eq!(w.redraws(), 2);
    }

    #[test]
    fn immediate_update_skips_transition() {
        let mut w = PlotWidget::new("1");
        let (labels, values) = window();
        w.set_data(labels, values, UpdateMode::Immediate);
        let now = Instant::now();
        assert!(!w.is_animating(now));
        assert_eq!(w.displayed_values(now), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn animated_update_eases_from_previous_values() {
        let mut w = PlotWidget::new("1");
        let (labels, _) = window();
        w.set_data(labels.clone(), vec![0.0, 0.0, 0.0], UpdateMode::Immediate);
        w.set_data(labels, vec![10.0, 20.0, 30.0], UpdateMode::Animated);
        let later = Instant::now() + TRANSITION * 2;
        assert_eq!(w.displayed_values(later), vec![10.0, 20.0, 30.0]);
        assert!(!w.is_animating(later));
    }

    #[test]
    fn mismatched_lengths_are_truncated() {
        let mut w = PlotWidget::new("1");
        w.set_data(vec!["0.1".into()], vec![1.0, 2.0], UpdateMode::Immediate);
        assert_eq!(w.labels().len(), 1);
        assert_eq!(w.values(), &[1.0]);
    }

    #[test]
    fn plot_points_use_label_times_and_skip_gaps() {
        let mut w = PlotWidget::new("1");
        w.set_data(
            vec!["0.5".into(), "oops".into(), "1.5".into()],
            vec![1.0, 2.0, f64::NAN],
            UpdateMode::Immediate,
        );
        assert_eq!(w.plot_points(Instant::now()), vec![[0.5, 1.0], [1.0, 2.0]]);
    }
}
