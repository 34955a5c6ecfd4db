use crate::drivers::{PipelineError, SampleTable};
/// Number of channels carried by the bundled structural data set.
pub const DEFAULT_CHANNEL_COUNT: usize = 17;
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorPoint {
    pub time: f64,
    pub value: f64,
}
impl SensorPoint {
    /// Axis label used by the chart, matching the 8-decimal timestamps of the data files.
    pub fn label(&self) -> String {
        format!("{:.8}", self.time)
    }
}
/// Time-ordered points for one selected channel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SensorSeries {
    pub points: Vec<SensorPoint>,
}
impl SensorSeries {
    pub fn new(points: Vec<SensorPoint>) -> Self {
        Self { points }
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    pub fn get(&self, index: usize) -> Option<SensorPoint> {
        self.points.get(index).copied()
    }
}
/// Maps a 1-based sensor identifier to its zero-based channel index.
pub fn channel_index(sensor_id: &str, channel_count: usize) -> Result<usize, PipelineError> {
    let invalid = || PipelineError::InvalidSensorSelection {
        id: sensor_id.to_string(),
    };
    let id: usize = sensor_id.trim().parse().map_err(|_| invalid())?;
    match id.checked_sub(1) {
        Some(index) if index < channel_count => Ok(index),
        _ => Err(invalid()),
    }
}
/// Projects every row onto one channel. Rows too short for the channel give `NaN`.
pub fn project(table: &SampleTable, index: usize) -> SensorSeries {
    SensorSeries::new(
        table
            .rows
            .iter()
            .map(|row| SensorPoint {
                time: row.time,
                value: row.readings.get(index).copied().unwrap_or(f64::NAN),
            })
            .collect(),
    )
}
pub fn select_channel(
    table: &SampleTable,
    sensor_id: &str,
    channel_count: usize,
) -> Result<SensorSeries, PipelineError> {
    let index = channel_index(sensor_id, channel_count)?;
    Ok(project(table, index))
}
