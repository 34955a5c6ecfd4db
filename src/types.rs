// src/types.rs
use crate::drivers::PipelineError;

// 图表刷新方式
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum UpdateMode {
    /// Ease from the previous values to the new ones.
    Animated,
    /// Replace the data without any transition.
    Immediate,
}

// 需要用户确认的提示框
#[derive(Clone, Debug, PartialEq)]
pub enum Alert {
    InvalidSensor(String),
    ManualParse(String),
    SnapshotFailed(String),
}

impl Alert {
    pub fn title(&self) -> &'static str {
        match self {
            Alert::InvalidSensor(_) => "Invalid sensor",
            Alert::ManualParse(_) => "Import failed",
            Alert::SnapshotFailed(_) => "Snapshot failed",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Alert::InvalidSensor(id) => format!("Invalid sensor ID: {id}"),
            Alert::ManualParse(_) => "Error parsing CSV file. Please check the format.".to_owned(),
            Alert::SnapshotFailed(reason) => format!("Could not save chart snapshot: {reason}"),
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            Alert::ManualParse(detail) => Some(detail),
            _ => None,
        }
    }

    /// Errors that need to interrupt the user. Load failures are only logged.
    pub fn from_error(err: &PipelineError) -> Option<Self> {
        match err {
            PipelineError::InvalidSensorSelection { id } => Some(Alert::InvalidSensor(id.clone())),
            PipelineError::ManualParseFailure(detail) => Some(Alert::ManualParse(detail.clone())),
            PipelineError::Plot(reason) => Some(Alert::SnapshotFailed(reason.clone())),
            PipelineError::LoadFailure(_) => None,
        }
    }
}
