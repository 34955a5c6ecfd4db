use thiserror::Error;
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to load sensor data: {0}")]
    LoadFailure(String),
    #[error("Invalid sensor ID: {id}")]
    InvalidSensorSelection { id: String },
    #[error("Error parsing CSV file. Please check the format. ({0})")]
    ManualParseFailure(String),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for PipelineError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        PipelineError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for PipelineError {
    fn from(value: image::ImageError) -> Self {
        PipelineError::Plot(value.to_string())
    }
}
