// src/drivers/mod.rs
// 传感器数据管线: 解析 -> 选通道 -> 回放窗口
pub mod error;
pub mod plot;
pub mod replay;
pub mod series;
pub mod source;
pub mod synthetic;
pub mod table;
// 公开导出这些模块里的结构体，方便外部调用
pub use error::PipelineError;
pub use plot::{render_window_png, PlotStyle};
pub use replay::{ReplayStep, ReplayTimer, ReplayWindow, DEFAULT_WINDOW_LEN};
pub use series::{select_channel, SensorPoint, SensorSeries, DEFAULT_CHANNEL_COUNT};
pub use source::{FileSource, ManualSource, PendingLoad, TableSource};
pub use synthetic::{FallbackGenerator, FALLBACK_POINTS, FALLBACK_STEP_SECS};
pub use table::{parse_manual, SampleRow, SampleTable};
