use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::drivers::error::PipelineError;
use crate::drivers::SensorPoint;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub line: RGBColor,
    /// Caption, axis labels and legend. Needs a system font at render time.
    pub text: bool,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            background: RGBColor(255, 255, 255),
            line: RGBColor(75, 192, 192),
            text: true,
        }
    }
}
/// Renders the current display window to PNG bytes.
pub fn render_window_png(
    sensor_id: &str,
    points: &[SensorPoint],
    style: PlotStyle,
) -> Result<Vec<u8>, PipelineError> {
    let finite: Vec<(f64, f64)> = points
        .iter()
        .filter(|p| p.time.is_finite() && p.value.is_finite())
        .map(|p| (p.time, p.value))
        .collect();
    if finite.is_empty() {
        return Err(PipelineError::Plot("display window has no points".into()));
    }
    let (x_min, x_max) = bounds(finite.iter().map(|p| p.0), 0.005);
    let (y_min, y_max) = bounds(finite.iter().map(|p| p.1), 0.0001);
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let color = style.line;
        if style.text {
            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .caption(
                    format!("Sensor {sensor_id} Data Visualization"),
                    ("sans-serif", 16).into_font().color(&BLACK),
                )
                .set_label_area_size(LabelAreaPosition::Left, 70)
                .set_label_area_size(LabelAreaPosition::Bottom, 40)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
            chart
                .configure_mesh()
                .light_line_style(&BLACK.mix(0.1))
                .x_desc("Time")
                .y_desc("Sensor Value")
                .x_label_formatter(&|x| format!("{x:.3}"))
                .y_label_formatter(&|y| format!("{y:.6}"))
                .draw()?;
            chart
                .draw_series(LineSeries::new(finite, &color))?
                .label(format!("Sensor {sensor_id} Data"))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
            chart
                .configure_series_labels()
                .border_style(&BLACK.mix(0.2))
                .background_style(&style.background)
                .draw()?;
        } else {
            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
            chart.draw_series(LineSeries::new(finite, &color))?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
/// Min/max of the values, widened so a flat or single-point range still has extent.
fn bounds(values: impl Iterator<Item = f64>, min_span: f64) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi - lo < min_span {
        let mid = (lo + hi) / 2.0;
        (mid - min_span / 2.0, mid + min_span / 2.0)
    } else {
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, PipelineError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| PipelineError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
