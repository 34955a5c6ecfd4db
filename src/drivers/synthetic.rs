use rand::Rng;
use crate::drivers::{SensorPoint, SensorSeries};
pub const FALLBACK_POINTS: usize = 50;
pub const FALLBACK_STEP_SECS: f64 = 0.005;
/// Stand-in data used when the real table is missing or the sensor id is invalid.
///
/// Sensors "1" to "5" each follow their own trend so they stay recognizable on the
/// chart; "1" is a pure sine and needs no randomness. Anything else is uniform noise
/// around 0.00055.
#[derive(Clone, Copy, Debug)]
pub struct FallbackGenerator {
    pub points: usize,
    pub step_secs: f64,
}
impl Default for FallbackGenerator {
    fn default() -> Self {
        Self {
            points: FALLBACK_POINTS,
            step_secs: FALLBACK_STEP_SECS,
        }
    }
}
impl FallbackGenerator {
    pub fn generate<R: Rng + ?Sized>(&self, sensor_id: &str, rng: &mut R) -> SensorSeries {
        let points = (0..self.points)
            .map(|i| SensorPoint {
                time: i as f64 * self.step_secs,
                value: fallback_value(sensor_id, i, rng),
            })
            .collect();
        SensorSeries::new(points)
    }
}
fn fallback_value<R: Rng + ?Sized>(sensor_id: &str, i: usize, rng: &mut R) -> f64 {
    let step = i as f64;
    match sensor_id {
        "1" => 0.0001 * (step * 0.2).sin(),
        "2" => 0.0003 + step * 0.00001 + (rng.gen::<f64>() * 0.0001 - 0.00005),
        "3" => 0.0008 - step * 0.00001 + (rng.gen::<f64>() * 0.00008 - 0.00004),
        "4" => {
            let spike = if i % 10 == 0 { 0.0002 } else { 0.0 };
            0.00045 + rng.gen::<f64>() * 0.00005 + spike
        }
        "5" => 0.0005 + (rng.gen::<f64>() * 0.0001 - 0.00005),
        _ => 0.0004 + rng.gen::<f64>() * 0.0003,
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }
    #[test]
    fn sensor_one_is_a_pure_sine() {
        let series = FallbackGenerator::default().generate("1", &mut rng());
        assert_eq!(series.len(), 50);
        for (i, p) in series.points.iter().enumerate() {
            assert_eq!(p.value, 0.0001 * (i as f64 * 0.2).sin());
        }
    }
    #[test]
    fn every_id_yields_fifty_evenly_spaced_points() {
        for id in ["1", "2", "3", "4", "5", "N", "42"] {
            let series = FallbackGenerator::default().generate(id, &mut rng());
            assert_eq!(series.len(), FALLBACK_POINTS);
            for (i, p) in series.points.iter().enumerate() {
                assert!((p.time - i as f64 * FALLBACK_STEP_SECS).abs() < 1e-12);
            }
        }
    }
    #[test]
    fn noisy_sensors_stay_in_their_bands() {
        let gen = FallbackGenerator::default();
        let mut r = rng();
        for (i, p) in gen.generate("2", &mut r).points.iter().enumerate() {
            let trend = 0.0003 + i as f64 * 0.00001;
            assert!((p.value - trend).abs() <= 0.00005 + 1e-12);
        }
        for (i, p) in gen.generate("4", &mut r).points.iter().enumerate() {
            let base = if i % 10 == 0 { 0.00065 } else { 0.00045 };
            assert!(p.value >= base - 1e-12 && p.value < base + 0.00005 + 1e-12);
        }
        for p in gen.generate("N", &mut r).points {
            assert!(p.value >= 0.0004 && p.value <= 0.0007);
        }
    }
    #[test]
    fn same_seed_same_series() {
        let gen = FallbackGenerator::default();
        assert_eq!(gen.generate("3", &mut rng()), gen.generate("3", &mut rng()));
    }
}
