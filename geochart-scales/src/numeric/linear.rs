use crate::array;

use super::{format_tick, AxisOptions, Bounds, ContinuousValueScale, Tick};

/// Linear axis over `[start, end]`
#[derive(Clone, Debug, PartialEq)]
pub struct LinearValueScale {
    start: f64,
    end: f64,
}

impl Default for LinearValueScale {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 1.0,
        }
    }
}

impl LinearValueScale {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

impl ContinuousValueScale for LinearValueScale {
    fn determine_data_limits(&mut self, values: &[f64], options: &AxisOptions) {
        let (data_min, data_max) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });

        let mut min = options.min.unwrap_or(data_min);
        let mut max = options.max.unwrap_or(data_max);
        if !min.is_finite() {
            min = 0.0;
        }
        if !max.is_finite() {
            max = 1.0;
        }

        // widen a single value into a usable range, leaving fixed limits alone
        if min == max {
            let offset = if max == 0.0 { 1.0 } else { (max * 0.05).abs() };
            if options.max.is_none() {
                max += offset;
            }
            if options.min.is_none() {
                min -= offset;
            }
        }

        self.start = min;
        self.end = max;
    }

    fn build_ticks(&mut self, options: &AxisOptions, max_ticks: usize) -> Vec<Tick> {
        let count = max_ticks.max(2) as f64;
        if options.bounds == Bounds::Ticks {
            let (start, end) = array::nice(self.start, self.end, count);
            if options.min.is_none() {
                self.start = start;
            }
            if options.max.is_none() {
                self.end = end;
            }
        }

        let step = array::tick_step(self.start, self.end, count);
        array::ticks(self.start, self.end, count)
            .into_iter()
            .map(|value| Tick {
                value,
                label: format_tick(value, step),
                major: false,
            })
            .collect()
    }

    fn domain(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    fn normalize(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        Some((value - self.start) / (self.end - self.start))
    }
}
