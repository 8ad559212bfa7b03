use crate::array;

use super::{format_tick, AxisOptions, Bounds, ContinuousValueScale, Tick};

/// Base 10 logarithmic axis over a positive domain
#[derive(Clone, Debug, PartialEq)]
pub struct LogValueScale {
    start: f64,
    end: f64,
}

impl Default for LogValueScale {
    fn default() -> Self {
        Self {
            start: 1.0,
            end: 10.0,
        }
    }
}

impl LogValueScale {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    fn log_domain(&self) -> (f64, f64) {
        (self.start.log10(), self.end.log10())
    }
}

fn is_power_of_ten(value: f64) -> bool {
    let exp = value.log10();
    (exp - exp.round()).abs() < 1e-9
}

/// Power of ten at or below a positive value
fn decade(value: f64) -> f64 {
    10f64.powf((value.log10() + 1e-9).floor())
}

/// Leading digit of a positive value in scientific notation
fn mantissa(value: f64) -> f64 {
    (value / decade(value)).round()
}

impl ContinuousValueScale for LogValueScale {
    fn determine_data_limits(&mut self, values: &[f64], options: &AxisOptions) {
        let (data_min, data_max) = values
            .iter()
            .filter(|v| v.is_finite() && **v > 0.0)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });

        let mut min = options.min.filter(|v| *v > 0.0).unwrap_or(data_min);
        let mut max = options.max.filter(|v| *v > 0.0).unwrap_or(data_max);
        if !min.is_finite() {
            min = 1.0;
        }
        if !max.is_finite() {
            max = 10.0;
        }

        // widen a single value to the surrounding decades
        if min == max {
            let exp = min.log10().floor();
            if options.min.is_none() {
                min = 10f64.powf(exp - 1.0);
            }
            if options.max.is_none() {
                max = 10f64.powf(exp + 1.0);
            }
        }

        self.start = min;
        self.end = max;
    }

    fn build_ticks(&mut self, options: &AxisOptions, max_ticks: usize) -> Vec<Tick> {
        if options.bounds == Bounds::Ticks {
            let (lo, hi) = if self.start <= self.end {
                (self.start, self.end)
            } else {
                (self.end, self.start)
            };
            if options.min.is_none() {
                self.start = 10f64.powf(lo.log10().floor());
            }
            if options.max.is_none() {
                self.end = 10f64.powf(hi.log10().ceil());
            }
        }

        let count = max_ticks.max(2);
        let mut values = log_ticks(self.start, self.end, count as f64);
        // thin out crowded decades to the 1-2-5 series, then to powers of ten
        if values.len() > count {
            values.retain(|v| matches!(mantissa(*v) as u32, 1 | 2 | 5));
        }
        if values.len() > count {
            values.retain(|v| is_power_of_ten(*v));
        }

        values
            .into_iter()
            .map(|value| Tick {
                value,
                label: format_tick(value, decade(value)),
                major: is_power_of_ten(value),
            })
            .collect()
    }

    fn domain(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    /// Missing and non-positive values have no position on a log axis
    fn normalize(&self, value: f64) -> Option<f64> {
        if value.is_nan() || value <= 0.0 {
            return None;
        }
        let (start, end) = self.log_domain();
        Some((value.log10() - start) / (end - start))
    }
}

/// Every `k * 10^e` for k in 1..=9 within the domain, falling back to linear
/// ticks in log space when the domain spans too many decades.
fn log_ticks(start: f64, end: f64, count: f64) -> Vec<f64> {
    if !(start > 0.0 && end > 0.0) {
        return vec![];
    }
    let reverse = end < start;
    let (u, v) = if reverse { (end, start) } else { (start, end) };
    let i = u.log10();
    let j = v.log10();

    let mut ticks = Vec::new();
    if j - i < count {
        for exp in (i.floor() as i32)..=(j.ceil() as i32) {
            for k in 1..10 {
                let t = k as f64 * 10f64.powi(exp);
                if t < u * (1.0 - 1e-12) {
                    continue;
                }
                if t > v * (1.0 + 1e-12) {
                    break;
                }
                ticks.push(t);
            }
        }
        if (ticks.len() as f64) * 2.0 < count {
            ticks = array::ticks(u, v, count);
        }
    } else {
        ticks = array::ticks(i, j, count.min(j - i))
            .into_iter()
            .map(|e| 10f64.powf(e))
            .collect();
    }

    if reverse {
        ticks.reverse();
    }
    ticks
}
