/// Generate approximately `count` evenly spaced, nicely rounded values between
/// `start` and `stop` inclusive
pub fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if count <= 0.0 || count.is_nan() {
        return vec![];
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (i1, i2, inc) = if reverse {
        tick_spec(stop, start, count)
    } else {
        tick_spec(start, stop, count)
    };
    if !(i2 >= i1) {
        return vec![];
    }

    let n = (i2 - i1 + 1.0) as usize;
    let value = |k: f64| if inc < 0.0 { k / -inc } else { k * inc };
    if reverse {
        (0..n).map(|i| value(i2 - i as f64)).collect()
    } else {
        (0..n).map(|i| value(i1 + i as f64)).collect()
    }
}

/// Integer tick bounds and increment. A negative increment means the ticks
/// are `i / -inc`, which avoids accumulating error for steps below one.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = step_factor(error);

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let temp_inc = 10f64.powf(-power) / factor;
        i1 = (start * temp_inc).round();
        i2 = (stop * temp_inc).round();
        if i1 / temp_inc < start {
            i1 += 1.0;
        }
        if i2 / temp_inc > stop {
            i2 -= 1.0;
        }
        inc = -temp_inc;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

fn step_factor(error: f64) -> f64 {
    if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    }
}

/// Tick increment for the given range and count. Negative results encode
/// the reciprocal of a fractional step.
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    if !(count > 0.0) {
        return f64::NAN;
    }
    if start == stop {
        return f64::NEG_INFINITY;
    }
    let step = (stop - start) / count;
    if step == 0.0 {
        return f64::NAN;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = step_factor(error);
    if power >= 0.0 {
        10f64.powf(power) * factor
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Absolute distance between adjacent ticks
pub fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let reverse = stop < start;
    let inc = if reverse {
        tick_increment(stop, start, count)
    } else {
        tick_increment(start, stop, count)
    };
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse {
        -step
    } else {
        step
    }
}

/// Extend `[start, stop]` outward to multiples of the tick step
pub fn nice(start: f64, stop: f64, count: f64) -> (f64, f64) {
    if start == stop || start.is_nan() || stop.is_nan() {
        return (start, stop);
    }
    let reverse = stop < start;
    let (mut lo, mut hi) = if reverse { (stop, start) } else { (start, stop) };

    let mut prestep = 0.0;
    for _ in 0..10 {
        let step = tick_increment(lo, hi, count);
        if step == prestep {
            break;
        } else if step > 0.0 {
            lo = (lo / step).floor() * step;
            hi = (hi / step).ceil() * step;
        } else if step < 0.0 {
            lo = (lo * step).ceil() / step;
            hi = (hi * step).floor() / step;
        } else {
            break;
        }
        prestep = step;
    }

    if reverse {
        (hi, lo)
    } else {
        (lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_ticks() {
        assert_eq!(
            ticks(0.0, 1.0, 10.0),
            vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]
        );
        assert_eq!(ticks(0.0, 1.0, 5.0), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(0.0, 1.0, 3.0), vec![0.0, 0.5, 1.0]);
        assert_eq!(ticks(0.0, 1.0, 1.0), vec![0.0, 1.0]);
        assert_eq!(ticks(0.0, 100.0, 5.0), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn test_ticks_reversed() {
        assert_eq!(ticks(1.0, 0.0, 3.0), vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_ticks_edge_cases() {
        assert_eq!(ticks(f64::NAN, 1.0, 1.0), Vec::<f64>::new());
        assert_eq!(ticks(0.0, 1.0, 0.0), Vec::<f64>::new());
        assert_eq!(ticks(0.0, 1.0, -1.0), Vec::<f64>::new());
        assert_eq!(ticks(1.0, 1.0, 10.0), vec![1.0]);
    }

    #[test]
    fn test_tick_increment() {
        assert_eq!(tick_increment(0.0, 1.0, 10.0), -10.0);
        assert_eq!(tick_increment(0.0, 1.0, 3.0), -2.0);
        assert_eq!(tick_increment(0.0, 10.0, 5.0), 2.0);
        assert!(tick_increment(0.0, 1.0, 0.0).is_nan());
    }

    #[test]
    fn test_tick_step() {
        assert_approx_eq!(f64, tick_step(0.0, 1.0, 10.0), 0.1);
        assert_approx_eq!(f64, tick_step(0.0, 50.0, 5.0), 10.0);
        assert_approx_eq!(f64, tick_step(50.0, 0.0, 5.0), -10.0);
    }

    #[test]
    fn test_nice() {
        assert_eq!(nice(0.13, 9.7, 10.0), (0.0, 10.0));
        assert_eq!(nice(3.0, 97.0, 5.0), (0.0, 100.0));
        assert_eq!(nice(97.0, 3.0, 5.0), (100.0, 0.0));
        assert_eq!(nice(2.0, 2.0, 5.0), (2.0, 2.0));
    }
}
