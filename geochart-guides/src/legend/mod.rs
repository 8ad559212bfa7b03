pub mod colorbar;
pub mod symbol;

use geochart_scales::{ContinuousValueScale, LegendAlign, LegendScale};

pub use colorbar::draw_color_legend;
pub use symbol::draw_size_legend;

/// Translation from the legend box origin to the indicator strip origin
pub fn indicator_offset<S: ContinuousValueScale>(legend: &LegendScale<S>) -> [f64; 2] {
    let iw = legend.legend().indicator_width;
    let size = legend.legend_size();
    match legend.legend().align {
        LegendAlign::Left => [size.w, 0.0],
        LegendAlign::Top => [0.0, size.h],
        LegendAlign::Bottom => [0.0, -iw],
        LegendAlign::Right => [-iw, 0.0],
    }
}
