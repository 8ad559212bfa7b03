pub mod axis;
pub mod legend;

pub use axis::draw_legend_axis;
pub use legend::{draw_color_legend, draw_size_legend, indicator_offset};
