use geochart_canvas::Canvas;
use geochart_common::ChartArea;
use geochart_scales::{ColorScale, ContinuousValueScale};

use crate::axis::draw_legend_axis;
use crate::legend::indicator_offset;

/// Draw the color legend: the axis followed by the color bar beside it.
/// Hidden scales draw nothing.
pub fn draw_color_legend<S: ContinuousValueScale>(
    canvas: &mut dyn Canvas,
    scale: &ColorScale<S>,
    area: &ChartArea,
) {
    let legend = scale.legend();
    if !legend.is_visible() {
        return;
    }
    let [x, y] = legend.resolve_legend_position(area);
    let slices = scale.indicator_slices();
    tracing::trace!("Drawing color legend at ({x}, {y}) with {} slices", slices.len());
    canvas.save();
    canvas.translate(x, y);
    draw_legend_axis(canvas, legend);

    let [dx, dy] = indicator_offset(legend);
    canvas.translate(dx, dy);
    for slice in slices {
        canvas.fill_rect(slice.x, slice.y, slice.width, slice.height, slice.color);
    }
    canvas.restore();
}
