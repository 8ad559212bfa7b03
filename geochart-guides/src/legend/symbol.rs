use geochart_canvas::{draw_point, Canvas, StrokeStyle};
use geochart_common::ChartArea;
use geochart_scales::{ContinuousValueScale, SizeScale};

use crate::axis::draw_legend_axis;
use crate::legend::indicator_offset;

/// Draw the size legend: the axis, then tick marks into the marker strip and
/// one marker per tick sized by its value.
pub fn draw_size_legend<S: ContinuousValueScale>(
    canvas: &mut dyn Canvas,
    scale: &SizeScale<S>,
    area: &ChartArea,
) {
    let legend = scale.legend();
    if !legend.is_visible() {
        return;
    }
    let [x, y] = legend.resolve_legend_position(area);
    canvas.save();
    canvas.translate(x, y);
    draw_legend_axis(canvas, legend);

    let [dx, dy] = indicator_offset(legend);
    canvas.translate(dx, dy);

    let grid = &legend.axis().grid;
    let stroke = StrokeStyle::new(grid.color, grid.line_width);
    for [x1, y1, x2, y2] in scale.indicator_tick_lines() {
        canvas.stroke_line(x1, y1, x2, y2, &stroke);
    }
    for marker in scale.indicator_markers() {
        draw_point(canvas, &marker.options, marker.x, marker.y);
    }
    canvas.restore();
}
