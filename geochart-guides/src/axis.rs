use geochart_canvas::{Canvas, StrokeStyle, TextAlign, TextBaseline, TextStyle};
use geochart_scales::{ContinuousValueScale, LegendAlign, LegendScale};

/// Line the axis is anchored on, in legend box coordinates
struct AxisEdge {
    /// Coordinate of the edge across the axis
    offset: f64,
    /// +1 when ticks and labels grow away from the origin, -1 towards it
    direction: f64,
    horizontal: bool,
}

fn axis_edge<S: ContinuousValueScale>(legend: &LegendScale<S>) -> AxisEdge {
    let size = legend.legend_size();
    match legend.legend().align {
        LegendAlign::Left => AxisEdge {
            offset: size.w,
            direction: -1.0,
            horizontal: false,
        },
        LegendAlign::Right => AxisEdge {
            offset: 0.0,
            direction: 1.0,
            horizontal: false,
        },
        LegendAlign::Top => AxisEdge {
            offset: size.h,
            direction: -1.0,
            horizontal: true,
        },
        LegendAlign::Bottom => AxisEdge {
            offset: 0.0,
            direction: 1.0,
            horizontal: true,
        },
    }
}

/// Draw the border line, tick marks and labels of a legend axis.
///
/// The canvas origin must be the legend box origin. The axis edge faces the
/// indicator strip, so labels end up on the far side of the strip.
pub fn draw_legend_axis<S: ContinuousValueScale>(canvas: &mut dyn Canvas, legend: &LegendScale<S>) {
    let axis = legend.axis();
    let edge = axis_edge(legend);
    let length = if edge.horizontal {
        legend.width()
    } else {
        legend.height()
    };
    if !(length.is_finite() && length > 0.0) {
        return;
    }

    // maps (along, across) into canvas coordinates
    let at = |along: f64, across: f64| {
        let across = edge.offset + edge.direction * across;
        if edge.horizontal {
            (along, across)
        } else {
            (across, along)
        }
    };

    if axis.border.display && axis.border.width > 0.0 {
        let (x1, y1) = at(0.0, 0.0);
        let (x2, y2) = at(length, 0.0);
        canvas.stroke_line(
            x1,
            y1,
            x2,
            y2,
            &StrokeStyle::new(axis.border.color, axis.border.width),
        );
    }

    let draw_ticks = axis.grid.display && axis.grid.draw_ticks;
    let tick_length = if draw_ticks { axis.grid.tick_length } else { 0.0 };
    let tick_stroke = StrokeStyle::new(axis.grid.color, axis.grid.line_width);

    let label_style = TextStyle {
        color: axis.ticks.color,
        font_size: axis.ticks.font_size,
        align: match (edge.horizontal, edge.direction > 0.0) {
            (true, _) => TextAlign::Center,
            (false, true) => TextAlign::Left,
            (false, false) => TextAlign::Right,
        },
        baseline: match (edge.horizontal, edge.direction > 0.0) {
            (false, _) => TextBaseline::Middle,
            (true, true) => TextBaseline::Top,
            (true, false) => TextBaseline::Bottom,
        },
    };

    for tick in legend.ticks() {
        let Some(pos) = legend.pixel_for_value(tick.value) else {
            continue;
        };
        if !pos.is_finite() {
            continue;
        }
        if draw_ticks {
            let (x1, y1) = at(pos, 0.0);
            let (x2, y2) = at(pos, tick_length);
            canvas.stroke_line(x1, y1, x2, y2, &tick_stroke);
        }
        if axis.ticks.display {
            let (x, y) = at(pos, tick_length + axis.ticks.padding);
            canvas.fill_text(&tick.label, x, y, &label_style);
        }
    }
}
