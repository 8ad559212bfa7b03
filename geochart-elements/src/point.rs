use geochart_canvas::{draw_point, Canvas, PointOptions};

/// A marker at a pixel position, used for bubbles
#[derive(Debug, Clone, PartialEq)]
pub struct PointElement {
    pub x: f64,
    pub y: f64,
    /// Skipped points are neither drawn nor hit
    pub skip: bool,
    pub options: PointOptions,
}

impl Default for PointElement {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            skip: false,
            options: PointOptions::default(),
        }
    }
}

impl PointElement {
    pub fn new(x: f64, y: f64, options: PointOptions) -> Self {
        Self {
            x,
            y,
            skip: x.is_nan() || y.is_nan(),
            options,
        }
    }

    fn hit_radius(&self) -> f64 {
        self.options.radius + self.options.hit_radius
    }

    pub fn in_range(&self, x: f64, y: f64) -> bool {
        if self.skip {
            return false;
        }
        let r = self.hit_radius();
        (x - self.x).powi(2) + (y - self.y).powi(2) < r * r
    }

    pub fn in_x_range(&self, x: f64) -> bool {
        !self.skip && (x - self.x).abs() < self.hit_radius()
    }

    pub fn in_y_range(&self, y: f64) -> bool {
        !self.skip && (y - self.y).abs() < self.hit_radius()
    }

    pub fn get_center_point(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if self.skip {
            return;
        }
        draw_point(canvas, &self.options, self.x, self.y);
    }
}
