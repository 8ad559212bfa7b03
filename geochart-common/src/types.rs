use serde::{Deserialize, Serialize};

/// Rectangle in pixel space that the layout pass hands to scales and controllers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ChartArea {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Padding or margin, either one value for every side or one value per side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sides {
    Uniform(f64),
    PerSide {
        #[serde(default)]
        top: f64,
        #[serde(default)]
        right: f64,
        #[serde(default)]
        bottom: f64,
        #[serde(default)]
        left: f64,
    },
}

impl Default for Sides {
    fn default() -> Self {
        Sides::Uniform(0.0)
    }
}

impl From<f64> for Sides {
    fn from(value: f64) -> Self {
        Sides::Uniform(value)
    }
}

impl Sides {
    pub fn top(&self) -> f64 {
        match self {
            Sides::Uniform(v) => *v,
            Sides::PerSide { top, .. } => *top,
        }
    }

    pub fn right(&self) -> f64 {
        match self {
            Sides::Uniform(v) => *v,
            Sides::PerSide { right, .. } => *right,
        }
    }

    pub fn bottom(&self) -> f64 {
        match self {
            Sides::Uniform(v) => *v,
            Sides::PerSide { bottom, .. } => *bottom,
        }
    }

    pub fn left(&self) -> f64 {
        match self {
            Sides::Uniform(v) => *v,
            Sides::PerSide { left, .. } => *left,
        }
    }
}

/// Axis aligned box in pixel space. `x2`/`y2` are kept alongside the size so
/// callers never recompute them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelBounds {
    pub x: f64,
    pub y: f64,
    pub x2: f64,
    pub y2: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelBounds {
    pub fn from_corners(x: f64, y: f64, x2: f64, y2: f64) -> Self {
        Self {
            x,
            y,
            x2,
            y2,
            width: x2 - x,
            height: y2 - y,
        }
    }

    /// Bounds of nothing. Every coordinate is non-finite so drawing code skips it.
    pub fn empty() -> Self {
        Self::from_corners(
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        )
    }

    /// Expand every side by `amount`.
    pub fn grow(&self, amount: f64) -> Self {
        Self::from_corners(
            self.x - amount,
            self.y - amount,
            self.x2 + amount,
            self.y2 + amount,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.x && x <= self.x2
    }

    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.y && y <= self.y2
    }
}
