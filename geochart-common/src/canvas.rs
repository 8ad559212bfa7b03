/// Logical size of a drawing surface plus the device pixel ratio used to
/// allocate its backing raster.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CanvasDimensions {
    pub size: [f64; 2],
    pub pixel_ratio: f64,
}

impl CanvasDimensions {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            size: [width, height],
            pixel_ratio,
        }
    }

    pub fn width(&self) -> f64 {
        self.size[0]
    }

    pub fn height(&self) -> f64 {
        self.size[1]
    }

    pub fn to_physical_width(&self) -> u32 {
        (self.size[0] * self.pixel_ratio).ceil().max(0.0) as u32
    }

    pub fn to_physical_height(&self) -> u32 {
        (self.size[1] * self.pixel_ratio).ceil().max(0.0) as u32
    }
}

impl Default for CanvasDimensions {
    fn default() -> Self {
        Self {
            size: [300.0, 150.0],
            pixel_ratio: 1.0,
        }
    }
}
