/// Rectangle allocated to a cell by the measurement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Nothing can be painted into a rectangle without width or height.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
