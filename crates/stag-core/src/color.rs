use serde::{Deserialize, Serialize};

/// Three-channel overlay color in B, G, R order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct BorderColor {
    pub b: i32,
    pub g: i32,
    pub r: i32,
}

/// Color used when the caller does not pick one: `(50, 255, 50)`.
pub const DEFAULT_BORDER_COLOR: BorderColor = BorderColor::new(50, 255, 50);

impl BorderColor {
    pub const fn new(b: i32, g: i32, r: i32) -> Self {
        Self { b, g, r }
    }

    /// Components as `[b, g, r]`.
    pub const fn to_array(self) -> [i32; 3] {
        [self.b, self.g, self.r]
    }
}

impl Default for BorderColor {
    fn default() -> Self {
        DEFAULT_BORDER_COLOR
    }
}

impl From<[i32; 3]> for BorderColor {
    fn from([b, g, r]: [i32; 3]) -> Self {
        Self::new(b, g, r)
    }
}

impl From<BorderColor> for [i32; 3] {
    fn from(c: BorderColor) -> Self {
        c.to_array()
    }
}
