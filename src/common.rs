use serde::{Deserialize, Serialize};

pub type Dimension = u16; // Pixel width/height, bits per pixel
pub type FrameIdx = u16; // Index into a tile's frame list
pub type ChannelId = u32; // Collision channel identifier
pub type PaletteOffset = u8; // Bias added to pixel values before palette lookup
pub type PixelValue = u16; // Raw palette index stored in a tile (up to 16bpp)
pub type ColorValue = u8; // Color component (0-255)
pub type ColorRGB = (ColorValue, ColorValue, ColorValue);

// Channel id referring to a tile's default collision rather than a named channel.
pub const COLLISION_CHANNEL_ALL: ChannelId = u32::MAX;

#[derive(Serialize, Deserialize, Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct BoundingRect {
    #[serde(default)]
    pub x: u16,
    #[serde(default)]
    pub y: u16,
    #[serde(rename = "w", default)]
    pub width: u16,
    #[serde(rename = "h", default)]
    pub height: u16,
}

impl BoundingRect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        BoundingRect {
            x,
            y,
            width,
            height,
        }
    }
}
