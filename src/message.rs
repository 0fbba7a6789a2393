use crate::{
    common::{BoundingRect, ChannelId, Dimension, FrameIdx, PaletteOffset, PixelValue},
    tile::Tile,
};

#[derive(Debug, Clone)]
pub enum Message {
    SetFrameCount(FrameIdx),
    CopyFrame {
        from: FrameIdx,
        to: FrameIdx,
    },
    SwapFrames {
        from: FrameIdx,
        to: FrameIdx,
    },
    DuplicateFrame(FrameIdx),
    RemoveFrame(FrameIdx),
    InsertFrameFromTile {
        frame: FrameIdx,
        tile: Tile,
    },
    SetPalette {
        palette_id: Option<String>,
        offset: PaletteOffset,
    },
    SetCollision {
        channel: ChannelId,
        collision: Vec<BoundingRect>,
    },
    BrushPixel {
        frame: FrameIdx,
        x: Dimension,
        y: Dimension,
        value: PixelValue,
    },
}
