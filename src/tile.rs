use std::collections::BTreeMap;

use log::debug;

use crate::{
    common::{
        BoundingRect, ChannelId, ColorRGB, Dimension, FrameIdx, PaletteOffset, PixelValue,
        COLLISION_CHANNEL_ALL,
    },
    palette::PaletteRef,
};

// A multi-frame bitmap of `depth`-bit palette indices. Frames are stored back to
// back in one buffer; each frame is `height` rows of `pitch` bytes, pixels packed
// MSB-first within a row.
//
// Frame indices past the end are clamped to the last frame instead of being
// rejected. Slices returned by `frame`/`frame_mut` borrow the tile, so any
// operation that changes the frame count cannot run while one is alive.
#[derive(Clone, Debug)]
pub struct Tile {
    width: Dimension,
    height: Dimension,
    depth: Dimension,
    frames: FrameIdx,
    pitch: usize,
    frame_size: usize,
    data: Vec<u8>,
    pub(crate) palette: Option<PaletteRef>,
    pub(crate) palette_offset: PaletteOffset,
    pub(crate) collision: Vec<BoundingRect>,
    pub(crate) collision_channels: BTreeMap<ChannelId, Vec<BoundingRect>>,
}

impl Tile {
    /// Creates a zero-filled tile. A frame count of zero is raised to one.
    pub fn new(width: Dimension, height: Dimension, depth: Dimension, frames: FrameIdx) -> Self {
        let frames = frames.max(1);
        let pitch = (width as usize * depth as usize + 7) / 8;
        let frame_size = pitch * height as usize;
        Tile {
            width,
            height,
            depth,
            frames,
            pitch,
            frame_size,
            data: vec![0; frame_size * frames as usize],
            palette: None,
            palette_offset: 0,
            collision: vec![],
            collision_channels: BTreeMap::new(),
        }
    }

    pub fn width(&self) -> Dimension {
        self.width
    }

    pub fn height(&self) -> Dimension {
        self.height
    }

    pub fn depth(&self) -> Dimension {
        self.depth
    }

    pub fn frame_count(&self) -> FrameIdx {
        self.frames
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Total size of the pixel buffer in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn palette(&self) -> Option<&PaletteRef> {
        self.palette.as_ref()
    }

    pub fn palette_offset(&self) -> PaletteOffset {
        self.palette_offset
    }

    pub fn collision_channels(&self) -> &BTreeMap<ChannelId, Vec<BoundingRect>> {
        &self.collision_channels
    }

    fn clamp_frame(&self, frame: FrameIdx) -> FrameIdx {
        if frame >= self.frames {
            debug!("Frame {} out of range, using {}", frame, self.frames - 1);
            self.frames - 1
        } else {
            frame
        }
    }

    fn frame_range(&self, frame: FrameIdx) -> std::ops::Range<usize> {
        let start = frame as usize * self.frame_size;
        start..start + self.frame_size
    }

    pub fn frame(&self, frame: FrameIdx) -> &[u8] {
        let range = self.frame_range(self.clamp_frame(frame));
        &self.data[range]
    }

    pub fn frame_mut(&mut self, frame: FrameIdx) -> &mut [u8] {
        let range = self.frame_range(self.clamp_frame(frame));
        &mut self.data[range]
    }

    /// Reallocates the buffer for `frames` frames, keeping as many leading
    /// frames as fit and zero-filling the rest.
    pub fn set_frame_count(&mut self, frames: FrameIdx) {
        if frames == 0 {
            debug!("Ignoring request for a tile with no frames");
            return;
        }
        let mut data = vec![0; frames as usize * self.frame_size];
        let keep = frames.min(self.frames) as usize * self.frame_size;
        data[..keep].copy_from_slice(&self.data[..keep]);
        self.data = data;
        self.frames = frames;
    }

    pub fn copy_frame(&mut self, from: FrameIdx, to: FrameIdx) {
        let from = self.clamp_frame(from);
        let to = self.clamp_frame(to);
        if from == to {
            return;
        }
        let src = self.frame_range(from);
        self.data.copy_within(src, to as usize * self.frame_size);
    }

    pub fn swap_frames(&mut self, from: FrameIdx, to: FrameIdx) {
        let from = self.clamp_frame(from);
        let to = self.clamp_frame(to);
        if from == to {
            return;
        }
        let temp = self.frame(to).to_vec();
        self.copy_frame(from, to);
        self.frame_mut(from).copy_from_slice(&temp);
    }

    // Opens an empty slot at `frame` by moving frames `frame..` one later.
    fn open_slot(&mut self, frame: FrameIdx) {
        let trailing = (self.frames - frame) as usize;
        self.set_frame_count(self.frames + 1);
        let start = frame as usize * self.frame_size;
        self.data
            .copy_within(start..start + trailing * self.frame_size, start + self.frame_size);
    }

    /// Inserts a copy of `frame` directly after it.
    pub fn duplicate_frame(&mut self, frame: FrameIdx) {
        if self.frames == FrameIdx::MAX {
            debug!("Tile already has the maximum number of frames");
            return;
        }
        let frame = self.clamp_frame(frame);
        // After shifting, both `frame` and `frame + 1` hold the original content.
        self.open_slot(frame);
    }

    /// Removes `frame`. Out-of-range indices and the last remaining frame are left alone.
    pub fn remove_frame(&mut self, frame: FrameIdx) {
        if frame >= self.frames || self.frames == 1 {
            debug!("Not removing frame {} of {}", frame, self.frames);
            return;
        }
        let next = self.frame_range(frame).end;
        self.data.copy_within(next.., frame as usize * self.frame_size);
        self.set_frame_count(self.frames - 1);
    }

    /// Returns a new one-frame tile holding a copy of `frame`, bound to the same palette.
    pub fn tile_for_single_frame(&self, frame: FrameIdx) -> Tile {
        let mut result = Tile::new(self.width, self.height, self.depth, 1);
        result.palette = self.palette.clone();
        result.palette_offset = self.palette_offset;
        result.data.copy_from_slice(self.frame(frame));
        result
    }

    /// Inserts the first frame of `tile` at position `frame`, which may be one
    /// past the last frame. Tiles with a different frame size are ignored.
    pub fn insert_frame_from_tile(&mut self, frame: FrameIdx, tile: &Tile) {
        if tile.frame_size != self.frame_size {
            debug!(
                "Frame size mismatch ({} vs {} bytes), not inserting",
                tile.frame_size, self.frame_size
            );
            return;
        }
        if self.frames == FrameIdx::MAX {
            debug!("Tile already has the maximum number of frames");
            return;
        }
        let frame = frame.min(self.frames);
        self.open_slot(frame);
        let range = self.frame_range(frame);
        self.data[range].copy_from_slice(&tile.data[..self.frame_size]);
    }

    pub fn set_palette(&mut self, palette: Option<PaletteRef>, offset: PaletteOffset) {
        self.palette = palette;
        self.palette_offset = offset;
    }

    pub fn collision(&self, channel: ChannelId) -> Vec<BoundingRect> {
        if channel == COLLISION_CHANNEL_ALL {
            return self.collision.clone();
        }
        self.collision_channels
            .get(&channel)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_collision(&mut self, channel: ChannelId, collision: Vec<BoundingRect>) {
        if channel == COLLISION_CHANNEL_ALL {
            self.collision = collision;
        } else if collision.is_empty() {
            self.collision_channels.remove(&channel);
        } else {
            self.collision_channels.insert(channel, collision);
        }
    }

    fn pixel_bits(&self, x: Dimension, y: Dimension) -> Option<usize> {
        if x >= self.width || y >= self.height || self.depth == 0 || self.depth > 16 {
            return None;
        }
        Some(y as usize * self.pitch * 8 + x as usize * self.depth as usize)
    }

    /// Reads the raw palette index at (`x`, `y`). Returns 0 outside the tile.
    pub fn pixel(&self, frame: FrameIdx, x: Dimension, y: Dimension) -> PixelValue {
        let Some(start) = self.pixel_bits(x, y) else {
            return 0;
        };
        let data = self.frame(frame);
        let mut value: PixelValue = 0;
        for bit in start..start + self.depth as usize {
            let b = (data[bit / 8] >> (7 - bit % 8)) & 1;
            value = value << 1 | b as PixelValue;
        }
        value
    }

    /// Writes a palette index at (`x`, `y`), keeping only the low `depth` bits.
    pub fn set_pixel(&mut self, frame: FrameIdx, x: Dimension, y: Dimension, value: PixelValue) {
        let Some(start) = self.pixel_bits(x, y) else {
            return;
        };
        let depth = self.depth as usize;
        let data = self.frame_mut(frame);
        for i in 0..depth {
            let bit = start + i;
            let mask = 1 << (7 - bit % 8);
            if value >> (depth - 1 - i) & 1 != 0 {
                data[bit / 8] |= mask;
            } else {
                data[bit / 8] &= !mask;
            }
        }
    }

    /// Resolves the pixel at (`x`, `y`) through the bound palette.
    pub fn color_at(&self, frame: FrameIdx, x: Dimension, y: Dimension) -> Option<ColorRGB> {
        let palette = self.palette.as_ref()?;
        let idx = self.pixel(frame, x, y) as usize + self.palette_offset as usize;
        palette.color(idx)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::palette::Palette;

    // Fills every byte of each frame with its frame number plus one.
    fn numbered_tile(frames: FrameIdx) -> Tile {
        let mut tile = Tile::new(8, 8, 4, frames);
        for f in 0..frames {
            tile.frame_mut(f).fill(f as u8 + 1);
        }
        tile
    }

    fn frame_markers(tile: &Tile) -> Vec<u8> {
        (0..tile.frame_count()).map(|f| tile.frame(f)[0]).collect()
    }

    #[test]
    fn sizes_follow_dimensions() {
        let tile = Tile::new(8, 8, 4, 2);
        assert_eq!(tile.pitch(), 4);
        assert_eq!(tile.frame_size(), 32);
        assert_eq!(tile.size(), 64);
        assert!(tile.data().iter().all(|&b| b == 0));

        let odd = Tile::new(3, 5, 3, 3);
        assert_eq!(odd.pitch(), 2);
        assert_eq!(odd.size(), 2 * 5 * 3);
    }

    #[test]
    fn frame_access_clamps_to_last_frame() {
        let tile = numbered_tile(3);
        assert_eq!(tile.frame(7)[0], 3);
        assert_eq!(tile.frame(2)[0], 3);
    }

    #[test]
    fn grow_and_shrink_keep_leading_frames() {
        let mut tile = numbered_tile(2);
        tile.set_frame_count(4);
        assert_eq!(frame_markers(&tile), vec![1, 2, 0, 0]);
        assert_eq!(tile.size(), 4 * tile.frame_size());
        tile.set_frame_count(1);
        assert_eq!(frame_markers(&tile), vec![1]);
        tile.set_frame_count(0);
        assert_eq!(tile.frame_count(), 1);
    }

    #[test]
    fn copy_frame_is_one_directional() {
        let mut tile = numbered_tile(3);
        tile.copy_frame(0, 2);
        assert_eq!(frame_markers(&tile), vec![1, 2, 1]);
        tile.copy_frame(9, 1);
        assert_eq!(frame_markers(&tile), vec![1, 1, 1]);
    }

    #[test]
    fn swap_twice_restores() {
        let mut tile = numbered_tile(3);
        tile.swap_frames(0, 2);
        assert_eq!(frame_markers(&tile), vec![3, 2, 1]);
        tile.swap_frames(0, 2);
        assert_eq!(frame_markers(&tile), vec![1, 2, 3]);
        tile.swap_frames(2, 40);
        assert_eq!(frame_markers(&tile), vec![1, 2, 3]);
    }

    #[test]
    fn duplicate_inserts_after_source() {
        let mut tile = numbered_tile(3);
        tile.duplicate_frame(1);
        assert_eq!(frame_markers(&tile), vec![1, 2, 2, 3]);
        tile.duplicate_frame(100);
        assert_eq!(frame_markers(&tile), vec![1, 2, 2, 3, 3]);
    }

    #[test]
    fn remove_shifts_later_frames() {
        let mut tile = numbered_tile(3);
        tile.remove_frame(0);
        assert_eq!(frame_markers(&tile), vec![2, 3]);
        tile.remove_frame(5);
        assert_eq!(frame_markers(&tile), vec![2, 3]);
        tile.remove_frame(1);
        tile.remove_frame(0);
        assert_eq!(frame_markers(&tile), vec![2]);
    }

    #[test]
    fn single_frame_tile_shares_palette() {
        let pal = Arc::new(Palette::new("grass", vec![(0, 0, 0); 16]));
        let mut tile = numbered_tile(3);
        tile.set_palette(Some(pal.clone()), 4);
        let single = tile.tile_for_single_frame(1);
        assert_eq!(single.frame_count(), 1);
        assert_eq!(single.frame(0), tile.frame(1));
        assert!(Arc::ptr_eq(single.palette().unwrap(), &pal));
        assert_eq!(single.palette_offset(), 4);
        assert_eq!(tile.frame_count(), 3);
    }

    #[test]
    fn insert_accepts_one_past_end() {
        let mut tile = numbered_tile(2);
        let mut other = Tile::new(8, 8, 4, 1);
        other.frame_mut(0).fill(9);
        tile.insert_frame_from_tile(2, &other);
        assert_eq!(frame_markers(&tile), vec![1, 2, 9]);
        tile.insert_frame_from_tile(0, &other);
        assert_eq!(frame_markers(&tile), vec![9, 1, 2, 9]);
        tile.insert_frame_from_tile(50, &other);
        assert_eq!(frame_markers(&tile), vec![9, 1, 2, 9, 9]);
    }

    #[test]
    fn insert_ignores_other_frame_size() {
        let mut tile = numbered_tile(2);
        tile.insert_frame_from_tile(0, &Tile::new(16, 16, 4, 1));
        assert_eq!(frame_markers(&tile), vec![1, 2]);
    }

    #[test]
    fn clone_copies_pixels() {
        let mut tile = numbered_tile(1);
        let copy = tile.clone();
        tile.frame_mut(0).fill(0xEE);
        assert_eq!(copy.frame(0)[0], 1);
    }

    #[test]
    fn empty_channel_is_removed() {
        let mut tile = Tile::new(8, 8, 4, 1);
        let rect = BoundingRect::new(1, 2, 3, 4);
        tile.set_collision(5, vec![rect]);
        assert_eq!(tile.collision(5), vec![rect]);
        tile.set_collision(5, vec![]);
        assert!(tile.collision(5).is_empty());
        assert!(!tile.collision_channels().contains_key(&5));

        tile.set_collision(COLLISION_CHANNEL_ALL, vec![rect, rect]);
        assert_eq!(tile.collision(COLLISION_CHANNEL_ALL).len(), 2);
        tile.set_collision(COLLISION_CHANNEL_ALL, vec![]);
        assert!(tile.collision(COLLISION_CHANNEL_ALL).is_empty());
    }

    #[test]
    fn pixels_pack_msb_first() {
        let mut tile = Tile::new(8, 2, 4, 2);
        tile.set_pixel(1, 0, 0, 0xA);
        tile.set_pixel(1, 1, 0, 0x3);
        tile.set_pixel(1, 7, 1, 0x1F);
        assert_eq!(tile.frame(1)[0], 0xA3);
        assert_eq!(tile.frame(1)[7], 0x0F);
        assert_eq!(tile.pixel(1, 0, 0), 0xA);
        assert_eq!(tile.pixel(1, 7, 1), 0xF);
        assert_eq!(tile.pixel(0, 0, 0), 0);
        assert_eq!(tile.pixel(1, 8, 0), 0);

        let mut wide = Tile::new(2, 1, 16, 1);
        wide.set_pixel(0, 1, 0, 0x1234);
        assert_eq!(wide.frame(0), &[0, 0, 0x12, 0x34]);
        assert_eq!(wide.pixel(0, 1, 0), 0x1234);
    }

    #[test]
    fn colors_resolve_through_offset() {
        let mut tile = Tile::new(8, 8, 2, 1);
        assert_eq!(tile.color_at(0, 0, 0), None);
        let colors = (0..8).map(|i| (i, i, i)).collect();
        tile.set_palette(Some(Arc::new(Palette::new("gray", colors))), 4);
        tile.set_pixel(0, 0, 0, 3);
        assert_eq!(tile.color_at(0, 0, 0), Some((7, 7, 7)));
        tile.set_palette(tile.palette().cloned(), 5);
        assert_eq!(tile.color_at(0, 0, 0), None);
    }
}
