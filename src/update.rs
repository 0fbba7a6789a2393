use anyhow::{Context, Result};
use log::{info, warn};

use crate::{
    common::{FrameIdx, COLLISION_CHANNEL_ALL},
    message::Message,
    palette::PaletteLookup,
    project::Project,
    state::TileDocument,
};

pub fn update(project: &Project, doc: &mut TileDocument, message: Message) -> Result<()> {
    let tile = &mut doc.tile;
    match message {
        Message::SetFrameCount(n) => {
            info!("Setting frame count {} -> {}", tile.frame_count(), n);
            tile.set_frame_count(n);
        }
        Message::CopyFrame { from, to } => {
            info!("Copying frame {} to {}", from, to);
            tile.copy_frame(from, to);
        }
        Message::SwapFrames { from, to } => {
            info!("Swapping frames {} and {}", from, to);
            tile.swap_frames(from, to);
        }
        Message::DuplicateFrame(frame) => {
            if tile.frame_count() == FrameIdx::MAX {
                warn!("Tile already has the maximum number of frames.");
                return Ok(());
            }
            info!("Duplicating frame {}", frame);
            tile.duplicate_frame(frame);
        }
        Message::RemoveFrame(frame) => {
            if tile.frame_count() == 1 {
                warn!("Cannot remove the only frame of a tile.");
                return Ok(());
            }
            if frame >= tile.frame_count() {
                warn!(
                    "Frame {} does not exist ({} frames).",
                    frame,
                    tile.frame_count()
                );
                return Ok(());
            }
            info!("Removing frame {}", frame);
            tile.remove_frame(frame);
        }
        Message::InsertFrameFromTile { frame, tile: src } => {
            if src.frame_size() != tile.frame_size() {
                warn!(
                    "Source tile is {}x{}x{}, expected {}x{}x{}; not inserting.",
                    src.width(),
                    src.height(),
                    src.depth(),
                    tile.width(),
                    tile.height(),
                    tile.depth()
                );
                return Ok(());
            }
            if tile.frame_count() == FrameIdx::MAX {
                warn!("Tile already has the maximum number of frames.");
                return Ok(());
            }
            info!("Inserting frame at {}", frame);
            tile.insert_frame_from_tile(frame, &src);
        }
        Message::SetPalette { palette_id, offset } => match palette_id {
            Some(id) => {
                let pal = project
                    .palette_by_id(&id)
                    .with_context(|| format!("Palette {} not found.", id))?;
                info!("Setting palette {} with offset {}", id, offset);
                tile.set_palette(Some(pal), offset);
            }
            None => {
                info!("Clearing palette");
                tile.set_palette(None, 0);
            }
        },
        Message::SetCollision { channel, collision } => {
            if channel == COLLISION_CHANNEL_ALL {
                info!("Setting {} default collision regions", collision.len());
            } else {
                let name = project.channels.name(channel).unwrap_or("unnamed");
                info!(
                    "Setting {} regions on channel {} ({})",
                    collision.len(),
                    channel,
                    name
                );
            }
            tile.set_collision(channel, collision);
        }
        Message::BrushPixel { frame, x, y, value } => {
            if x >= tile.width() || y >= tile.height() {
                warn!("Pixel ({}, {}) is outside the tile.", x, y);
                return Ok(());
            }
            tile.set_pixel(frame, x, y, value);
        }
    }
    doc.modified = true;
    Ok(())
}
