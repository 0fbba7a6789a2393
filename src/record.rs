// Stored form of a tile. Dimensions are not part of the record; whoever
// stores tiles keeps track of width, height, depth and frame count.
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    common::{BoundingRect, ChannelId, Dimension, FrameIdx, PaletteOffset},
    helpers::{decode_hex, encode_hex},
    palette::PaletteLookup,
    tile::Tile,
};

#[derive(Serialize, Deserialize, Clone, Default, Debug, PartialEq)]
pub struct TileRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<PaletteOffset>,
    #[serde(default)]
    pub data: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collision: Vec<BoundingRect>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collision_channels: Vec<ChannelRecord>,
}

#[derive(Serialize, Deserialize, Clone, Default, Debug, PartialEq)]
pub struct ChannelRecord {
    #[serde(default)]
    pub channel: ChannelId,
    #[serde(default)]
    pub bounds: Vec<BoundingRect>,
}

impl Tile {
    pub fn serialize(&self) -> TileRecord {
        TileRecord {
            palette: self.palette.as_ref().map(|p| p.id.clone()),
            offset: self.palette.as_ref().map(|_| self.palette_offset),
            data: encode_hex(self.data()),
            collision: self.collision.clone(),
            collision_channels: self
                .collision_channels
                .iter()
                .map(|(&channel, bounds)| ChannelRecord {
                    channel,
                    bounds: bounds.clone(),
                })
                .collect(),
        }
    }

    /// Rebuilds a tile from its record. Returns `None` if the pixel data does
    /// not decode to exactly the size implied by the given dimensions.
    pub fn deserialize<P: PaletteLookup + ?Sized>(
        project: &P,
        record: &TileRecord,
        width: Dimension,
        height: Dimension,
        depth: Dimension,
        frames: FrameIdx,
    ) -> Option<Tile> {
        let mut tile = Tile::new(width, height, depth, frames);
        if let Some(id) = &record.palette {
            let palette = project.palette_by_id(id);
            if palette.is_none() {
                warn!("Tile refers to unknown palette {}", id);
            }
            tile.set_palette(palette, record.offset.unwrap_or(0));
        }

        if record.data.len() != tile.size() * 2 {
            warn!(
                "Tile data has {} hex digits, expected {}",
                record.data.len(),
                tile.size() * 2
            );
            return None;
        }
        let Some(data) = decode_hex(&record.data) else {
            warn!("Tile data is not a valid hex string");
            return None;
        };
        tile.data_mut().copy_from_slice(&data);

        tile.collision = record.collision.clone();
        for ch in &record.collision_channels {
            tile.set_collision(ch.channel, ch.bounds.clone());
        }
        Some(tile)
    }
}
