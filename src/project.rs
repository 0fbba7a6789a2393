use std::{path::PathBuf, sync::Arc};

use hashbrown::HashMap;
use log::info;

use crate::{
    collision::CollisionChannelRegistry,
    common::ChannelId,
    palette::{Palette, PaletteLookup, PaletteRef},
};

// Project-wide data that tiles refer to: the palette table and the names of
// the collision channels.
#[derive(Default)]
pub struct Project {
    pub dir: Option<PathBuf>,
    pub palettes: Vec<PaletteRef>,
    pub palettes_id_idx_map: HashMap<String, usize>,
    pub channels: CollisionChannelRegistry,
    pub channels_modified: bool,
}

impl Project {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Project {
            dir,
            ..Default::default()
        }
    }

    /// Adds a palette, replacing any existing palette with the same id.
    /// Tiles already holding the old palette keep it until they are rebound.
    pub fn add_palette(&mut self, palette: Palette) -> PaletteRef {
        let pal = Arc::new(palette);
        match self.palettes_id_idx_map.get(&pal.id) {
            Some(&idx) => {
                info!("Replacing palette {}", pal.id);
                self.palettes[idx] = pal.clone();
            }
            None => {
                self.palettes_id_idx_map
                    .insert(pal.id.clone(), self.palettes.len());
                self.palettes.push(pal.clone());
            }
        }
        pal
    }

    pub fn register_collision_channel(&mut self, id: ChannelId, name: &str) {
        self.channels.register(id, name);
        self.channels_modified = true;
    }
}

impl PaletteLookup for Project {
    fn palette_by_id(&self, id: &str) -> Option<PaletteRef> {
        let &idx = self.palettes_id_idx_map.get(id)?;
        Some(self.palettes[idx].clone())
    }
}
