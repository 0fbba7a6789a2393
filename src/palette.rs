use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::common::ColorRGB;

#[derive(Serialize, Deserialize, Clone, Default, Debug, PartialEq)]
pub struct Palette {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub colors: Vec<ColorRGB>,
}

// Tiles hold palettes through a shared handle and never mutate them.
pub type PaletteRef = Arc<Palette>;

impl Palette {
    pub fn new(id: &str, colors: Vec<ColorRGB>) -> Self {
        Palette {
            id: id.to_string(),
            name: id.to_string(),
            colors,
        }
    }

    pub fn color(&self, idx: usize) -> Option<ColorRGB> {
        self.colors.get(idx).copied()
    }
}

/// Resolves palette identifiers found in stored tile records.
pub trait PaletteLookup {
    fn palette_by_id(&self, id: &str) -> Option<PaletteRef>;
}
