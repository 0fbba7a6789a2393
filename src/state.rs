use anyhow::{Context, Result};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    common::{Dimension, FrameIdx},
    record::TileRecord,
    tile::Tile,
};

#[derive(Serialize, Deserialize, Default)]
pub struct GlobalConfig {
    #[serde(skip_serializing, skip_deserializing)]
    pub modified: bool,
    pub project_dir: Option<PathBuf>,
}

// On-disk form of a tile document: the record plus the dimensions needed to
// read it back.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TileFile {
    pub width: Dimension,
    pub height: Dimension,
    pub depth: Dimension,
    pub frames: FrameIdx,
    #[serde(flatten)]
    pub record: TileRecord,
}

pub struct TileDocument {
    pub modified: bool,
    pub path: PathBuf,
    pub tile: Tile,
}

impl TileDocument {
    pub fn new(path: PathBuf, tile: Tile) -> Self {
        TileDocument {
            modified: true,
            path,
            tile,
        }
    }

    pub fn to_file(&self) -> TileFile {
        TileFile {
            width: self.tile.width(),
            height: self.tile.height(),
            depth: self.tile.depth(),
            frames: self.tile.frame_count(),
            record: self.tile.serialize(),
        }
    }
}

pub fn get_global_config_path() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("", "", "TileEditor")
        .context("Unable to open global config directory.")?;
    let config_dir = project_dirs.config_dir();
    let config_path = config_dir.join("config.json");
    Ok(config_path)
}
