use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use json_pretty_compact::PrettyCompactFormatter;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Serializer;

use crate::{
    common::ChannelId,
    palette::Palette,
    project::Project,
    state::{GlobalConfig, TileDocument, TileFile},
    tile::Tile,
};

pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Saving {}", path.display());
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser)?;
    fs::create_dir_all(path.parent().context("invalid parent directory")?)?;
    fs::write(path, &data_bytes)?;
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = std::fs::read(path)?;
    let data: T = serde_json::from_slice(&data_bytes)?;
    Ok(data)
}

pub fn load_global_config(path: &Path) -> Result<GlobalConfig> {
    if !path.exists() {
        return Ok(GlobalConfig::default());
    }
    load_json(path)
}

pub fn save_global_config(path: &Path, config: &mut GlobalConfig) -> Result<()> {
    if config.modified {
        save_json(path, config)?;
        config.modified = false;
    }
    Ok(())
}

fn get_project_dir(project: &Project) -> Result<PathBuf> {
    Ok(project
        .dir
        .as_ref()
        .context("Project directory not set.")?
        .to_owned())
}

fn get_palette_dir(project: &Project) -> Result<PathBuf> {
    Ok(get_project_dir(project)?.join("Palettes"))
}

fn get_channels_path(project: &Project) -> Result<PathBuf> {
    Ok(get_project_dir(project)?.join("collision_channels.json"))
}

fn load_palettes(project: &mut Project) -> Result<()> {
    let pal_dir = get_palette_dir(project)?;
    let pattern = format!("{}/*.json", pal_dir.display());
    let mut palettes: Vec<Palette> = vec![];
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        let pal: Palette =
            load_json(&path).with_context(|| format!("reading {}", path.display()))?;
        palettes.push(pal);
    }
    palettes.sort_by(|x, y| x.id.cmp(&y.id));
    for pal in palettes {
        project.add_palette(pal);
    }
    Ok(())
}

// One entry of `collision_channels.json`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
struct ChannelName {
    channel: ChannelId,
    name: String,
}

pub fn save_palette(project: &Project, pal: &Palette) -> Result<()> {
    let pal_path = get_palette_dir(project)?.join(format!("{}.json", pal.id));
    save_json(&pal_path, pal)
}

fn load_channels(project: &mut Project) -> Result<()> {
    let path = get_channels_path(project)?;
    if !path.exists() {
        return Ok(());
    }
    let names: Vec<ChannelName> = load_json(&path)?;
    for ch in names {
        project.channels.register(ch.channel, &ch.name);
    }
    Ok(())
}

fn save_channels(project: &mut Project) -> Result<()> {
    if project.channels_modified {
        let path = get_channels_path(project)?;
        let names: Vec<ChannelName> = project
            .channels
            .names()
            .into_iter()
            .map(|(channel, name)| ChannelName { channel, name })
            .collect();
        save_json(&path, &names)?;
        project.channels_modified = false;
    }
    Ok(())
}

pub fn load_project(dir: &Path) -> Result<Project> {
    let mut project = Project::new(Some(dir.to_owned()));
    load_palettes(&mut project)?;
    load_channels(&mut project)?;
    info!(
        "Loaded {} palettes and {} collision channels",
        project.palettes.len(),
        project.channels.names().len()
    );
    Ok(project)
}

pub fn save_project(project: &mut Project) -> Result<()> {
    if project.dir.is_none() {
        return Ok(());
    }
    save_channels(project)?;
    Ok(())
}

pub fn load_tile(project: &Project, path: &Path) -> Result<TileDocument> {
    let file: TileFile = load_json(path)?;
    let tile = Tile::deserialize(
        project,
        &file.record,
        file.width,
        file.height,
        file.depth,
        file.frames,
    )
    .with_context(|| format!("Corrupt pixel data in {}", path.display()))?;
    Ok(TileDocument {
        modified: false,
        path: path.to_owned(),
        tile,
    })
}

pub fn save_tile(doc: &mut TileDocument) -> Result<()> {
    if doc.modified {
        save_json(&doc.path, &doc.to_file())?;
        doc.modified = false;
    }
    Ok(())
}
