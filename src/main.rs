use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use log::info;
use tile_editor::{
    common::{BoundingRect, ChannelId, FrameIdx, COLLISION_CHANNEL_ALL},
    message::Message,
    persist,
    project::Project,
    state::{self, TileDocument},
    tile::Tile,
    update::update,
};

#[derive(Parser, Debug)]
struct Args {
    /// Project directory (remembered for later runs)
    #[arg(long)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty tile document
    New {
        path: PathBuf,
        #[arg(long, default_value_t = 8)]
        width: u16,
        #[arg(long, default_value_t = 8)]
        height: u16,
        #[arg(long, default_value_t = 4)]
        depth: u16,
        #[arg(long, default_value_t = 1)]
        frames: FrameIdx,
    },
    /// Change the number of frames, zero-filling or truncating at the end
    SetFrames { path: PathBuf, count: FrameIdx },
    /// Overwrite frame `to` with frame `from`
    Copy {
        path: PathBuf,
        from: FrameIdx,
        to: FrameIdx,
    },
    /// Exchange two frames
    Swap {
        path: PathBuf,
        from: FrameIdx,
        to: FrameIdx,
    },
    /// Insert a copy of a frame right after it
    Duplicate { path: PathBuf, frame: FrameIdx },
    /// Delete a frame
    Remove { path: PathBuf, frame: FrameIdx },
    /// Write a single frame out as a new one-frame tile
    Extract {
        path: PathBuf,
        frame: FrameIdx,
        out: PathBuf,
    },
    /// Insert the first frame of another tile document
    Insert {
        path: PathBuf,
        frame: FrameIdx,
        source: PathBuf,
    },
    /// Bind a project palette, or clear it when no id is given
    SetPalette {
        path: PathBuf,
        palette: Option<String>,
        #[arg(long, default_value_t = 0)]
        offset: u8,
    },
    /// Replace collision regions ("x,y,w,h" each) of a channel, or the default collision
    SetCollision {
        path: PathBuf,
        #[arg(long)]
        channel: Option<ChannelId>,
        rects: Vec<String>,
    },
    /// Set one pixel's palette index
    SetPixel {
        path: PathBuf,
        frame: FrameIdx,
        x: u16,
        y: u16,
        value: u16,
    },
    /// Name a collision channel for the project
    RegisterChannel { id: ChannelId, name: String },
    /// List the project's collision channels
    Channels,
}

fn parse_rect(s: &str) -> Result<BoundingRect> {
    let parts: Vec<u16> = s
        .split(',')
        .map(|p| p.trim().parse::<u16>())
        .collect::<Result<_, _>>()
        .with_context(|| format!("invalid rectangle '{}'", s))?;
    ensure!(parts.len() == 4, "rectangle '{}' needs x,y,w,h", s);
    Ok(BoundingRect::new(parts[0], parts[1], parts[2], parts[3]))
}

fn ensure_new_file(path: &Path) -> Result<()> {
    ensure!(!path.exists(), "{} already exists", path.display());
    Ok(())
}

fn open_project(args_project: Option<PathBuf>) -> Result<Project> {
    let config_path = state::get_global_config_path()?;
    let mut config = persist::load_global_config(&config_path)?;
    if let Some(p) = args_project {
        if config.project_dir.as_ref() != Some(&p) {
            info!("Opening project at {}", p.display());
            config.project_dir = Some(p);
            config.modified = true;
            persist::save_global_config(&config_path, &mut config)?;
        }
    }
    match &config.project_dir {
        Some(dir) => persist::load_project(dir),
        None => bail!("Project directory not set; pass --project."),
    }
}

fn edit(project: &Project, path: &Path, message: Message) -> Result<()> {
    let mut doc = persist::load_tile(project, path)?;
    update(project, &mut doc, message)?;
    persist::save_tile(&mut doc)
}

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let mut project = open_project(args.project)?;

    match args.command {
        Command::New {
            path,
            width,
            height,
            depth,
            frames,
        } => {
            ensure!(frames >= 1, "a tile needs at least one frame");
            ensure_new_file(&path)?;
            let mut doc = TileDocument::new(path, Tile::new(width, height, depth, frames));
            persist::save_tile(&mut doc)?;
        }
        Command::SetFrames { path, count } => {
            ensure!(count >= 1, "a tile needs at least one frame");
            edit(&project, &path, Message::SetFrameCount(count))?;
        }
        Command::Copy { path, from, to } => {
            edit(&project, &path, Message::CopyFrame { from, to })?;
        }
        Command::Swap { path, from, to } => {
            edit(&project, &path, Message::SwapFrames { from, to })?;
        }
        Command::Duplicate { path, frame } => {
            edit(&project, &path, Message::DuplicateFrame(frame))?;
        }
        Command::Remove { path, frame } => {
            edit(&project, &path, Message::RemoveFrame(frame))?;
        }
        Command::Extract { path, frame, out } => {
            ensure_new_file(&out)?;
            let doc = persist::load_tile(&project, &path)?;
            let mut single = TileDocument::new(out, doc.tile.tile_for_single_frame(frame));
            persist::save_tile(&mut single)?;
        }
        Command::Insert {
            path,
            frame,
            source,
        } => {
            let src = persist::load_tile(&project, &source)?;
            edit(
                &project,
                &path,
                Message::InsertFrameFromTile {
                    frame,
                    tile: src.tile,
                },
            )?;
        }
        Command::SetPalette {
            path,
            palette,
            offset,
        } => {
            edit(
                &project,
                &path,
                Message::SetPalette {
                    palette_id: palette,
                    offset,
                },
            )?;
        }
        Command::SetCollision {
            path,
            channel,
            rects,
        } => {
            let collision = rects
                .iter()
                .map(|r| parse_rect(r))
                .collect::<Result<Vec<_>>>()?;
            let channel = channel.unwrap_or(COLLISION_CHANNEL_ALL);
            edit(&project, &path, Message::SetCollision { channel, collision })?;
        }
        Command::SetPixel {
            path,
            frame,
            x,
            y,
            value,
        } => {
            edit(&project, &path, Message::BrushPixel { frame, x, y, value })?;
        }
        Command::RegisterChannel { id, name } => {
            ensure!(id != COLLISION_CHANNEL_ALL, "channel {} is reserved", id);
            project.register_collision_channel(id, &name);
        }
        Command::Channels => {
            let names = project.channels.names();
            println!(
                "{}",
                names
                    .iter()
                    .map(|(id, name)| format!("{}: {}", id, name))
                    .join("\n")
            );
        }
    }
    persist::save_project(&mut project)?;
    Ok(())
}
