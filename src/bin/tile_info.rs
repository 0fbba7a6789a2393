use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use itertools::Itertools;
use tile_editor::{common::COLLISION_CHANNEL_ALL, persist, project::Project};

#[derive(Parser, Debug)]
struct Args {
    /// Project directory used to resolve palettes and channel names
    #[arg(long)]
    project: Option<PathBuf>,

    /// Tile documents to describe
    tiles: Vec<PathBuf>,
}

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let project = match &args.project {
        Some(dir) => persist::load_project(dir)?,
        None => Project::new(None),
    };

    for path in &args.tiles {
        let doc = persist::load_tile(&project, path)?;
        let tile = &doc.tile;
        println!("{}", path.display());
        println!(
            "  {}x{} @ {}bpp, {} frame(s), {} bytes/frame",
            tile.width(),
            tile.height(),
            tile.depth(),
            tile.frame_count(),
            tile.frame_size()
        );
        match tile.palette() {
            Some(pal) => println!("  palette {} (offset {})", pal.id, tile.palette_offset()),
            None => println!("  no palette"),
        }
        let collision = tile.collision(COLLISION_CHANNEL_ALL);
        if !collision.is_empty() {
            println!(
                "  collision: {}",
                collision
                    .iter()
                    .map(|r| format!("{},{} {}x{}", r.x, r.y, r.width, r.height))
                    .join("; ")
            );
        }
        for (channel, rects) in tile.collision_channels() {
            println!(
                "  channel {} ({}): {} region(s)",
                channel,
                project.channels.name(*channel).unwrap_or("unnamed"),
                rects.len()
            );
        }
    }
    Ok(())
}
