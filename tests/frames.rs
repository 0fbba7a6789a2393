use tile_editor::tile::Tile;

// Gives every byte of the tile a distinct value so frame moves are visible.
fn patterned(width: u16, height: u16, depth: u16, frames: u16) -> Tile {
    let mut tile = Tile::new(width, height, depth, frames);
    for f in 0..frames {
        for (i, b) in tile.frame_mut(f).iter_mut().enumerate() {
            *b = (f as usize * 31 + i) as u8;
        }
    }
    tile
}

fn frames_of(tile: &Tile) -> Vec<Vec<u8>> {
    (0..tile.frame_count()).map(|f| tile.frame(f).to_vec()).collect()
}

#[test]
fn test_buffer_size_formula() {
    let shapes = [
        (8, 8, 4, 2),
        (7, 3, 1, 1),
        (5, 5, 3, 4),
        (16, 16, 8, 3),
        (3, 2, 16, 2),
    ];
    for &(w, h, d, n) in &shapes {
        let tile = Tile::new(w, h, d, n);
        let pitch = (w as usize * d as usize).div_ceil(8);
        assert_eq!(tile.pitch(), pitch);
        assert_eq!(tile.size(), pitch * h as usize * n as usize);
        assert_eq!(tile.data().len(), tile.size());
        assert!(tile.data().iter().all(|&b| b == 0));
    }
}

#[test]
fn test_grow_then_shrink() {
    let mut tile = patterned(8, 8, 4, 3);
    let before = frames_of(&tile);
    tile.set_frame_count(5);
    let grown = frames_of(&tile);
    assert_eq!(&grown[..3], &before[..]);
    assert!(grown[3..].iter().flatten().all(|&b| b == 0));
    tile.set_frame_count(2);
    assert_eq!(frames_of(&tile), before[..2].to_vec());
    assert_eq!(tile.size(), 2 * tile.frame_size());
}

#[test]
fn test_duplicate_shifts_trailing_frames() {
    let mut tile = patterned(8, 8, 4, 4);
    let before = frames_of(&tile);
    tile.duplicate_frame(1);
    let after = frames_of(&tile);
    assert_eq!(after.len(), 5);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], before[1]);
    assert_eq!(after[2], before[1]);
    assert_eq!(&after[3..], &before[2..]);
}

#[test]
fn test_remove_drops_exactly_one_frame() {
    let mut tile = patterned(8, 8, 2, 4);
    let mut expected = frames_of(&tile);
    tile.remove_frame(2);
    expected.remove(2);
    assert_eq!(frames_of(&tile), expected);

    let mut single = patterned(8, 8, 2, 1);
    let before = frames_of(&single);
    single.remove_frame(0);
    assert_eq!(frames_of(&single), before);
}

#[test]
fn test_swap_is_an_involution() {
    let mut tile = patterned(4, 4, 8, 3);
    let before = frames_of(&tile);
    tile.swap_frames(0, 1);
    assert_ne!(frames_of(&tile), before);
    tile.swap_frames(0, 1);
    assert_eq!(frames_of(&tile), before);
}

#[test]
fn test_out_of_range_indices_clamp() {
    let mut tile = patterned(4, 4, 8, 3);
    let before = frames_of(&tile);
    tile.copy_frame(0, 99);
    let after = frames_of(&tile);
    assert_eq!(after[2], before[0]);
    assert_eq!(tile.frame(1000), tile.frame(2));
    assert_eq!(tile.tile_for_single_frame(50).frame(0), tile.frame(2));
}

#[test]
fn test_extract_then_insert() {
    let mut tile = patterned(8, 8, 4, 3);
    let before = frames_of(&tile);
    let single = tile.tile_for_single_frame(0);
    tile.insert_frame_from_tile(tile.frame_count(), &single);
    let after = frames_of(&tile);
    assert_eq!(after.len(), 4);
    assert_eq!(&after[..3], &before[..]);
    assert_eq!(after[3], before[0]);
}
