//! Tests for cell coordinates and scan order

use super::*;

fn region(x0: i32, z0: i32, x1: i32, z1: i32) -> Region {
    Region::from_corners(ChunkCoord::new(x0, z0), ChunkCoord::new(x1, z1))
}

#[test]
fn test_from_block_positive() {
    assert_eq!(ChunkCoord::from_block(0, 0), ChunkCoord::new(0, 0));
    assert_eq!(ChunkCoord::from_block(15, 16), ChunkCoord::new(0, 1));
    assert_eq!(ChunkCoord::from_block(1024, 47), ChunkCoord::new(64, 2));
}

#[test]
fn test_from_block_negative_floors() {
    assert_eq!(ChunkCoord::from_block(-1, -16), ChunkCoord::new(-1, -1));
    assert_eq!(ChunkCoord::from_block(-17, -15), ChunkCoord::new(-2, -1));
}

#[test]
fn test_from_corners_normalises() {
    let r = region(5, -3, -2, 7);
    assert_eq!(r.min(), ChunkCoord::new(-2, -3));
    assert_eq!(r.max(), ChunkCoord::new(5, 7));
    assert_eq!(r.width(), 8);
    assert_eq!(r.depth(), 11);
    assert_eq!(r.area(), Ok(88));
}

#[test]
fn test_contains() {
    let r = region(0, 0, 2, 1);
    assert!(r.contains(ChunkCoord::new(0, 0)));
    assert!(r.contains(ChunkCoord::new(2, 1)));
    assert!(!r.contains(ChunkCoord::new(3, 0)));
    assert!(!r.contains(ChunkCoord::new(0, -1)));
}

#[test]
fn test_cursor_row_major_order() {
    let cells: Vec<_> = region(0, 0, 2, 1).cursor().collect();
    assert_eq!(
        cells,
        vec![
            ChunkCoord::new(0, 0),
            ChunkCoord::new(0, 1),
            ChunkCoord::new(1, 0),
            ChunkCoord::new(1, 1),
            ChunkCoord::new(2, 0),
            ChunkCoord::new(2, 1),
        ]
    );
}

#[test]
fn test_cursor_matches_coord_ordering() {
    let cells: Vec<_> = region(-3, 4, 1, 9).cursor().collect();
    let mut sorted = cells.clone();
    sorted.sort();
    assert_eq!(cells, sorted);
    assert_eq!(cells.len() as u64, region(-3, 4, 1, 9).area().unwrap());
}

#[test]
fn test_cursor_single_cell() {
    let mut cursor = region(7, 7, 7, 7).cursor();
    assert_eq!(cursor.peek(), Some(ChunkCoord::new(7, 7)));
    assert_eq!(cursor.next(), Some(ChunkCoord::new(7, 7)));
    assert!(cursor.is_finished());
    assert_eq!(cursor.peek(), None);
    assert_eq!(cursor.next(), None);
}

#[test]
fn test_cursor_advance_after_finish_is_noop() {
    let mut cursor = region(0, 0, 0, 0).cursor();
    cursor.advance();
    let finished = cursor;
    cursor.advance();
    assert_eq!(cursor, finished);
}

#[test]
fn test_cursor_at_i32_edge_does_not_overflow() {
    let r = region(i32::MAX, i32::MAX - 1, i32::MAX, i32::MAX);
    let cells: Vec<_> = r.cursor().collect();
    assert_eq!(
        cells,
        vec![
            ChunkCoord::new(i32::MAX, i32::MAX - 1),
            ChunkCoord::new(i32::MAX, i32::MAX)
        ]
    );
}

#[test]
fn test_area_overflow_is_error() {
    let r = region(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
    assert!(matches!(r.area(), Err(CoordError::RegionTooLarge { .. })));
}

#[test]
fn test_display() {
    assert_eq!(ChunkCoord::new(-4, 9).to_string(), "(-4, 9)");
    assert_eq!(region(0, 0, 1, 2).to_string(), "[(0, 0) .. (1, 2)]");
}
