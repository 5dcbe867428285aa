use image::{Rgba, RgbaImage};
use tiler_codec::{decode, encode, import_matrix, load_matrix, save_matrix};
use tiler_core::{PlacementGrid, TileRegistry};

fn registry() -> TileRegistry {
    let mut registry = TileRegistry::new();
    for (i, name) in ["grass.png", "water.png", "wall.png"].iter().enumerate() {
        registry.insert(*name, RgbaImage::from_pixel(16, 16, Rgba([i as u8 * 80, 0, 0, 255])));
    }
    registry
}

#[test]
fn matrix_roundtrip() {
    let mut registry = registry();
    let grass = registry.find_by_name("grass.png").unwrap();
    let water = registry.find_by_name("water.png").unwrap();
    let wall = registry.find_by_name("wall.png").unwrap();
    registry.set_solid(water, false);

    let mut grid = PlacementGrid::new();
    grid.resize(6, 9).unwrap();
    grid.set_brush_area(3);
    let p = grid.transform().cell_center_to_device(1, 1);
    grid.place(p.x, p.y, grass, true);
    grid.place_cell(8, 5, water, 1, true);
    grid.place_cell(0, 0, wall, 1, true);
    grid.place_cell(2, 2, wall, 1, true);

    let text = encode(&grid, &registry);
    let decoded = decode(&text).unwrap();
    assert_eq!((decoded.rows, decoded.cols), (6, 9));

    let mut restored = PlacementGrid::new();
    import_matrix(&decoded, &mut restored, &mut registry).unwrap();

    assert_eq!((restored.rows(), restored.cols()), (grid.rows(), grid.cols()));
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            assert_eq!(restored.entry_at(col, row), grid.entry_at(col, row));
        }
    }
    assert!(!registry.get(water).unwrap().solid);
    assert!(registry.get(wall).unwrap().solid);

    // Encoding the restored grid gives the same text back.
    assert_eq!(encode(&restored, &registry), text);
}

#[test]
fn matrix_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("maps/level.txt");

    let mut registry = registry();
    let wall = registry.find_by_name("wall.png").unwrap();
    let mut grid = PlacementGrid::new();
    grid.place_cell(3, 4, wall, 2, true);

    save_matrix(&path, &grid, &registry).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 16);
    assert!(text.ends_with('\n'));

    let decoded = load_matrix(&path).unwrap();
    let mut restored = PlacementGrid::new();
    let summary = import_matrix(&decoded, &mut restored, &mut registry).unwrap();
    assert_eq!(summary.placed, 4);
    assert_eq!(restored.entry_at(4, 5), Some(wall));
}

#[test]
fn matrix_load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_matrix(dir.path().join("nope.txt")).is_err());
}
