use super::*;

fn ramp() -> HeightField {
    // 3x2 samples, 1 unit apart, rising along +X
    HeightField::new(
        Vec2::ZERO,
        1.0,
        3,
        2,
        vec![
            0.0, 1.0, 2.0, // row 0 (z = 0)
            0.0, 1.0, 2.0, // row 1 (z = 1)
        ],
    )
    .unwrap()
}

#[test]
fn test_height_field_rejects_bad_dimensions() {
    assert!(HeightField::new(Vec2::ZERO, 1.0, 1, 2, vec![0.0, 0.0]).is_none());
    assert!(HeightField::new(Vec2::ZERO, 1.0, 2, 2, vec![0.0; 3]).is_none());
    assert!(HeightField::new(Vec2::ZERO, 0.0, 2, 2, vec![0.0; 4]).is_none());
    assert!(HeightField::new(Vec2::ZERO, f32::NAN, 2, 2, vec![0.0; 4]).is_none());
}

#[test]
fn test_height_field_interpolates_between_samples() {
    let field = ramp();
    assert_eq!(field.height_at(0.0, 0.0), Some(0.0));
    assert_eq!(field.height_at(2.0, 1.0), Some(2.0));

    let mid = field.height_at(0.5, 0.5).unwrap();
    assert!((mid - 0.5).abs() < 1e-6, "expected 0.5, got {mid}");

    let later = field.height_at(1.75, 0.25).unwrap();
    assert!((later - 1.75).abs() < 1e-6, "expected 1.75, got {later}");
}

#[test]
fn test_height_field_misses_outside_and_on_nan() {
    let field = ramp();
    assert_eq!(field.height_at(-0.01, 0.5), None);
    assert_eq!(field.height_at(2.01, 0.5), None);
    assert_eq!(field.height_at(1.0, 1.5), None);
    assert_eq!(field.height_at(f32::NAN, 0.5), None);
}

#[test]
fn test_terrain_returns_highest_surface() {
    let terrain = Terrain::new(vec![
        Surface::Plane { min: Vec2::splat(-10.0), max: Vec2::splat(10.0), height: 0.0 },
        Surface::Plane { min: Vec2::splat(-1.0), max: Vec2::splat(1.0), height: 2.5 },
        Surface::Field(ramp()),
    ]);

    // Only the ground plane here
    assert_eq!(terrain.height_at(-5.0, -5.0), Some(0.0));
    // Platform wins over ground and the low end of the ramp
    assert_eq!(terrain.height_at(0.5, 0.5), Some(2.5));
    // Ramp is the highest at its far end
    assert_eq!(terrain.height_at(2.0, 0.5), Some(2.0));
    // Nothing out here
    assert_eq!(terrain.height_at(50.0, 0.0), None);
}

#[test]
fn test_ground_height_falls_back_when_nothing_is_hit() {
    assert_eq!(ground_height(&NoTerrain, Vec2::ZERO, 0.0), 0.0);
    assert_eq!(ground_height(&NoTerrain, Vec2::ZERO, -3.0), -3.0);
    assert_eq!(ground_height(&FlatGround(1.25), Vec2::new(4.0, 4.0), 0.0), 1.25);
    assert_eq!(ground_height(&FlatGround(f32::NAN), Vec2::ZERO, 0.5), 0.5);
}
