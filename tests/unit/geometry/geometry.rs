use super::*;

fn geom() -> HighlightGeometry {
    HighlightGeometry {
        line_pitch_px: 371.0 / 11.0,
        vertical_padding_px: 14.0,
        corner_radius_px: 25.0,
    }
}

#[test]
fn sentinel_and_empty_ranges_draw_nothing() {
    let g = geom();
    assert_eq!(g.rect(-1, 0, 800, 20).unwrap(), None);
    assert_eq!(g.rect(0, 0, 800, 20).unwrap(), None);
    // The sentinel wins even when a count is present.
    assert_eq!(g.rect(-1, 3, 800, 20).unwrap(), None);
}

#[test]
fn rect_top_and_height_follow_line_pitch() {
    let g = geom();
    let r = g.rect(3, 2, 800, 20).unwrap().unwrap();
    let pitch = 371.0 / 11.0;
    assert!((r.top() - 3.0 * pitch).abs() < 1e-9);
    assert!((r.height() - (2.0 * pitch + 14.0)).abs() < 1e-9);
    assert_eq!(r.bounds.x0, 0.0);
    assert_eq!(r.width(), 800.0);
    assert_eq!(r.corner_radius, 25.0);
}

#[test]
fn pitch_does_not_depend_on_listing_length() {
    let g = geom();
    let short = g.rect(2, 1, 640, 3).unwrap().unwrap();
    let long = g.rect(2, 1, 640, 300).unwrap().unwrap();
    assert_eq!(short, long);
}

#[test]
fn out_of_range_bounds_are_geometry_errors() {
    let g = geom();
    for (line, count) in [(0, -1), (-1, -3), (-2, 1), (20, 1), (19, 2)] {
        let err = g.rect(line, count, 800, 20).unwrap_err();
        assert!(matches!(err, ReelError::Geometry(_)), "({line}, {count})");
    }
    assert!(g.rect(19, 1, 800, 20).unwrap().is_some());
}

#[test]
fn calibration_helpers() {
    let pitch = HighlightGeometry::from_reference_rows(371.0, 11).unwrap();
    assert!((pitch - geom().line_pitch_px).abs() < 1e-12);
    assert_eq!(HighlightGeometry::from_font_metrics(40.0, 2.0).unwrap(), 42.0);
    assert!(HighlightGeometry::from_reference_rows(371.0, 0).is_err());
    assert!(HighlightGeometry::from_font_metrics(0.0, 2.0).is_err());
}
