use super::*;
use crate::geometry::HighlightGeometry;

fn small_cfg() -> ReelConfig {
    let mut cfg = ReelConfig::default();
    cfg.canvas.width = 64;
    cfg.canvas.height = 64;
    cfg
}

fn white_code(w: u32, h: u32) -> CodeImage {
    CodeImage::from_rgba8(w, h, vec![255u8; (w * h * 4) as usize]).unwrap()
}

fn px(frame: &FrameImage, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn geom() -> HighlightGeometry {
    HighlightGeometry {
        line_pitch_px: 5.0,
        vertical_padding_px: 2.0,
        corner_radius_px: 2.0,
    }
}

#[test]
fn code_image_is_centered_on_background() {
    let renderer = FrameRenderer::new(&small_cfg());
    let code = white_code(40, 20);
    assert_eq!(renderer.code_offset(&code), (12, 22));

    let frame = renderer.render(&code, None).unwrap();
    assert_eq!((frame.width, frame.height), (64, 64));
    assert_eq!(frame.data.len(), 64 * 64 * 4);
    assert_eq!(px(&frame, 0, 0), [31, 31, 31, 255]);
    assert_eq!(px(&frame, 63, 63), [31, 31, 31, 255]);
    let center = px(&frame, 32, 32);
    assert!(center.iter().all(|&c| c >= 254), "{center:?}");
}

#[test]
fn oversized_code_image_gets_negative_offset() {
    let renderer = FrameRenderer::new(&small_cfg());
    let code = white_code(81, 10);
    assert_eq!(renderer.code_offset(&code), (-9, 27));
}

#[test]
fn highlight_tints_only_its_rows() {
    let renderer = FrameRenderer::new(&small_cfg());
    let code = white_code(40, 20);
    let rect = geom().rect(1, 2, 40, 4).unwrap().unwrap();

    let plain = renderer.render(&code, None).unwrap();
    let lit = renderer.render(&code, Some(&rect)).unwrap();

    // Inside the rectangle: white tinted towards red.
    let inside = px(&lit, 32, 32);
    assert!(inside[0] >= 250, "{inside:?}");
    assert!(inside[1] < 245 && inside[1] > 200, "{inside:?}");
    assert_eq!(inside[3], 255);

    // Above the rectangle and on the background nothing changes.
    assert_eq!(px(&lit, 32, 23), px(&plain, 32, 23));
    assert_eq!(px(&lit, 2, 2), px(&plain, 2, 2));
}

#[test]
fn rendering_is_byte_identical_across_calls() {
    let renderer = FrameRenderer::new(&small_cfg());
    let code = white_code(40, 20);
    let rect = geom().rect(0, 3, 40, 4).unwrap().unwrap();

    let a = renderer.render(&code, Some(&rect)).unwrap();
    let b = renderer.render(&code, Some(&rect)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.encode_png().unwrap(), b.encode_png().unwrap());
}

#[test]
fn png_round_trips_through_image_crate() {
    let renderer = FrameRenderer::new(&small_cfg());
    let frame = renderer.render(&white_code(10, 10), None).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    frame.write_png(&path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (64, 64));
    assert_eq!(decoded.into_raw(), frame.data);
}
