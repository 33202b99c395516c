use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(w, h, image::Rgb(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_downscales_longest_side() {
    let bytes = png_bytes(400, 200, [10, 20, 30]);
    let r = decode_raster(&bytes, 100).unwrap();
    assert_eq!(r.width(), 100);
    assert_eq!(r.height(), 50);
    assert_eq!(r.pixels()[0], Rgb8::new(10, 20, 30));
}

#[test]
fn small_images_keep_their_size() {
    let bytes = png_bytes(16, 12, [0, 0, 0]);
    let r = decode_raster(&bytes, 256).unwrap();
    assert_eq!((r.width(), r.height()), (16, 12));
}

#[test]
fn corrupt_bytes_are_input_errors() {
    let err = decode_raster(b"definitely not an image", 64).unwrap_err();
    assert!(matches!(err, SegueError::Input(_)));
}

#[test]
fn missing_file_is_input_error() {
    let err = load_raster(Path::new("/nonexistent/segue/shot.png"), 64).unwrap_err();
    assert!(err.is_per_unit());
}

#[test]
fn solid_raster_has_flat_luma() {
    let r = Raster::solid(8, 8, Rgb8::new(255, 0, 0)).unwrap();
    assert_eq!(r.luma_std(), 0.0);
    assert!((r.mean_luma() - 76.245).abs() < 0.01);
}

#[test]
fn from_rgb_rejects_bad_lengths() {
    assert!(Raster::from_rgb(2, 2, vec![Rgb8::default(); 3]).is_err());
    assert!(Raster::from_rgb(0, 2, vec![]).is_err());
}
