use super::*;
use crate::foundation::core::Rgb8;

fn pattern(size: u32, f: impl Fn(u32, u32) -> u8) -> Raster {
    let mut px = Vec::new();
    for y in 0..size {
        for x in 0..size {
            let v = f(x, y);
            px.push(Rgb8::new(v, v, v));
        }
    }
    Raster::from_rgb(size, size, px).unwrap()
}

#[test]
fn flat_frame_has_no_texture() {
    let r = Raster::solid(64, 64, Rgb8::new(90, 90, 90)).unwrap();
    assert_eq!(texture_complexity(&r, 64), 0.0);
}

#[test]
fn checkerboard_beats_smooth_ramp() {
    let checker = pattern(64, |x, y| if (x + y) % 2 == 0 { 0 } else { 255 });
    let ramp = pattern(64, |x, _| (x * 4) as u8);
    let tc = texture_complexity(&checker, 64);
    let tr = texture_complexity(&ramp, 64);
    assert!(tc > 0.9, "{tc}");
    assert!(tr < 0.5, "{tr}");
    assert!((0.0..=1.0).contains(&tr));
}
