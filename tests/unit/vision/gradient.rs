use super::*;
use crate::foundation::core::Rgb8;

fn vertical_edge(w: u32, h: u32) -> Raster {
    let mut px = Vec::new();
    for _y in 0..h {
        for x in 0..w {
            px.push(if x < w / 2 {
                Rgb8::new(0, 0, 0)
            } else {
                Rgb8::new(255, 255, 255)
            });
        }
    }
    Raster::from_rgb(w, h, px).unwrap()
}

#[test]
fn solid_frame_has_no_edges() {
    let r = Raster::solid(16, 16, Rgb8::new(40, 200, 90)).unwrap();
    let g = GradientField::compute(&r);
    assert_eq!(g.edge_density(10.0), 0.0);
    assert!(g.orientation_histogram(8, 10.0).iter().all(|&v| v == 0.0));
    assert_eq!(laplacian_variance(&r), 0.0);
}

#[test]
fn vertical_edge_is_horizontal_gradient() {
    let g = GradientField::compute(&vertical_edge(16, 16));
    assert!(g.edge_density(100.0) > 0.0);
    let hist = g.orientation_histogram(4, 100.0);
    // Gradient points along +x, i.e. orientation ~0 degrees.
    assert!(hist[0] > 0.99, "{hist:?}");
    assert!((hist.iter().sum::<f64>() - 1.0).abs() < 1e-9);
}

#[test]
fn magnitude_never_exceeds_bound() {
    let g = GradientField::compute(&vertical_edge(8, 8));
    assert!(g.magnitude().iter().all(|&m| m <= MAX_SOBEL_MAGNITUDE));
}
