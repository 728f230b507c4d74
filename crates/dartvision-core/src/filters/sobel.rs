use image::{GrayImage, Luma};
use ndarray::{Array2, ArrayViewMut1, Axis};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::pipeline::config::EdgeRendering;

const KERNEL_X: [[f64; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const KERNEL_Y: [[f64; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// `sqrt(gx^2 + gy^2)` over the 3x3 neighbourhood centred on an interior pixel.
#[inline]
fn sobel_at(data: &Array2<f32>, row: usize, col: usize) -> f32 {
    let (mut gx, mut gy) = (0.0f64, 0.0f64);
    for (i, r) in (row - 1..=row + 1).enumerate() {
        for (j, c) in (col - 1..=col + 1).enumerate() {
            let v = data[[r, c]] as f64;
            gx += KERNEL_X[i][j] * v;
            gy += KERNEL_Y[i][j] * v;
        }
    }
    gx.hypot(gy) as f32
}

/// Sobel gradient magnitude, same shape as `data`.
///
/// Border pixels lack a full neighbourhood and stay at zero. Frames above
/// [`PARALLEL_PIXEL_THRESHOLD`] pixels are split across rows with rayon.
pub fn gradient_magnitude_array(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    let mut result = Array2::<f32>::zeros((h, w));

    if h < 3 || w < 3 {
        return result;
    }

    let fill_row = |row: usize, mut out: ArrayViewMut1<f32>| {
        if row == 0 || row == h - 1 {
            return;
        }
        for col in 1..w - 1 {
            out[col] = sobel_at(data, row, col);
        }
    };

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        result
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, out)| fill_row(row, out));
    } else {
        for (row, out) in result.axis_iter_mut(Axis(0)).enumerate() {
            fill_row(row, out);
        }
    }

    result
}

/// Render a gradient magnitude image as a white-on-black edge map.
///
/// Pixels at or below `threshold` are black. Above it, `Binary` writes full
/// white and `Proportional` writes `min(255, magnitude * gain)`.
pub fn edge_map(magnitude: &Array2<f32>, threshold: f32, rendering: &EdgeRendering) -> GrayImage {
    let (h, w) = magnitude.dim();
    let mut img = GrayImage::new(w as u32, h as u32);

    for ((row, col), &mag) in magnitude.indexed_iter() {
        if mag <= threshold {
            continue;
        }
        let val = match rendering {
            EdgeRendering::Binary => 255,
            EdgeRendering::Proportional { gain } => (mag * gain).min(255.0) as u8,
        };
        img.put_pixel(col as u32, row as u32, Luma([val]));
    }

    img
}
