//! Geometry stages: aspect-preserving resize with centre crop, pixelization,
//! and rotation.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

/// Resize to a target box and/or percentage scale.
///
/// With only one of `width`/`height` set the other follows the source aspect
/// ratio. With both set the image is scaled to cover the box and then
/// centre-cropped, so the result fills `width` by `height` without
/// distortion. `scale` is a percentage applied after the box fit; fractional
/// result dimensions truncate. Zero values leave that part of the operation
/// out.
pub fn crop_resize(
    image: &DynamicImage,
    width: u32,
    height: u32,
    scale: u32,
    filter: FilterType,
) -> DynamicImage {
    let mut out = image.clone();

    if width > 0 || height > 0 {
        let (w, h) = (out.width(), out.height());
        let (mut new_w, mut new_h) = (width, height);

        if new_w > 0 && new_h == 0 {
            new_h = ((new_w as f64 / w as f64) * h as f64) as u32;
        } else if new_h > 0 && new_w == 0 {
            new_w = ((new_h as f64 / h as f64) * w as f64) as u32;
        } else {
            // Cover the target box, then crop the overhang evenly.
            let new_ratio = new_w as f64 / new_h as f64;
            let old_ratio = w as f64 / h as f64;
            if new_ratio > old_ratio {
                let cover_h = (new_w as f64 / old_ratio) as u32;
                out = out.resize_exact(new_w, cover_h, filter);
            } else {
                let cover_w = (new_h as f64 * old_ratio) as u32;
                out = out.resize_exact(cover_w, new_h, filter);
            }
            let left = out.width().saturating_sub(new_w) / 2;
            let top = out.height().saturating_sub(new_h) / 2;
            out = out.crop_imm(left, top, new_w, new_h);
        }

        out = out.resize_exact(new_w.max(1), new_h.max(1), filter);
    }

    if scale > 0 {
        let new_w = (out.width() as f64 * scale as f64 / 100.0) as u32;
        let new_h = (out.height() as f64 * scale as f64 / 100.0) as u32;
        out = out.resize_exact(new_w.max(1), new_h.max(1), filter);
    }

    out
}

/// Shrink to `size` pixels across and blow back up, producing hard blocks.
///
/// The intermediate height follows the aspect ratio. Both passes use nearest
/// neighbour so block edges stay crisp.
pub fn pixelize(image: &DynamicImage, size: u32) -> DynamicImage {
    if size == 0 {
        return image.clone();
    }

    let (w, h) = (image.width(), image.height());
    let small_h = ((size as f64 * h as f64 / w as f64) as u32).max(1);
    let small = image.resize_exact(size, small_h, FilterType::Nearest);
    small.resize_exact(w, h, FilterType::Nearest)
}

/// Rotate counter-clockwise by whole degrees.
///
/// Right-angle rotations (mod 360) are exact and lossless. Everything else
/// expands the canvas to hold the rotated bounds and fills the wedges with
/// transparent black.
pub fn rotate(image: &DynamicImage, degrees: i32) -> DynamicImage {
    match degrees.rem_euclid(360) {
        0 => image.clone(),
        90 => image.rotate270(),
        180 => image.rotate180(),
        270 => image.rotate90(),
        deg => rotate_arbitrary(image, f64::from(deg)),
    }
}

fn rotate_arbitrary(image: &DynamicImage, degrees: f64) -> DynamicImage {
    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    let theta = degrees.to_radians();
    let (sin, cos) = theta.sin_cos();
    let new_w = (w as f64 * cos.abs() + h as f64 * sin.abs()).ceil() as u32;
    let new_h = (w as f64 * sin.abs() + h as f64 * cos.abs()).ceil() as u32;

    // The staging canvas must hold both the source paste and the rotated
    // bounds; at steep angles the bounds are narrower than the source.
    let stage_w = new_w.max(w);
    let stage_h = new_h.max(h);
    let mut stage = RgbaImage::new(stage_w, stage_h);
    let dx = (stage_w - w) / 2;
    let dy = (stage_h - h) / 2;
    imageops::replace(&mut stage, &rgba, i64::from(dx), i64::from(dy));

    // rotate_about_center runs clockwise; negate for counter-clockwise.
    let rotated = rotate_about_center(
        &stage,
        -theta as f32,
        Interpolation::Nearest,
        Rgba([0, 0, 0, 0]),
    );

    let left = (stage_w - new_w) / 2;
    let top = (stage_h - new_h) / 2;
    DynamicImage::ImageRgba8(rotated).crop_imm(left, top, new_w, new_h)
}
