use std::io::Cursor;

use image::{
    DynamicImage, Rgb, RgbImage,
    codecs::jpeg::JpegEncoder,
    imageops::{self, FilterType},
};

use crate::error::SamplerError;

const MAX_WIDTH: u32 = 1280;
const MAX_HEIGHT: u32 = 720;
const JPEG_QUALITY: u8 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub jpeg_quality: u8,
    pub background: [u8; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_width: MAX_WIDTH,
            max_height: MAX_HEIGHT,
            jpeg_quality: JPEG_QUALITY,
            background: [0, 0, 0],
        }
    }
}

/// A frame after downscaling, letterboxing and JPEG encoding.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Canvas is the source size capped to the bounding box; the picture is
/// scaled to fit it (never upscaled) and centered on the background.
pub fn render_frame(
    image: &DynamicImage,
    options: &RenderOptions,
) -> Result<RenderedFrame, SamplerError> {
    let rgb = image.to_rgb8();
    let (src_w, src_h) = rgb.dimensions();

    let canvas_w = src_w.min(options.max_width).max(1);
    let canvas_h = src_h.min(options.max_height).max(1);
    let (fit_w, fit_h) = fit_within(src_w, src_h, canvas_w, canvas_h);

    let mut canvas = RgbImage::from_pixel(canvas_w, canvas_h, Rgb(options.background));
    let x = (canvas_w - fit_w) / 2;
    let y = (canvas_h - fit_h) / 2;

    if (fit_w, fit_h) == (src_w, src_h) {
        imageops::overlay(&mut canvas, &rgb, x as i64, y as i64);
    } else {
        let scaled = imageops::resize(&rgb, fit_w, fit_h, FilterType::Triangle);
        imageops::overlay(&mut canvas, &scaled, x as i64, y as i64);
    }

    let mut jpeg = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, options.jpeg_quality);
    DynamicImage::ImageRgb8(canvas).write_with_encoder(encoder)?;

    Ok(RenderedFrame {
        jpeg: jpeg.into_inner(),
        width: canvas_w,
        height: canvas_h,
    })
}

/// Largest size with the source aspect ratio that fits in `max_w`×`max_h`.
fn fit_within(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if src_w == 0 || src_h == 0 {
        return (max_w, max_h);
    }
    let scale = (max_w as f64 / src_w as f64)
        .min(max_h as f64 / src_h as f64)
        .min(1.0);
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, max_w);
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, max_h);
    (w, h)
}
