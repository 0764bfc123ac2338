use bytes::Bytes;
use image::{
    ExtendedColorType, ImageEncoder as _, Rgb, RgbImage, RgbaImage,
    codecs::{jpeg::JpegEncoder, png::PngEncoder},
};
use thiserror::Error;

use crate::{Color, Encoding};

/// Pen used to stroke polylines.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineStyle {
    /// Line width in pixels.
    pub width: f32,
    pub color: Color,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: 2.0,
            color: Color::BLACK,
        }
    }
}

#[derive(Debug, Error)]
pub enum RasterizeError {
    /// The target canvas has no pixels.
    #[error("Cannot rasterize onto an empty {width}x{height} canvas")]
    EmptyCanvas { width: u32, height: u32 },
    /// Image encoding error.
    #[error(transparent)]
    Image(#[from] image::error::ImageError),
    /// Blocking task join error.
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
}

/// Renders polylines onto a `width` x `height` canvas filled with `background`.
///
/// Each polyline is drawn as straight segments between consecutive points with round
/// joins and caps. Polylines with fewer than two points are skipped, and anything
/// outside the canvas is clipped.
///
/// # Errors
///
/// * If the canvas has a zero dimension
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn render_polylines(
    width: u32,
    height: u32,
    polylines: &[Vec<[f32; 2]>],
    style: LineStyle,
    background: Color,
) -> Result<RgbaImage, RasterizeError> {
    if width == 0 || height == 0 {
        return Err(RasterizeError::EmptyCanvas { width, height });
    }

    // Coverage is accumulated with `max` so overlapping segments of the same
    // pen never darken beyond a single pass.
    let mut coverage = vec![0f32; width as usize * height as usize];
    let radius = style.width.max(0.0) / 2.0;

    for polyline in polylines.iter().filter(|x| x.len() >= 2) {
        for segment in polyline.windows(2) {
            stroke_segment(&mut coverage, width, height, segment[0], segment[1], radius);
        }
    }

    let mut image = RgbaImage::from_pixel(width, height, image::Rgba(background.to_array()));

    for (pixel, amount) in image.pixels_mut().zip(coverage) {
        if amount > 0.0 {
            pixel.0 = blend(style.color, Color::rgba(pixel[0], pixel[1], pixel[2], pixel[3]), amount)
                .to_array();
        }
    }

    Ok(image)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn stroke_segment(
    coverage: &mut [f32],
    width: u32,
    height: u32,
    a: [f32; 2],
    b: [f32; 2],
    radius: f32,
) {
    let reach = radius + 1.0;
    let min_x = (a[0].min(b[0]) - reach).floor().max(0.0);
    let min_y = (a[1].min(b[1]) - reach).floor().max(0.0);
    let max_x = (a[0].max(b[0]) + reach).ceil().min(width as f32 - 1.0);
    let max_y = (a[1].max(b[1]) + reach).ceil().min(height as f32 - 1.0);

    if min_x > max_x || min_y > max_y {
        return;
    }

    for y in (min_y as u32)..=(max_y as u32) {
        for x in (min_x as u32)..=(max_x as u32) {
            let center = [x as f32 + 0.5, y as f32 + 0.5];
            let amount = (radius + 0.5 - distance_to_segment(center, a, b)).clamp(0.0, 1.0);
            let cell = &mut coverage[(y * width + x) as usize];
            if amount > *cell {
                *cell = amount;
            }
        }
    }
}

fn distance_to_segment(p: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let ap = [p[0] - a[0], p[1] - a[1]];
    let length_squared = ab[0].mul_add(ab[0], ab[1] * ab[1]);

    let t = if length_squared == 0.0 {
        0.0
    } else {
        (ap[0].mul_add(ab[0], ap[1] * ab[1]) / length_squared).clamp(0.0, 1.0)
    };

    let closest = [t.mul_add(ab[0], a[0]), t.mul_add(ab[1], a[1])];
    (p[0] - closest[0]).hypot(p[1] - closest[1])
}

/// Source-over compositing of `fg` (scaled by `amount`) onto `bg`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend(fg: Color, bg: Color, amount: f32) -> Color {
    let src_a = f32::from(fg.a) / 255.0 * amount;
    let dst_a = f32::from(bg.a) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    if out_a <= 0.0 {
        return Color::TRANSPARENT;
    }

    let channel = |src: u8, dst: u8| {
        let value = f32::from(src)
            .mul_add(src_a, f32::from(dst) * dst_a * (1.0 - src_a))
            / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };

    Color::rgba(
        channel(fg.r, bg.r),
        channel(fg.g, bg.g),
        channel(fg.b, bg.b),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    )
}

/// Encodes a rendered canvas.
///
/// JPEG has no alpha channel, so translucent pixels are flattened onto white first.
///
/// # Errors
///
/// * If the image encoder fails to encode the image
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn encode(image: &RgbaImage, encoding: Encoding, quality: u8) -> Result<Bytes, RasterizeError> {
    let mut buffer = Vec::new();

    match encoding {
        Encoding::Png => {
            PngEncoder::new(&mut buffer).write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgba8,
            )?;
        }
        Encoding::Jpeg => {
            let flattened = RgbImage::from_fn(image.width(), image.height(), |x, y| {
                let pixel = image.get_pixel(x, y);
                let color = blend(
                    Color::rgb(pixel[0], pixel[1], pixel[2]),
                    Color::WHITE,
                    f32::from(pixel[3]) / 255.0,
                );
                Rgb([color.r, color.g, color.b])
            });
            let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            encoder.encode_image(&flattened)?;
        }
    }

    Ok(buffer.into())
}

/// Renders and encodes polylines in one step.
///
/// # Errors
///
/// * If the canvas has a zero dimension
/// * If the image encoder fails to encode the image
pub fn try_rasterize(
    width: u32,
    height: u32,
    polylines: &[Vec<[f32; 2]>],
    style: LineStyle,
    background: Color,
    encoding: Encoding,
    quality: u8,
) -> Result<Bytes, RasterizeError> {
    let image = render_polylines(width, height, polylines, style, background)?;
    let bytes = encode(&image, encoding, quality)?;

    log::debug!(
        "Rasterized {} polylines width={width} height={height} encoding={encoding} bytes={}",
        polylines.len(),
        bytes.len()
    );

    Ok(bytes)
}

/// Renders and encodes polylines on the blocking thread pool.
///
/// # Errors
///
/// * If the canvas has a zero dimension
/// * If the image encoder fails to encode the image
/// * If the `tokio` task fails to join
pub async fn try_rasterize_async(
    width: u32,
    height: u32,
    polylines: Vec<Vec<[f32; 2]>>,
    style: LineStyle,
    background: Color,
    encoding: Encoding,
    quality: u8,
) -> Result<Bytes, RasterizeError> {
    tokio::task::spawn_blocking(move || {
        try_rasterize(
            width, height, &polylines, style, background, encoding, quality,
        )
    })
    .await?
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn style(width: f32) -> LineStyle {
        LineStyle {
            width,
            color: Color::BLACK,
        }
    }

    #[test_log::test]
    fn horizontal_line_covers_pixels_along_its_path() {
        let image = render_polylines(
            20,
            10,
            &[vec![[2.0, 5.0], [18.0, 5.0]]],
            style(2.0),
            Color::WHITE,
        )
        .unwrap();

        assert_eq!(image.get_pixel(10, 4).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(10, 0).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(0, 5).0, [255, 255, 255, 255]);
    }

    #[test_log::test]
    fn single_point_polylines_are_not_drawn() {
        let image = render_polylines(
            8,
            8,
            &[vec![[4.0, 4.0]]],
            style(4.0),
            Color::TRANSPARENT,
        )
        .unwrap();

        assert!(image.pixels().all(|x| x.0 == [0, 0, 0, 0]));
    }

    #[test_log::test]
    fn points_outside_the_canvas_are_clipped() {
        let image = render_polylines(
            10,
            10,
            &[vec![[-50.0, 5.0], [50.0, 5.0]]],
            style(2.0),
            Color::TRANSPARENT,
        )
        .unwrap();

        assert_eq!(image.get_pixel(0, 4)[3], 255);
        assert_eq!(image.get_pixel(9, 4)[3], 255);
    }

    #[test_log::test]
    fn fully_offscreen_segments_leave_the_canvas_untouched() {
        let image = render_polylines(
            10,
            10,
            &[vec![[100.0, 100.0], [200.0, 150.0]]],
            style(2.0),
            Color::WHITE,
        )
        .unwrap();

        assert!(image.pixels().all(|x| x.0 == [255, 255, 255, 255]));
    }

    #[test_log::test]
    fn zero_sized_canvas_is_rejected() {
        let result = render_polylines(0, 10, &[], LineStyle::default(), Color::WHITE);
        assert!(matches!(
            result,
            Err(RasterizeError::EmptyCanvas {
                width: 0,
                height: 10
            })
        ));
    }

    #[test_log::test]
    fn png_output_has_png_signature() {
        let bytes = try_rasterize(
            16,
            16,
            &[vec![[1.0, 1.0], [15.0, 15.0]]],
            LineStyle::default(),
            Color::TRANSPARENT,
            Encoding::Png,
            90,
        )
        .unwrap();

        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test_log::test]
    fn jpeg_output_has_jpeg_marker() {
        let bytes = try_rasterize(
            16,
            16,
            &[vec![[1.0, 1.0], [15.0, 15.0]]],
            LineStyle::default(),
            Color::TRANSPARENT,
            Encoding::Jpeg,
            80,
        )
        .unwrap();

        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test_log::test]
    fn blend_over_transparent_keeps_source_color() {
        assert_eq!(
            blend(Color::rgb(10, 20, 30), Color::TRANSPARENT, 1.0),
            Color::rgb(10, 20, 30)
        );
        assert_eq!(blend(Color::BLACK, Color::TRANSPARENT, 0.0), Color::TRANSPARENT);
    }

    #[test_log::test(tokio::test)]
    async fn async_rasterize_runs_on_blocking_pool() {
        let bytes = try_rasterize_async(
            32,
            16,
            vec![vec![[0.0, 0.0], [32.0, 16.0]]],
            LineStyle::default(),
            Color::WHITE,
            Encoding::Png,
            90,
        )
        .await
        .unwrap();

        assert!(!bytes.is_empty());
    }
}
