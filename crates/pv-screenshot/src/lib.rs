//! Placeholder screenshot generator
//!
//! Produces a deterministic PNG "screenshot" for a URL: a colored header bar
//! and content blocks over a light background, with the palette seeded from a
//! hash of the URL so the same URL always renders the same image. This is a
//! stand-in artifact, not a real page capture.

use std::io::Cursor;

use base64::Engine as _;
use image::{ImageBuffer, ImageFormat, Rgb};
use sha2::{Digest, Sha256};

use pv_types::{AppError, AppResult};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 400;
const HEADER_HEIGHT: u32 = 56;

/// Render the placeholder for `url` and return it as a
/// `data:image/png;base64,` URI.
pub fn screenshot_data_uri(url: &str) -> AppResult<String> {
    let png = render_png(url)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
    Ok(format!("data:image/png;base64,{}", encoded))
}

fn render_png(url: &str) -> AppResult<Vec<u8>> {
    let digest = Sha256::digest(url.as_bytes());
    let header = Rgb([digest[0], digest[1], digest[2]]);
    let accent = Rgb([digest[3], digest[4], digest[5]]);
    let background = Rgb([245u8, 246, 248]);

    let image = ImageBuffer::from_fn(WIDTH, HEIGHT, |x, y| {
        if y < HEADER_HEIGHT {
            return header;
        }
        // Three rows of "content" blocks below the header.
        let row = (y - HEADER_HEIGHT) / 110;
        let in_block_y = (y - HEADER_HEIGHT) % 110 < 90;
        let in_block_x = (x / 200) < 3 && x % 200 < 180 && x > 10;
        if row < 3 && in_block_y && in_block_x {
            // Shade alternates per block column so the layout reads as cards.
            let column = x / 200;
            if (row + column) % 2 == 0 {
                accent
            } else {
                Rgb([
                    accent[0].saturating_add(40),
                    accent[1].saturating_add(40),
                    accent[2].saturating_add(40),
                ])
            }
        } else {
            background
        }
    });

    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| AppError::Internal(format!("Failed to encode screenshot: {}", e)))?;
    Ok(bytes)
}
