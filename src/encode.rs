//! Image encoding: raster -> PNG bytes -> self-contained data URI.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

use crate::error::ChartError;
use crate::render::RasterImage;

/// Serialize a raster to PNG bytes in memory.
pub fn png_bytes(raster: &RasterImage) -> Result<Vec<u8>, ChartError> {
    let rgb = RgbImage::from_raw(raster.width, raster.height, raster.pixels.clone())
        .ok_or_else(|| ChartError::Encode("raster buffer size mismatch".to_string()))?;
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(rgb)
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| ChartError::Encode(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// Produce an inline `data:image/png;base64,...` reference requiring no
/// external file.
pub fn png_data_uri(raster: &RasterImage) -> Result<String, ChartError> {
    let bytes = png_bytes(raster)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(bytes)))
}
