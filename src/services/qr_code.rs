use std::path::Path;

use image::{GrayImage, ImageFormat, Luma, imageops};
use qrcode::{EcLevel, QrCode};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::UploadResult;

/// Quiet zone around the symbol, in modules.
const QUIET_ZONE_MODULES: u32 = 4;

/// Module scale used when the requested width cannot fit the symbol.
const FALLBACK_SCALE: u32 = 4;

const TEMP_PREFIX: &str = "s3-upload-action-qr";

/// Renders `payload` as a square grayscale QR code `width` pixels wide.
///
/// Modules are scaled by a whole number of pixels and the symbol is centred
/// on a white canvas. A width too small to hold the symbol at one pixel per
/// module falls back to a fixed scale, producing a larger image.
pub fn render_qr(payload: &str, width: u32) -> UploadResult<GrayImage> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)?;
    let modules = code.width() as u32 + QUIET_ZONE_MODULES * 2;

    let (scale, canvas) = if width >= modules {
        (width / modules, width)
    } else {
        warn!(
            "QR width {} is too small for {} modules, using scale {}",
            width, modules, FALLBACK_SCALE
        );
        (FALLBACK_SCALE, modules * FALLBACK_SCALE)
    };

    let symbol = code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .module_dimensions(scale, scale)
        .build();

    let mut image = GrayImage::from_pixel(canvas, canvas, Luma([255u8]));
    let offset = i64::from((canvas - symbol.width()) / 2);
    imageops::overlay(&mut image, &symbol, offset, offset);
    Ok(image)
}

/// Writes the QR code as PNG to `path`.
pub fn write_qr_png(path: &Path, payload: &str, width: u32) -> UploadResult<()> {
    let image = render_qr(payload, width)?;
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Renders the QR code into a fresh temporary PNG. The file is removed when
/// the returned handle is closed or dropped, whichever comes first.
pub fn create_qr_temp_file(payload: &str, width: u32) -> UploadResult<NamedTempFile> {
    let file = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".png")
        .tempfile()?;
    write_qr_png(file.path(), payload, width)?;
    Ok(file)
}
