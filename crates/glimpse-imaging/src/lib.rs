use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

use glimpse_core::GlimpseError;

/// Neither output dimension may exceed this; smaller images are never upscaled.
const MAX_DIMENSION: u32 = 1200;

/// Deliberately aggressive: the model reads text fine at this quality and
/// the payload shrinks by an order of magnitude.
const JPEG_QUALITY: u8 = 25;

/// Downsize and re-encode a data-URI image to bound the transmitted payload.
///
/// Failures are non-fatal: on any decode or encode error the original input
/// is returned unchanged and the error is logged.
pub fn compress_data_uri(data_uri: &str) -> String {
    match try_compress(data_uri) {
        Ok(compressed) => {
            tracing::debug!(
                original_kb = data_uri.len() / 1024,
                compressed_kb = compressed.len() / 1024,
                "image compressed"
            );
            compressed
        }
        Err(error) => {
            tracing::warn!(%error, "image compression failed, using original");
            data_uri.to_string()
        }
    }
}

fn try_compress(data_uri: &str) -> Result<String, GlimpseError> {
    let payload = data_uri.rsplit(";base64,").next().unwrap_or(data_uri);
    let bytes = BASE64
        .decode(payload)
        .map_err(|e| GlimpseError::Imaging(format!("invalid base64 payload: {e}")))?;

    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| GlimpseError::Imaging(format!("unrecognized image data: {e}")))?;

    let resized = if decoded.width() > MAX_DIMENSION || decoded.height() > MAX_DIMENSION {
        decoded.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Triangle)
    } else {
        decoded
    };

    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    encoder
        .encode_image(&rgb)
        .map_err(|e| GlimpseError::Imaging(format!("jpeg encode failed: {e}")))?;

    Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(out)))
}
