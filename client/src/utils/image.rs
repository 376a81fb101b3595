use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageResult};

/// Upload pass: resize to this width (aspect preserved) and re-encode at
/// low quality to bound the JSON payload size.
pub const UPLOAD_TARGET_WIDTH: u32 = 600;
pub const UPLOAD_JPEG_QUALITY: u8 = 30;

pub const DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("captured image is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Shrinks the image so both dimensions fit the bounds; never upscales.
pub fn fit_within(image: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    if image.width() <= max_width && image.height() <= max_height {
        image
    } else {
        image.resize(max_width, max_height, FilterType::Triangle)
    }
}

/// Scales to an exact width, keeping the aspect ratio.
pub fn scale_to_width(image: DynamicImage, width: u32) -> DynamicImage {
    if image.width() == width {
        return image;
    }
    let height = ((u64::from(image.height()) * u64::from(width)) / u64::from(image.width()))
        .max(1) as u32;
    image.resize_exact(width, height, FilterType::Triangle)
}

pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> ImageResult<Vec<u8>> {
    // JPEG has no alpha channel; flatten first.
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)?;
    Ok(buffer.into_inner())
}

/// Second reduction pass over a captured photo, producing the inline
/// data URI carried in the submission payload.
pub fn transcode_to_data_uri(base64_jpeg: &str) -> Result<String, TranscodeError> {
    let bytes = STANDARD.decode(base64_jpeg)?;
    let image = image::load_from_memory(&bytes)?;
    let scaled = scale_to_width(image, UPLOAD_TARGET_WIDTH);
    let jpeg = encode_jpeg(&scaled, UPLOAD_JPEG_QUALITY)?;
    Ok(format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(jpeg)))
}
