//! Avatar downscaling for outgoing messages.
//!
//! Profile photos arrive as `data:` URLs; anything else (a path or a hosted
//! URL) is passed through untouched.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops::FilterType, ImageFormat};

use crate::usecases::contracts::{AvatarThumbnailer, ThumbnailError};

const AVATAR_DECODE_FAILED: &str = "AVATAR_DECODE_FAILED";
const AVATAR_ENCODE_FAILED: &str = "AVATAR_ENCODE_FAILED";
const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageThumbnailer;

impl ImageThumbnailer {
    pub fn new() -> Self {
        Self
    }
}

impl AvatarThumbnailer for ImageThumbnailer {
    fn thumbnail(&self, avatar: &str, max_px: u32) -> Result<String, ThumbnailError> {
        let Some(encoded) = data_url_payload(avatar) else {
            return Ok(avatar.to_owned());
        };
        if max_px == 0 {
            return Ok(avatar.to_owned());
        }

        let bytes = STANDARD.decode(encoded.trim()).map_err(|error| {
            tracing::warn!(code = AVATAR_DECODE_FAILED, error = %error, "avatar is not valid base64");
            ThumbnailError::Decode
        })?;
        let decoded = image::load_from_memory(&bytes).map_err(|error| {
            tracing::warn!(code = AVATAR_DECODE_FAILED, error = %error, "avatar is not a readable image");
            ThumbnailError::Decode
        })?;

        let resized = if decoded.width() > max_px || decoded.height() > max_px {
            decoded.resize(max_px, max_px, FilterType::Triangle)
        } else {
            decoded
        };

        let mut png = Cursor::new(Vec::new());
        resized
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|error| {
                tracing::warn!(code = AVATAR_ENCODE_FAILED, error = %error, "avatar re-encode failed");
                ThumbnailError::Encode
            })?;

        Ok(format!(
            "{PNG_DATA_URL_PREFIX}{}",
            STANDARD.encode(png.into_inner())
        ))
    }
}

/// Returns the base64 payload of a `data:image/...;base64,` URL.
fn data_url_payload(avatar: &str) -> Option<&str> {
    let rest = avatar.strip_prefix("data:image/")?;
    let (header, payload) = rest.split_once(',')?;
    header.ends_with(";base64").then_some(payload)
}
