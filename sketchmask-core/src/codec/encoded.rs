use std::{fmt, io::Cursor};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{ExtendedColorType, ImageEncoder};

use crate::foundation::{
    core::PixelBuffer,
    error::{SketchError, SketchResult},
};

/// Alpha-preserving lossless container formats the codec can emit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LosslessFormat {
    /// Lossless VP8L; the transport default.
    #[default]
    WebP,
    Png,
}

impl LosslessFormat {
    pub fn mime(self) -> &'static str {
        match self {
            Self::WebP => "image/webp",
            Self::Png => "image/png",
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/webp" => Some(Self::WebP),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// A self-describing `data:<mime>;base64,<payload>` string.
///
/// Consumers treat the value opaquely; the only client-side inspection is size measurement.
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
    }

    /// Accept a `data:image/...;base64,` URL.
    pub fn parse(s: impl Into<String>) -> SketchResult<Self> {
        let s = s.into();
        let trimmed = s.trim();
        let Some(rest) = trimmed.strip_prefix("data:") else {
            return Err(SketchError::validation("encoded image must be a data: URL"));
        };
        let Some((meta, _payload)) = rest.split_once(',') else {
            return Err(SketchError::validation("data URL is missing its payload separator"));
        };
        let Some(mime) = meta.strip_suffix(";base64") else {
            return Err(SketchError::validation("data URL must be base64 encoded"));
        };
        if !mime.starts_with("image/") {
            return Err(SketchError::validation(format!(
                "data URL must carry an image mime type (got '{mime}')"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn mime(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|r| r.split_once(';'))
            .map_or("", |(m, _)| m)
    }

    pub fn format(&self) -> Option<LosslessFormat> {
        LosslessFormat::from_mime(self.mime())
    }

    /// The base64 text after the first comma.
    pub fn payload(&self) -> &str {
        self.0.split_once(',').map_or("", |(_, p)| p)
    }

    pub fn decode_bytes(&self) -> SketchResult<Vec<u8>> {
        STANDARD
            .decode(self.payload())
            .map_err(|e| SketchError::validation(format!("invalid base64 payload: {e}")))
    }

    pub fn decode_pixels(&self) -> SketchResult<PixelBuffer> {
        PixelBuffer::decode(&self.decode_bytes()?)
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime", &self.mime())
            .field("payload_len", &self.payload().len())
            .finish()
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EncodedImage {
    type Error = SketchError;

    fn try_from(s: String) -> SketchResult<Self> {
        Self::parse(s)
    }
}

impl From<EncodedImage> for String {
    fn from(v: EncodedImage) -> Self {
        v.0
    }
}

/// Serialize pixels to lossless WebP.
pub fn encode_lossless(buffer: &PixelBuffer) -> SketchResult<EncodedImage> {
    encode_lossless_as(buffer, LosslessFormat::WebP)
}

#[tracing::instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn encode_lossless_as(
    buffer: &PixelBuffer,
    format: LosslessFormat,
) -> SketchResult<EncodedImage> {
    let mut bytes = Vec::new();
    let (w, h) = (buffer.width(), buffer.height());
    let res = match format {
        LosslessFormat::WebP => image::codecs::webp::WebPEncoder::new_lossless(Cursor::new(
            &mut bytes,
        ))
        .write_image(buffer.as_bytes(), w, h, ExtendedColorType::Rgba8),
        LosslessFormat::Png => image::codecs::png::PngEncoder::new_with_quality(
            Cursor::new(&mut bytes),
            image::codecs::png::CompressionType::Best,
            image::codecs::png::FilterType::Adaptive,
        )
        .write_image(buffer.as_bytes(), w, h, ExtendedColorType::Rgba8),
    };
    res.map_err(|e| SketchError::encoding(format!("{} encode failed: {e}", format.mime())))?;
    if bytes.is_empty() {
        return Err(SketchError::encoding(format!(
            "{} encoder produced no data",
            format.mime()
        )));
    }

    tracing::debug!(bytes = bytes.len(), mime = format.mime(), "encoded lossless image");
    Ok(EncodedImage::from_bytes(format.mime(), &bytes))
}

#[cfg(test)]
#[path = "../../tests/unit/codec/encoded.rs"]
mod tests;
