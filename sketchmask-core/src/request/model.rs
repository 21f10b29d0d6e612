use std::{fmt, str::FromStr};

use crate::{
    analysis::analyzer::SketchAnalysis,
    codec::{
        encoded::EncodedImage,
        limits::{MAX_ENCODED_BYTES, estimated_decoded_size, exceeds_limit},
    },
    foundation::error::{SketchError, SketchResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    #[default]
    Generate,
    Edit,
}

impl GenerationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Edit => "edit",
        }
    }
}

impl FromStr for GenerationMode {
    type Err = SketchError;

    fn from_str(s: &str) -> SketchResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generate" => Ok(Self::Generate),
            "edit" => Ok(Self::Edit),
            other => Err(SketchError::validation(format!(
                "unknown mode '{other}' (expected generate | edit)"
            ))),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output aspect ratios accepted by the generation endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "21:9")]
    Cinematic,
    #[serde(rename = "4:3")]
    Standard,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        Self::Square,
        Self::Landscape,
        Self::Portrait,
        Self::Cinematic,
        Self::Standard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Cinematic => "21:9",
            Self::Standard => "4:3",
        }
    }

    /// Width over height.
    pub fn ratio(self) -> f64 {
        match self {
            Self::Square => 1.0,
            Self::Landscape => 16.0 / 9.0,
            Self::Portrait => 9.0 / 16.0,
            Self::Cinematic => 21.0 / 9.0,
            Self::Standard => 4.0 / 3.0,
        }
    }
}

impl FromStr for AspectRatio {
    type Err = SketchError;

    fn from_str(s: &str) -> SketchResult<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| {
                SketchError::validation(format!(
                    "unsupported aspect ratio '{s}' (expected one of 1:1, 16:9, 9:16, 21:9, 4:3)"
                ))
            })
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_structural_weight() -> f64 {
    0.7
}

fn default_color_weight() -> f64 {
    0.3
}

fn default_feather_amount() -> f64 {
    0.03
}

/// JSON body sent to the generation proxy.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub mode: GenerationMode,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_image: Option<EncodedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_image: Option<EncodedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sketch_analysis: Option<SketchAnalysis>,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default = "default_structural_weight")]
    pub structural_weight: f64,
    #[serde(default = "default_color_weight")]
    pub color_weight: f64,
    #[serde(default = "default_feather_amount")]
    pub feather_amount: f64,
    #[serde(default, rename = "generateGoT")]
    pub generate_got: bool,
}

impl GenerationRequest {
    pub fn generate(prompt: impl Into<String>) -> Self {
        Self {
            mode: GenerationMode::Generate,
            prompt: prompt.into(),
            base_image: None,
            mask_image: None,
            sketch_analysis: None,
            aspect_ratio: AspectRatio::default(),
            structural_weight: default_structural_weight(),
            color_weight: default_color_weight(),
            feather_amount: default_feather_amount(),
            generate_got: false,
        }
    }

    pub fn edit(prompt: impl Into<String>, base: EncodedImage, mask: EncodedImage) -> Self {
        Self {
            mode: GenerationMode::Edit,
            base_image: Some(base),
            mask_image: Some(mask),
            ..Self::generate(prompt)
        }
    }

    /// A plan-only request: the endpoint answers with a textual execution plan, no pixels.
    pub fn got_preview(mode: GenerationMode, prompt: impl Into<String>) -> Self {
        Self {
            mode,
            generate_got: true,
            ..Self::generate(prompt)
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_weights(mut self, structural: f64, color: f64, feather: f64) -> Self {
        self.structural_weight = structural;
        self.color_weight = color;
        self.feather_amount = feather;
        self
    }

    pub fn with_sketch(mut self, analysis: SketchAnalysis) -> Self {
        self.sketch_analysis = Some(analysis);
        self
    }

    /// Every encoded image riding on this request, labelled for error messages.
    pub fn attachments(&self) -> Vec<(&'static str, &EncodedImage)> {
        let mut out = Vec::new();
        if let Some(img) = &self.base_image {
            out.push(("base image", img));
        }
        if let Some(img) = &self.mask_image {
            out.push(("mask", img));
        }
        if let Some(sketch) = &self.sketch_analysis {
            out.push(("sketch mask", &sketch.binary_mask));
        }
        out
    }

    /// Client-side preflight; a request that fails here must not be sent.
    pub fn validate(&self) -> SketchResult<()> {
        if self.prompt.trim().is_empty() {
            return Err(SketchError::validation("prompt is required"));
        }
        for (name, v) in [
            ("structuralWeight", self.structural_weight),
            ("colorWeight", self.color_weight),
            ("featherAmount", self.feather_amount),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SketchError::validation(format!(
                    "{name} must be a finite value >= 0 (got {v})"
                )));
            }
        }
        if self.mode == GenerationMode::Generate
            && (self.base_image.is_some() || self.mask_image.is_some())
        {
            return Err(SketchError::validation(
                "base and mask images are only sent in edit mode",
            ));
        }
        if self.mode == GenerationMode::Edit && !self.generate_got {
            if self.base_image.is_none() {
                return Err(SketchError::validation("edit mode requires a base image"));
            }
            if self.mask_image.is_none() {
                return Err(SketchError::empty_selection(
                    "edit mode requires a mask; select an area to edit",
                ));
            }
        }
        for (label, img) in self.attachments() {
            ensure_within_limit(label, img)?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> SketchResult<String> {
        serde_json::to_string(self)
            .map_err(|e| SketchError::serde(format!("serialize generation request: {e}")))
    }

    pub fn from_json(s: &str) -> SketchResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| SketchError::serde(format!("parse generation request: {e}")))
    }
}

/// Turn the boolean size check into a caller-facing rejection.
pub fn ensure_within_limit(label: &str, image: &EncodedImage) -> SketchResult<()> {
    if exceeds_limit(image) {
        return Err(SketchError::SizeLimitExceeded {
            label: label.to_string(),
            bytes: estimated_decoded_size(image.as_str()),
            limit: MAX_ENCODED_BYTES,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/request/model.rs"]
mod tests;
