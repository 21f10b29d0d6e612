use std::{fs::File, io::BufReader, path::Path};

use crate::foundation::error::{SketchError, SketchResult};

/// Tuning knobs for [`crate::analyze_sketch`].
///
/// Field names are camelCase on the wire; missing fields fall back to the defaults
/// (`0.03 / 0.7 / 0.3`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SketchOptions {
    /// Feather radius as a fraction of the smaller canvas dimension.
    pub feather_amount: f64,
    /// Scales the structural confidence heuristic.
    pub structure_weight: f64,
    /// Scales per-region color guidance weights.
    pub color_weight: f64,
}

impl Default for SketchOptions {
    fn default() -> Self {
        Self {
            feather_amount: 0.03,
            structure_weight: 0.7,
            color_weight: 0.3,
        }
    }
}

impl SketchOptions {
    pub fn with_feather_amount(mut self, v: f64) -> Self {
        self.feather_amount = v;
        self
    }

    pub fn with_structure_weight(mut self, v: f64) -> Self {
        self.structure_weight = v;
        self
    }

    pub fn with_color_weight(mut self, v: f64) -> Self {
        self.color_weight = v;
        self
    }

    /// Reject NaN, infinite and negative values.
    pub fn validate(&self) -> SketchResult<()> {
        for (name, v) in [
            ("featherAmount", self.feather_amount),
            ("structureWeight", self.structure_weight),
            ("colorWeight", self.color_weight),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SketchError::validation(format!(
                    "{name} must be a finite value >= 0 (got {v})"
                )));
            }
        }
        Ok(())
    }

    pub fn from_reader(r: impl std::io::Read) -> SketchResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| SketchError::serde(format!("parse sketch options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_path(path: impl AsRef<Path>) -> SketchResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SketchError::validation(format!("open sketch options '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/options.rs"]
mod tests;
