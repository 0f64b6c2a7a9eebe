use std::path::Path;

use crate::config::merge::{MergeOptions, merge_layers, read_json};
use crate::fit::FitOptions;
use crate::foundation::core::{AspectRatio, Gravity, KeepAxis, Rgba8};
use crate::foundation::error::{AspectFitError, AspectFitResult};
use crate::io::encode::{DEFAULT_FORMAT, DEFAULT_JPEG_QUALITY, SaveOptions};

/// One layer of job settings, as read from JSON or built from CLI flags.
///
/// Every field is optional so layers can be stacked; [`JobConfig::resolve`]
/// applies defaults and validates the result.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    pub aspect: Option<AspectRatio>,
    pub keep: Option<KeepAxis>,
    pub crop_gravity: Option<Gravity>,
    pub pad_gravity: Option<Gravity>,
    pub pad_color: Option<Rgba8>,
    /// JPEG quality, 1..=100.
    pub quality: Option<u8>,
    /// Output extension for directory runs, e.g. `"jpg"` or `"png"`.
    pub format: Option<String>,
    pub recursive: Option<bool>,
    pub threads: Option<usize>,
}

/// Fully resolved settings for a run.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedJob {
    pub fit: FitOptions,
    pub save: SaveOptions,
    pub recursive: bool,
    pub threads: Option<usize>,
}

impl JobConfig {
    /// Deep-merge the JSON files at `paths` (later files win) into one layer.
    pub fn load<P: AsRef<Path>>(paths: &[P], merge: &MergeOptions) -> AspectFitResult<Self> {
        let layers = paths
            .iter()
            .map(read_json)
            .collect::<AspectFitResult<Vec<_>>>()?;
        let merged = merge_layers(layers, merge)?;
        if merged.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(merged)
            .map_err(|e| AspectFitError::config(format!("job config: {e}")))
    }

    /// Fields set in `top` replace the ones in `self`.
    pub fn overlay(self, top: Self) -> Self {
        Self {
            aspect: top.aspect.or(self.aspect),
            keep: top.keep.or(self.keep),
            crop_gravity: top.crop_gravity.or(self.crop_gravity),
            pad_gravity: top.pad_gravity.or(self.pad_gravity),
            pad_color: top.pad_color.or(self.pad_color),
            quality: top.quality.or(self.quality),
            format: top.format.or(self.format),
            recursive: top.recursive.or(self.recursive),
            threads: top.threads.or(self.threads),
        }
    }

    pub fn resolve(self) -> AspectFitResult<ResolvedJob> {
        let aspect = self.aspect.ok_or_else(|| {
            AspectFitError::invalid_argument("aspect ratio is required (e.g. \"16:9\")")
        })?;

        let quality = self.quality.unwrap_or(DEFAULT_JPEG_QUALITY);
        if !(1..=100).contains(&quality) {
            return Err(AspectFitError::invalid_argument(format!(
                "quality must be in 1..=100, got {quality}"
            )));
        }

        let format = self
            .format
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string())
            .trim_start_matches('.')
            .to_ascii_lowercase();
        if format.is_empty() {
            return Err(AspectFitError::invalid_argument("output format is empty"));
        }

        if self.threads == Some(0) {
            return Err(AspectFitError::invalid_argument(
                "threads must be >= 1 when set",
            ));
        }

        let fit = FitOptions::new(aspect)
            .keep(self.keep.unwrap_or_default())
            .crop_gravity(self.crop_gravity.unwrap_or_default())
            .pad_gravity(self.pad_gravity.unwrap_or_default())
            .pad_color(self.pad_color.unwrap_or_default());

        Ok(ResolvedJob {
            fit,
            save: SaveOptions {
                jpeg_quality: quality,
                format,
            },
            recursive: self.recursive.unwrap_or(false),
            threads: self.threads,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resolve_applies_defaults() {
        let job = JobConfig {
            aspect: Some("16:9".parse().unwrap()),
            ..JobConfig::default()
        }
        .resolve()
        .unwrap();

        assert_eq!(job.fit.keep, KeepAxis::Height);
        assert_eq!(job.fit.crop_gravity, Gravity::Center);
        assert_eq!(job.fit.pad_gravity, Gravity::Center);
        assert_eq!(job.fit.pad_color, Rgba8::transparent());
        assert_eq!(job.save.jpeg_quality, 95);
        assert_eq!(job.save.format, "jpg");
        assert!(!job.recursive);
    }

    #[test]
    fn resolve_requires_aspect_and_checks_ranges() {
        let err = JobConfig::default().resolve().unwrap_err();
        assert!(matches!(err, AspectFitError::InvalidArgument(_)));

        let base = JobConfig {
            aspect: Some("1:1".parse().unwrap()),
            ..JobConfig::default()
        };
        for bad in [
            JobConfig {
                quality: Some(0),
                ..base.clone()
            },
            JobConfig {
                quality: Some(101),
                ..base.clone()
            },
            JobConfig {
                threads: Some(0),
                ..base.clone()
            },
            JobConfig {
                format: Some(".".to_string()),
                ..base.clone()
            },
        ] {
            assert!(matches!(
                bad.resolve(),
                Err(AspectFitError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn overlay_prefers_top_layer() {
        let file = JobConfig {
            aspect: Some("4:5".parse().unwrap()),
            quality: Some(80),
            ..JobConfig::default()
        };
        let cli = JobConfig {
            quality: Some(70),
            format: Some(".PNG".to_string()),
            ..JobConfig::default()
        };
        let job = file.overlay(cli).resolve().unwrap();
        assert_eq!(job.fit.aspect.value(), 0.8);
        assert_eq!(job.save.jpeg_quality, 70);
        assert_eq!(job.save.format, "png");
    }

    #[test]
    fn deserializes_tokens_and_rejects_unknown_keys() {
        let cfg: JobConfig = serde_json::from_value(json!({
            "aspect": "3:2",
            "keep": "width",
            "crop_gravity": "Top",
            "pad_gravity": "right",
            "pad_color": "255,255,255",
        }))
        .unwrap();
        assert_eq!(cfg.keep, Some(KeepAxis::Width));
        assert_eq!(cfg.crop_gravity, Some(Gravity::Top));
        assert_eq!(cfg.pad_gravity, Some(Gravity::Right));
        assert_eq!(cfg.pad_color, Some(Rgba8::white()));

        assert!(serde_json::from_value::<JobConfig>(json!({"aspec": "1:1"})).is_err());
        assert!(serde_json::from_value::<JobConfig>(json!({"crop_gravity": "middle"})).is_err());
    }
}
