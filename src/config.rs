use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::verify::VerificationPolicy;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectorConfig {
    /// ONNXモデルのパス（未指定なら model_complexity から決定）
    #[serde(default)]
    pub model_path: Option<String>,
    /// 人物存在スコアの閾値
    #[serde(default = "default_min_detection_confidence")]
    pub min_detection_confidence: f32,
    /// 0: lite, 1: full, 2: heavy
    #[serde(default = "default_model_complexity")]
    pub model_complexity: u8,
    /// モデル入力サイズ（正方形）
    #[serde(default = "default_input_size")]
    pub input_size: u32,
}

fn default_min_detection_confidence() -> f32 { 0.9 }
fn default_model_complexity() -> u8 { 2 }
fn default_input_size() -> u32 { 256 }

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            min_detection_confidence: default_min_detection_confidence(),
            model_complexity: default_model_complexity(),
            input_size: default_input_size(),
        }
    }
}

impl DetectorConfig {
    /// 使用するモデルファイル
    pub fn resolved_model_path(&self) -> String {
        if let Some(path) = &self.model_path {
            return path.clone();
        }
        let variant = match self.model_complexity {
            0 => "lite",
            1 => "full",
            _ => "heavy",
        };
        format!("models/pose_landmark_{}.onnx", variant)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct VerificationConfig {
    /// 申告BMIと推定BMIの許容差
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_tolerance() -> f64 { 5.0 }

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
        }
    }
}

impl VerificationConfig {
    pub fn policy(&self) -> VerificationPolicy {
        VerificationPolicy::new(self.tolerance)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// 読めない・不正な場合は警告してデフォルトを使う
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{:#}; using default configuration", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let tolerance = self.verification.tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            bail!("verification.tolerance must be a finite non-negative number, got {}", tolerance);
        }
        let confidence = self.detector.min_detection_confidence;
        if !(0.0..=1.0).contains(&confidence) {
            bail!("detector.min_detection_confidence must be within [0, 1], got {}", confidence);
        }
        if self.detector.input_size == 0 {
            bail!("detector.input_size must be positive");
        }
        Ok(())
    }
}
