//! Declared BMI and the landmark-based visual BMI heuristic.

use serde::Serialize;
use std::fmt;

use crate::error::{MeasurementError, Result};

/// 指定桁数に丸める
///
/// 2進表現の正確な値を十進で丸める（ちょうど中間なら偶数側）。
/// `(v * 100).round() / 100` だと 24.125 が 24.13 になるため、書式化して読み戻す。
pub fn round_to(value: f64, digits: usize) -> f64 {
    format!("{:.*}", digits, value).parse().unwrap_or(value)
}

/// 小数点以下2桁に丸める
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// 小数点以下3桁に丸める
pub fn round3(value: f64) -> f64 {
    round_to(value, 3)
}

/// ユーザー申告の身長・体重
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeclaredBody {
    pub height_cm: f64,
    pub weight_kg: f64,
}

impl DeclaredBody {
    /// 身長・体重が正の有限値であることを検証
    pub fn new(height_cm: f64, weight_kg: f64) -> Result<Self> {
        if !(height_cm.is_finite() && height_cm > 0.0) {
            return Err(MeasurementError::InvalidDeclaredInput(format!(
                "height must be a positive number of centimeters, got {}",
                height_cm
            )));
        }
        if !(weight_kg.is_finite() && weight_kg > 0.0) {
            return Err(MeasurementError::InvalidDeclaredInput(format!(
                "weight must be a positive number of kilograms, got {}",
                weight_kg
            )));
        }
        Ok(Self {
            height_cm,
            weight_kg,
        })
    }

    /// weight / (height_m)^2 を小数点以下2桁に丸めたもの
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        round2(self.weight_kg / (height_m * height_m))
    }
}

/// BMI 区分
///
/// 境界は申告 BMI（丸め後）に適用する。24.9 と 25 の間は Normal weight にも
/// Overweight にも属さず、最後の分岐の Obesity に落ちる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    Overweight,
    Obesity,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if (18.5..=24.9).contains(&bmi) {
            BmiCategory::NormalWeight
        } else if (25.0..29.9).contains(&bmi) {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obesity
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obesity => "Obesity",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// 比率→身長の経験的な線形近似。物理的な身長計測ではなく、較正もされていない。
const BASE_HEIGHT_M: f64 = 1.7;
const REFERENCE_BODY_RATIO: f64 = 2.0;
const HEIGHT_PER_BODY_RATIO: f64 = 0.2;
pub const MIN_ESTIMATED_HEIGHT_M: f64 = 1.4;
pub const MAX_ESTIMATED_HEIGHT_M: f64 = 2.1;

/// 見た目の体型から推定した BMI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualEstimate {
    /// 身長比率 / 肩幅比率
    pub body_ratio: f64,
    /// [1.4, 2.1] にクランプ済み
    pub estimated_height_m: f64,
    pub visual_bmi: f64,
}

/// 推定身長から BMI を求める（身長に対して単調減少）
pub fn bmi_for_height(weight_kg: f64, height_m: f64) -> f64 {
    weight_kg / (height_m * height_m)
}

/// 比率から身長を推定し、申告体重で BMI を出す
///
/// `height = 1.7 + (height_ratio / shoulder_ratio - 2) * 0.2`、[1.4, 2.1] にクランプ。
pub fn estimate_visual_bmi(
    weight_kg: f64,
    visual_height_ratio: f64,
    shoulder_width_ratio: f64,
) -> Result<VisualEstimate> {
    if !(visual_height_ratio > 0.0 && shoulder_width_ratio > 0.0) {
        return Err(MeasurementError::degenerate("Invalid visual measurements."));
    }

    let body_ratio = visual_height_ratio / shoulder_width_ratio;
    let estimated_height_m = (BASE_HEIGHT_M
        + (body_ratio - REFERENCE_BODY_RATIO) * HEIGHT_PER_BODY_RATIO)
        .clamp(MIN_ESTIMATED_HEIGHT_M, MAX_ESTIMATED_HEIGHT_M);

    Ok(VisualEstimate {
        body_ratio,
        estimated_height_m,
        visual_bmi: bmi_for_height(weight_kg, estimated_height_m),
    })
}
