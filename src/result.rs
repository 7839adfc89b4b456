//! Result records handed back to the HTTP layer.

use serde::Serialize;

use crate::bmi::BmiCategory;
use crate::body::Orientation;
use crate::error::{ErrorKind, MeasurementError};

/// 画像ごとの向き（1枚なら `orientation`、2枚なら front/back）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OrientationReport {
    Single {
        orientation: Orientation,
    },
    Pair {
        orientation_front: Orientation,
        orientation_back: Orientation,
    },
}

/// 1リクエストの計測・照合結果。生成後は変更しない。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BmiResult {
    /// 申告値から計算（小数点以下2桁）
    pub declared_bmi: f64,
    /// ランドマークから推定（小数点以下2桁）
    pub visual_bmi: f64,
    pub input_height_cm: f64,
    pub input_weight_kg: f64,
    /// 小数点以下3桁
    pub visual_height_ratio: f64,
    /// 小数点以下3桁
    pub shoulder_width_ratio: f64,
    pub bmi_category: BmiCategory,
    #[serde(flatten)]
    pub orientation: OrientationReport,
    /// "Verification passed" または "Mismatch - BMI discrepancy (x.xx)"
    pub verification_result: String,
    /// 丸め前の |visual - declared|
    pub bmi_difference: f64,
    pub bmi_verified: bool,
}

/// 検証成功時に外部の状態APIへ通知する内容
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerificationEvent {
    pub user_id: i64,
    pub status: bool,
}

impl BmiResult {
    /// 検証成功時のみ通知イベントを返す。送信とリトライは呼び出し側の責務。
    pub fn verified_event(&self, user_id: i64) -> Option<VerificationEvent> {
        self.bmi_verified.then_some(VerificationEvent {
            user_id,
            status: true,
        })
    }
}

/// 境界で返すレコード: 結果か `{"error": ..., "kind": ...}` のどちらか
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BmiResponse {
    Measured(BmiResult),
    Rejected { error: String, kind: ErrorKind },
}

impl From<Result<BmiResult, MeasurementError>> for BmiResponse {
    fn from(result: Result<BmiResult, MeasurementError>) -> Self {
        match result {
            Ok(result) => BmiResponse::Measured(result),
            Err(e) => BmiResponse::Rejected {
                error: e.to_string(),
                kind: e.kind(),
            },
        }
    }
}
