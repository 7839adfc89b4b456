//! Single-image and front/back measurement pipelines.
//!
//! Per request: declared input check → detection → full-body gate →
//! ratio extraction → visual BMI → verification. Every rejection is terminal;
//! nothing is retried here.

use log::{debug, info, warn};

use crate::bmi::{estimate_visual_bmi, round2, round3, BmiCategory, DeclaredBody};
use crate::body::{check_full_body, extract_ratios, BodyRatios, MeanRatios};
use crate::config::Config;
use crate::error::{MeasurementError, Result};
use crate::pose::{LandmarkDetector, Pose};
use crate::result::{BmiResult, OrientationReport};
use crate::verify::VerificationPolicy;

/// 1枚入力時のラベル
pub const SINGLE_VIEW: &str = "uploaded";
pub const FRONT_VIEW: &str = "front";
pub const BACK_VIEW: &str = "back";

/// ゲート → 比率抽出
pub fn measure_pose(pose: &Pose, view: &str) -> Result<BodyRatios> {
    check_full_body(pose, view)?;
    let ratios = extract_ratios(pose, view)?;
    debug!(
        "[{}] orientation={} height_ratio={:.3} shoulder_ratio={:.3}",
        view, ratios.orientation, ratios.visual_height_ratio, ratios.shoulder_width_ratio
    );
    Ok(ratios)
}

/// 比率と申告値から BMI を推定して照合
pub fn score(
    ratios: MeanRatios,
    declared: DeclaredBody,
    orientation: OrientationReport,
    policy: &VerificationPolicy,
) -> Result<BmiResult> {
    let declared_bmi = declared.bmi();
    let bmi_category = BmiCategory::from_bmi(declared_bmi);

    let estimate = estimate_visual_bmi(
        declared.weight_kg,
        ratios.visual_height_ratio,
        ratios.shoulder_width_ratio,
    )?;
    let verification = policy.verify(declared_bmi, estimate.visual_bmi);

    let result = BmiResult {
        declared_bmi,
        visual_bmi: round2(estimate.visual_bmi),
        input_height_cm: declared.height_cm,
        input_weight_kg: declared.weight_kg,
        visual_height_ratio: round3(ratios.visual_height_ratio),
        shoulder_width_ratio: round3(ratios.shoulder_width_ratio),
        bmi_category,
        orientation,
        verification_result: verification.message,
        bmi_difference: verification.bmi_difference,
        bmi_verified: verification.verified,
    };

    if result.bmi_verified {
        info!(
            "BMI verified: declared={} visual={} (estimated height {:.2} m)",
            result.declared_bmi, result.visual_bmi, estimate.estimated_height_m
        );
    } else {
        warn!(
            "BMI flagged: declared={} visual={}: {}",
            result.declared_bmi, result.visual_bmi, result.verification_result
        );
    }
    Ok(result)
}

/// 検出済み Pose 1つで照合
pub fn verify_pose(
    pose: &Pose,
    declared: DeclaredBody,
    policy: &VerificationPolicy,
) -> Result<BmiResult> {
    let ratios = measure_pose(pose, SINGLE_VIEW)?;
    score(
        MeanRatios::from(&ratios),
        declared,
        OrientationReport::Single {
            orientation: ratios.orientation,
        },
        policy,
    )
}

/// 正面・背面の Pose で照合。どちらかが失敗したらその画像のエラーを返す。
pub fn verify_pose_pair(
    front: &Pose,
    back: &Pose,
    declared: DeclaredBody,
    policy: &VerificationPolicy,
) -> Result<BmiResult> {
    let front_ratios = measure_pose(front, FRONT_VIEW)?;
    let back_ratios = measure_pose(back, BACK_VIEW)?;
    score_pair(&front_ratios, &back_ratios, declared, policy)
}

/// 2方向の比率を平均して照合
fn score_pair(
    front: &BodyRatios,
    back: &BodyRatios,
    declared: DeclaredBody,
    policy: &VerificationPolicy,
) -> Result<BmiResult> {
    score(
        MeanRatios::average(front, back),
        declared,
        OrientationReport::Pair {
            orientation_front: front.orientation,
            orientation_back: back.orientation,
        },
        policy,
    )
}

/// 検出器を所有する照合パイプライン
///
/// 検出器は注入する。`detect` が `&mut self` なので、並行処理する場合は
/// ワーカーごとに `BmiVerifier` を用意する。
pub struct BmiVerifier<D> {
    detector: D,
    policy: VerificationPolicy,
}

impl<D: LandmarkDetector> BmiVerifier<D> {
    pub fn new(detector: D, policy: VerificationPolicy) -> Self {
        Self { detector, policy }
    }

    pub fn from_config(detector: D, config: &Config) -> Self {
        Self::new(detector, config.verification.policy())
    }

    pub fn policy(&self) -> &VerificationPolicy {
        &self.policy
    }

    fn detect(&mut self, image: &[u8], view: &str) -> Result<Pose> {
        match self.detector.detect(image) {
            Ok(Some(pose)) => Ok(pose),
            Ok(None) => {
                warn!("[{}] no pose detected", view);
                Err(MeasurementError::NoPoseDetected {
                    view: view.to_string(),
                })
            }
            Err(e) => {
                warn!("[{}] detector failed: {:#}", view, e);
                Err(MeasurementError::detector(view, format!("{:#}", e)))
            }
        }
    }

    /// 1枚の画像で照合
    pub fn verify_image(&mut self, image: &[u8], height_cm: f64, weight_kg: f64) -> Result<BmiResult> {
        let declared = DeclaredBody::new(height_cm, weight_kg)?;
        let pose = self.detect(image, SINGLE_VIEW)?;
        verify_pose(&pose, declared, &self.policy)
    }

    /// 正面・背面の2枚で照合
    pub fn verify_image_pair(
        &mut self,
        front: &[u8],
        back: &[u8],
        height_cm: f64,
        weight_kg: f64,
    ) -> Result<BmiResult> {
        let declared = DeclaredBody::new(height_cm, weight_kg)?;
        let front_pose = self.detect(front, FRONT_VIEW)?;
        let front_ratios = measure_pose(&front_pose, FRONT_VIEW)?;
        let back_pose = self.detect(back, BACK_VIEW)?;
        let back_ratios = measure_pose(&back_pose, BACK_VIEW)?;
        score_pair(&front_ratios, &back_ratios, declared, &self.policy)
    }
}
