use crate::error::{MeasurementError, Result};
use crate::pose::{LandmarkIndex, Pose};

/// 全身計測に必要なランドマーク
pub const REQUIRED_LANDMARKS: [LandmarkIndex; 6] = [
    LandmarkIndex::LeftShoulder,
    LandmarkIndex::RightShoulder,
    LandmarkIndex::LeftHip,
    LandmarkIndex::RightHip,
    LandmarkIndex::LeftKnee,
    LandmarkIndex::RightKnee,
];

/// この値未満の可視性は「未検出」扱い（0.5ちょうどは合格）
pub const MIN_VISIBILITY: f32 = 0.5;

/// 可視性不足の必須ランドマーク
pub fn missing_landmarks(pose: &Pose) -> Vec<LandmarkIndex> {
    REQUIRED_LANDMARKS
        .iter()
        .copied()
        .filter(|&idx| !pose.get(idx).is_visible(MIN_VISIBILITY))
        .collect()
}

pub fn is_full_body(pose: &Pose) -> bool {
    missing_landmarks(pose).is_empty()
}

/// 全身が写っていなければ IncompleteBody を返す。部分的な計測は行わない。
pub fn check_full_body(pose: &Pose, view: &str) -> Result<()> {
    let missing = missing_landmarks(pose);
    if missing.is_empty() {
        return Ok(());
    }
    Err(MeasurementError::IncompleteBody {
        view: view.to_string(),
        missing: missing.iter().map(|idx| idx.name().to_string()).collect(),
    })
}
