use nalgebra::Vector3;
use serde::Serialize;

use super::orientation::{classify_orientation, Orientation};
use crate::error::{MeasurementError, Result};
use crate::pose::{Landmark, LandmarkIndex, Pose};

/// 1枚の画像から得た体型比率（いずれも画像サイズで正規化済み）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyRatios {
    /// 鼻から低い方のかかとまでの縦方向スパン（おおむね 0.5〜1.0）
    pub visual_height_ratio: f64,
    /// 左右の肩の3D距離（おおむね 0.05〜0.3）
    pub shoulder_width_ratio: f64,
    pub orientation: Orientation,
}

/// 2視点の平均比率
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanRatios {
    pub visual_height_ratio: f64,
    pub shoulder_width_ratio: f64,
}

impl From<&BodyRatios> for MeanRatios {
    fn from(ratios: &BodyRatios) -> Self {
        Self {
            visual_height_ratio: ratios.visual_height_ratio,
            shoulder_width_ratio: ratios.shoulder_width_ratio,
        }
    }
}

impl MeanRatios {
    /// 要素ごとの算術平均
    pub fn average(a: &BodyRatios, b: &BodyRatios) -> Self {
        Self {
            visual_height_ratio: (a.visual_height_ratio + b.visual_height_ratio) / 2.0,
            shoulder_width_ratio: (a.shoulder_width_ratio + b.shoulder_width_ratio) / 2.0,
        }
    }
}

fn position(landmark: &Landmark) -> Vector3<f64> {
    Vector3::new(landmark.x as f64, landmark.y as f64, landmark.z as f64)
}

/// 全身ゲート通過済みの Pose から比率を抽出
///
/// 片足が隠れていても、低い方（y が大きい方）のかかとを使うので身長スパンは取れる。
pub fn extract_ratios(pose: &Pose, view: &str) -> Result<BodyRatios> {
    let orientation = classify_orientation(pose);

    let nose = pose.get(LandmarkIndex::Nose);
    let left_heel = pose.get(LandmarkIndex::LeftHeel);
    let right_heel = pose.get(LandmarkIndex::RightHeel);
    let heel_y = left_heel.y.max(right_heel.y) as f64;
    let visual_height_ratio = (heel_y - nose.y as f64).abs();

    let left_shoulder = position(pose.get(LandmarkIndex::LeftShoulder));
    let right_shoulder = position(pose.get(LandmarkIndex::RightShoulder));
    let shoulder_width_ratio = (right_shoulder - left_shoulder).norm();

    // NaN もここで弾く
    if !(shoulder_width_ratio > 0.0) {
        return Err(MeasurementError::degenerate(format!(
            "Invalid pose in {} image: zero shoulder width",
            view
        )));
    }

    Ok(BodyRatios {
        visual_height_ratio,
        shoulder_width_ratio,
        orientation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use approx::assert_relative_eq;

    fn make_pose(nose_y: f32, heels_y: (f32, f32), left: [f32; 3], right: [f32; 3]) -> Pose {
        let mut pose = Pose::default();
        pose.set(LandmarkIndex::Nose, Landmark::new(0.5, nose_y, 0.0, 0.99));
        pose.set(LandmarkIndex::LeftHeel, Landmark::new(0.45, heels_y.0, 0.0, 0.9));
        pose.set(LandmarkIndex::RightHeel, Landmark::new(0.55, heels_y.1, 0.0, 0.9));
        pose.set(LandmarkIndex::LeftShoulder, Landmark::new(left[0], left[1], left[2], 0.9));
        pose.set(LandmarkIndex::RightShoulder, Landmark::new(right[0], right[1], right[2], 0.9));
        pose
    }

    #[test]
    fn test_height_uses_lower_heel() {
        let pose = make_pose(0.1, (0.9, 0.85), [0.4, 0.3, 0.0], [0.6, 0.3, 0.0]);
        let ratios = extract_ratios(&pose, "image").unwrap();
        assert_relative_eq!(ratios.visual_height_ratio, 0.8, epsilon = 1e-6);

        let pose = make_pose(0.1, (0.5, 0.95), [0.4, 0.3, 0.0], [0.6, 0.3, 0.0]);
        let ratios = extract_ratios(&pose, "image").unwrap();
        assert_relative_eq!(ratios.visual_height_ratio, 0.85, epsilon = 1e-6);
    }

    #[test]
    fn test_shoulder_width_is_3d() {
        // dx=0.3, dy=0, dz=0.4 → 0.5
        let pose = make_pose(0.1, (0.9, 0.9), [0.3, 0.3, 0.0], [0.6, 0.3, 0.4]);
        let ratios = extract_ratios(&pose, "image").unwrap();
        assert_relative_eq!(ratios.shoulder_width_ratio, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_shoulder_width_includes_tilt() {
        // 肩が傾いていても y 成分で距離が伸びる
        let pose = make_pose(0.1, (0.9, 0.9), [0.4, 0.3, 0.0], [0.4, 0.4, 0.0]);
        let ratios = extract_ratios(&pose, "image").unwrap();
        assert_relative_eq!(ratios.shoulder_width_ratio, 0.1, epsilon = 1e-6);
        assert_eq!(ratios.orientation, Orientation::Side);
    }

    #[test]
    fn test_zero_shoulder_width_is_degenerate() {
        let pose = make_pose(0.1, (0.9, 0.9), [0.5, 0.3, 0.1], [0.5, 0.3, 0.1]);
        let err = extract_ratios(&pose, "front").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegeneratePose);
        assert_eq!(err.to_string(), "Invalid pose in front image: zero shoulder width");
    }

    #[test]
    fn test_nan_shoulder_is_degenerate() {
        let pose = make_pose(0.1, (0.9, 0.9), [f32::NAN, 0.3, 0.0], [0.6, 0.3, 0.0]);
        let err = extract_ratios(&pose, "image").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegeneratePose);
    }

    #[test]
    fn test_average() {
        let a = BodyRatios {
            visual_height_ratio: 0.8,
            shoulder_width_ratio: 0.2,
            orientation: Orientation::Front,
        };
        let b = BodyRatios {
            visual_height_ratio: 0.6,
            shoulder_width_ratio: 0.1,
            orientation: Orientation::Side,
        };
        let mean = MeanRatios::average(&a, &b);
        assert_relative_eq!(mean.visual_height_ratio, 0.7);
        assert_relative_eq!(mean.shoulder_width_ratio, 0.15);

        assert_eq!(MeanRatios::average(&a, &a), MeanRatios::from(&a));
    }
}
