use serde::Serialize;
use std::fmt;

use crate::pose::{LandmarkIndex, Pose};

// 閾値は f64。f32 座標を f64 に広げてから比較する。
/// 肩のX方向の広がりがこれを超えると正面候補
const FRONT_MIN_SHOULDER_X: f64 = 0.15;
/// 肩の奥行き差がこれ未満なら胴体がねじれていない
const FRONT_MAX_SHOULDER_Z: f64 = 0.2;
/// 両肩ともこの可視性を超えている必要がある（境界は含まない）
const SHOULDER_VISIBILITY: f64 = 0.5;

/// カメラに対する体の向き
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    Front,
    Side,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Front => "Front",
            Orientation::Side => "Side",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 肩の形状から正面/横向きを判定
///
/// 正面 = 肩の横幅が十分、奥行き差が小さい、両肩が見えている。それ以外はすべて Side。
pub fn classify_orientation(pose: &Pose) -> Orientation {
    let left = pose.get(LandmarkIndex::LeftShoulder);
    let right = pose.get(LandmarkIndex::RightShoulder);

    let x_distance = (f64::from(right.x) - f64::from(left.x)).abs();
    let z_distance = (f64::from(right.z) - f64::from(left.z)).abs();
    let visible = f64::from(left.visibility) > SHOULDER_VISIBILITY
        && f64::from(right.visibility) > SHOULDER_VISIBILITY;

    if x_distance > FRONT_MIN_SHOULDER_X && z_distance < FRONT_MAX_SHOULDER_Z && visible {
        Orientation::Front
    } else {
        Orientation::Side
    }
}
