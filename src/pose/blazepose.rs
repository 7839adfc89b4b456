//! BlazePose landmark model output decoding.
//!
//! The landmark model returns 39 points × [x, y, z, visibility, presence] in
//! model-input pixels; the first 33 are the body landmarks, the rest are
//! auxiliary ROI points.

use anyhow::{ensure, Result};

use super::landmark::{Landmark, LandmarkIndex, Pose};

/// 1ランドマークあたりの値の数
pub const LANDMARK_STRIDE: usize = 5;
/// モデル出力のランドマーク数（補助点を含む）
pub const OUTPUT_LANDMARKS: usize = 39;

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// レターボックス変換のパラメータ（元画像 → 正方形のモデル入力）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxInfo {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub src_width: f32,
    pub src_height: f32,
}

impl LetterboxInfo {
    /// アスペクト比を保ったまま input_size に収め、余白を左右/上下に均等配分
    pub fn new(src_width: u32, src_height: u32, input_size: u32) -> Self {
        let w = src_width as f32;
        let h = src_height as f32;
        let size = input_size as f32;
        let scale = size / w.max(h);
        let scaled_w = (w * scale).round();
        let scaled_h = (h * scale).round();
        Self {
            scale,
            pad_x: ((size - scaled_w) / 2.0).floor(),
            pad_y: ((size - scaled_h) / 2.0).floor(),
            src_width: w,
            src_height: h,
        }
    }

    /// 縮小後の画像サイズ（ピクセル）
    pub fn scaled_size(&self) -> (i32, i32) {
        (
            (self.src_width * self.scale).round() as i32,
            (self.src_height * self.scale).round() as i32,
        )
    }
}

/// モデル出力を元画像で正規化した Pose に変換
///
/// z は x と同じスケール（元画像の幅）で正規化する。可視性はロジットなので sigmoid を通す。
pub fn decode_landmarks(raw: &[f32], info: &LetterboxInfo) -> Result<Pose> {
    ensure!(
        raw.len() >= LandmarkIndex::COUNT * LANDMARK_STRIDE,
        "landmark tensor too short: {} values",
        raw.len()
    );

    let mut pose = Pose::default();
    for (i, values) in raw
        .chunks_exact(LANDMARK_STRIDE)
        .take(LandmarkIndex::COUNT)
        .enumerate()
    {
        let x = (values[0] - info.pad_x) / info.scale / info.src_width;
        let y = (values[1] - info.pad_y) / info.scale / info.src_height;
        let z = values[2] / info.scale / info.src_width;
        let visibility = sigmoid(values[3]);
        pose.landmarks[i] = Landmark::new(x, y, z, visibility);
    }
    Ok(pose)
}
