use anyhow::Result;

use super::landmark::Pose;

/// 画像からランドマークを検出する外部検出器のインターフェース
///
/// `Ok(None)` は人物が見つからなかったこと、`Err` は検出器自体の失敗
/// （デコードできない画像、推論エラー）を表す。
///
/// `&mut self` なので、1インスタンスを複数リクエストで共有する場合は
/// 呼び出し側で直列化するか、ワーカーごとにインスタンスを持つこと。
pub trait LandmarkDetector {
    fn detect(&mut self, image: &[u8]) -> Result<Option<Pose>>;
}

impl<D: LandmarkDetector + ?Sized> LandmarkDetector for Box<D> {
    fn detect(&mut self, image: &[u8]) -> Result<Option<Pose>> {
        (**self).detect(image)
    }
}

/// 入力に関係なく固定の Pose を返す検出器（テスト・ランドマークJSON入力用）
#[derive(Debug, Clone, Default)]
pub struct FixedPoseDetector {
    pose: Option<Pose>,
}

impl FixedPoseDetector {
    pub fn new(pose: Pose) -> Self {
        Self { pose: Some(pose) }
    }

    /// 常に「人物なし」を返す
    pub fn empty() -> Self {
        Self { pose: None }
    }
}

impl LandmarkDetector for FixedPoseDetector {
    fn detect(&mut self, _image: &[u8]) -> Result<Option<Pose>> {
        Ok(self.pose.clone())
    }
}
