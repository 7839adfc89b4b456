use anyhow::{Context, Result};
use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;

use super::blazepose::{decode_landmarks, sigmoid};
use super::detector::LandmarkDetector;
use super::landmark::Pose;
use super::preprocess::{decode_image, preprocess_for_blazepose};
use crate::config::DetectorConfig;

/// BlazePose ランドマークモデル (ONNX) を使用した姿勢検出器
///
/// 出力0: ランドマーク [1, 195]、出力1: 人物存在スコア [1, 1]（ロジット）
pub struct OnnxPoseDetector {
    session: Session,
    input_name: String,
    landmarks_name: String,
    presence_name: String,
    input_size: u32,
    min_detection_confidence: f32,
}

impl OnnxPoseDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new(config: &DetectorConfig) -> Result<Self> {
        let model_path = config.resolved_model_path();
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model {}", model_path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .context("model has no inputs")?;
        let mut outputs = session.outputs.iter().map(|o| o.name.clone());
        let landmarks_name = outputs.next().context("model has no landmark output")?;
        let presence_name = outputs.next().context("model has no pose presence output")?;

        log::info!(
            "Loaded pose model {} (input {}, outputs {} / {})",
            model_path,
            input_name,
            landmarks_name,
            presence_name
        );

        Ok(Self {
            session,
            input_name,
            landmarks_name,
            presence_name,
            input_size: config.input_size,
            min_detection_confidence: config.min_detection_confidence,
        })
    }

    /// 前処理済みテンソルからランドマーク生値と存在スコアを取得
    fn infer(&mut self, input: Array4<f32>) -> Result<(Vec<f32>, f32)> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .context("Inference failed")?;

        let landmarks: ndarray::ArrayViewD<f32> = outputs[self.landmarks_name.as_str()]
            .try_extract_array()
            .context("Failed to extract landmark tensor")?;
        let presence: ndarray::ArrayViewD<f32> = outputs[self.presence_name.as_str()]
            .try_extract_array()
            .context("Failed to extract presence tensor")?;

        let raw: Vec<f32> = landmarks.iter().copied().collect();
        let presence_logit = presence.iter().copied().next().unwrap_or(f32::NEG_INFINITY);
        Ok((raw, presence_logit))
    }
}

impl LandmarkDetector for OnnxPoseDetector {
    fn detect(&mut self, image: &[u8]) -> Result<Option<Pose>> {
        let frame = decode_image(image)?;
        let (input, info) = preprocess_for_blazepose(&frame, self.input_size)?;
        let (raw, presence_logit) = self.infer(input)?;

        let presence = sigmoid(presence_logit);
        if presence < self.min_detection_confidence {
            log::debug!(
                "pose presence {:.3} below threshold {:.3}",
                presence,
                self.min_detection_confidence
            );
            return Ok(None);
        }

        decode_landmarks(&raw, &info).map(Some)
    }
}
