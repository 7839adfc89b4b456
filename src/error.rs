//! Error taxonomy for a single verification request.
//!
//! Every rejection is terminal for the request: no partial result is produced
//! alongside an error.

use serde::Serialize;
use thiserror::Error;

/// 分類のみ（HTTP 層でのステータス割り当て用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    NoPoseDetected,
    IncompleteBody,
    DegeneratePose,
    InvalidDeclaredInput,
    DetectorFailure,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasurementError {
    /// 検出器が人物を見つけられなかった
    #[error("Pose not detected in {view} image")]
    NoPoseDetected { view: String },

    /// 必須ランドマークの可視性不足
    #[error("Full-body pose required in {view} image. Missing critical landmarks: {}", .missing.join(", "))]
    IncompleteBody { view: String, missing: Vec<String> },

    /// 肩幅ゼロ・比率が非正
    #[error("{reason}")]
    DegeneratePose { reason: String },

    /// 申告身長・体重が不正
    #[error("Invalid input data: {0}")]
    InvalidDeclaredInput(String),

    /// 検出器自体の失敗（デコード不可の画像、推論エラー）
    #[error("Pose detector failed on {view} image: {message}")]
    DetectorFailure { view: String, message: String },
}

impl MeasurementError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoPoseDetected { .. } => ErrorKind::NoPoseDetected,
            Self::IncompleteBody { .. } => ErrorKind::IncompleteBody,
            Self::DegeneratePose { .. } => ErrorKind::DegeneratePose,
            Self::InvalidDeclaredInput(_) => ErrorKind::InvalidDeclaredInput,
            Self::DetectorFailure { .. } => ErrorKind::DetectorFailure,
        }
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegeneratePose {
            reason: reason.into(),
        }
    }

    pub(crate) fn detector(view: &str, message: impl Into<String>) -> Self {
        Self::DetectorFailure {
            view: view.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MeasurementError>;
