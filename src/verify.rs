use serde::Serialize;

/// 許容差のデフォルト（BMI単位）
pub const DEFAULT_TOLERANCE: f64 = 5.0;

pub const VERIFICATION_PASSED: &str = "Verification passed";

/// 申告 BMI と推定 BMI の照合ポリシー
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerificationPolicy {
    tolerance: f64,
}

impl VerificationPolicy {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// 差が許容差以下（境界を含む）なら検証成功
    pub fn verify(&self, declared_bmi: f64, visual_bmi: f64) -> Verification {
        let bmi_difference = (visual_bmi - declared_bmi).abs();
        let verified = bmi_difference <= self.tolerance;
        let message = if verified {
            VERIFICATION_PASSED.to_string()
        } else {
            format!("Mismatch - BMI discrepancy ({:.2})", bmi_difference)
        };
        Verification {
            bmi_difference,
            verified,
            message,
        }
    }
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

/// 照合結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verification {
    pub bmi_difference: f64,
    pub verified: bool,
    pub message: String,
}
