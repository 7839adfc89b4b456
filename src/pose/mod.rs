pub mod blazepose;
pub mod detector;
pub mod landmark;
#[cfg(feature = "desktop")]
pub mod onnx;
#[cfg(feature = "desktop")]
pub mod preprocess;

pub use blazepose::{decode_landmarks, LetterboxInfo};
pub use detector::{FixedPoseDetector, LandmarkDetector};
pub use landmark::{Landmark, LandmarkIndex, Pose};
#[cfg(feature = "desktop")]
pub use onnx::OnnxPoseDetector;
#[cfg(feature = "desktop")]
pub use preprocess::{decode_image, preprocess_for_blazepose};
