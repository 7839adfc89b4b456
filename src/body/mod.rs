pub mod gate;
pub mod orientation;
pub mod ratio;

pub use gate::{check_full_body, is_full_body, missing_landmarks, REQUIRED_LANDMARKS};
pub use orientation::{classify_orientation, Orientation};
pub use ratio::{extract_ratios, BodyRatios, MeanRatios};
