pub mod bmi;
pub mod body;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod pose;
pub mod result;
pub mod verify;

pub use error::{ErrorKind, MeasurementError};
pub use pipeline::BmiVerifier;
pub use result::{BmiResponse, BmiResult};
