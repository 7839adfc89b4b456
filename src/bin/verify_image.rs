//! Runs the ONNX pose model on one or two photographs and verifies the
//! declared height/weight against the visual BMI estimate.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use visual_bmi::config::Config;
use visual_bmi::pose::OnnxPoseDetector;
use visual_bmi::{BmiResponse, BmiVerifier};

#[derive(Debug, Parser)]
#[command(name = "verify_image", version = env!("GIT_VERSION"))]
struct Args {
    /// 正面画像（JPEG/PNG）
    front: PathBuf,
    /// 背面画像
    back: Option<PathBuf>,
    /// 申告身長 (cm)
    #[arg(long)]
    height: f64,
    /// 申告体重 (kg)
    #[arg(long)]
    weight: f64,
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    /// モデルファイル（設定ファイルより優先）
    #[arg(long)]
    model: Option<String>,
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    if let Some(path) = visual_bmi::logging::init(Some(args.log_dir.as_path()))? {
        log::info!("Log: {}", path.display());
    }
    log::info!("verify_image ({})", env!("GIT_VERSION"));

    let mut config = Config::load_or_default(&args.config);
    if let Some(model) = args.model {
        config.detector.model_path = Some(model);
    }

    let detector = OnnxPoseDetector::new(&config.detector)?;
    let mut verifier = BmiVerifier::from_config(detector, &config);

    let front = fs::read(&args.front)
        .with_context(|| format!("Failed to read {}", args.front.display()))?;
    let back = match &args.back {
        Some(path) => Some(fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?),
        None => None,
    };

    let start = Instant::now();
    let result = match &back {
        Some(back) => verifier.verify_image_pair(&front, back, args.height, args.weight),
        None => verifier.verify_image(&front, args.height, args.weight),
    };
    log::info!("Processed in {:.1} ms", start.elapsed().as_secs_f64() * 1000.0);

    let code = match &result {
        Ok(r) if r.bmi_verified => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(2),
        Err(_) => ExitCode::FAILURE,
    };
    println!("{}", serde_json::to_string_pretty(&BmiResponse::from(result))?);
    Ok(code)
}
