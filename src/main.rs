use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use visual_bmi::bmi::DeclaredBody;
use visual_bmi::config::Config;
use visual_bmi::pipeline::{verify_pose, verify_pose_pair};
use visual_bmi::pose::Pose;
use visual_bmi::BmiResponse;

/// 検出済みランドマーク (JSON) から見た目の BMI を推定し、申告値と照合する
#[derive(Debug, Parser)]
#[command(name = "visual-bmi", version = env!("GIT_VERSION"))]
struct Args {
    /// 正面のランドマーク JSON（1枚のみの場合はこれだけ）
    front: PathBuf,
    /// 背面のランドマーク JSON
    back: Option<PathBuf>,
    /// 申告身長 (cm)
    #[arg(long)]
    height: f64,
    /// 申告体重 (kg)
    #[arg(long)]
    weight: f64,
    /// 設定ファイル
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    /// ログファイルの出力先
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// 検証成功時の通知イベントに載せるユーザーID
    #[arg(long)]
    user_id: Option<i64>,
}

fn load_pose(path: &Path) -> Result<Pose> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read landmarks {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse landmarks {}", path.display()))
}

fn run(args: Args) -> Result<ExitCode> {
    if let Some(path) = visual_bmi::logging::init(args.log_dir.as_deref())? {
        log::info!("Log: {}", path.display());
    }
    log::info!("visual-bmi ({})", env!("GIT_VERSION"));

    let config = Config::load_or_default(&args.config);
    let policy = config.verification.policy();

    let front = load_pose(&args.front)?;
    let back = args.back.as_deref().map(load_pose).transpose()?;

    let result = DeclaredBody::new(args.height, args.weight).and_then(|declared| match &back {
        Some(back) => verify_pose_pair(&front, back, declared, &policy),
        None => verify_pose(&front, declared, &policy),
    });

    let code = match &result {
        Ok(r) if r.bmi_verified => {
            if let Some(event) = args.user_id.and_then(|id| r.verified_event(id)) {
                log::info!("Verification event: {}", serde_json::to_string(&event)?);
            }
            ExitCode::SUCCESS
        }
        Ok(_) => ExitCode::from(2),
        Err(e) => {
            log::warn!("Rejected: {}", e);
            ExitCode::FAILURE
        }
    };

    let response = BmiResponse::from(result);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(code)
}

fn main() -> Result<ExitCode> {
    run(Args::parse())
}
