use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// stderr とログファイルの両方に書く
struct TeeWriter {
    file: BufWriter<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        // プロセス終了時に取りこぼさないよう毎回 flush
        self.file.flush()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// `{dir}/{prefix}_YYYYmmdd_HHMMSS.log`
pub fn log_file_path(dir: &Path, prefix: &str) -> PathBuf {
    let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("{}_{}.log", prefix, ts))
}

/// ロガーを初期化。レベルは RUST_LOG（デフォルト info）。
///
/// `log_dir` を指定するとタイムスタンプ付きファイルにも書き出し、そのパスを返す。
pub fn init(log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();

    let path = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let path = log_file_path(dir, "visual_bmi");
            let file = File::create(&path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(TeeWriter {
                file: BufWriter::new(file),
            })));
            Some(path)
        }
        None => None,
    };

    builder.try_init().context("Logger already initialized")?;
    Ok(path)
}
