use anyhow::{bail, Result};
use ndarray::Array4;
use opencv::{
    core::{self, AlgorithmHint, Mat, Scalar, Size, Vector, CV_32FC3},
    imgcodecs, imgproc,
    prelude::*,
};

use super::blazepose::LetterboxInfo;

/// エンコード済み画像（JPEG/PNG）を BGR の Mat にデコード
pub fn decode_image(bytes: &[u8]) -> Result<Mat> {
    let buf = Vector::<u8>::from_slice(bytes);
    let frame = imgcodecs::imdecode(&buf, imgcodecs::IMREAD_COLOR)?;
    if frame.empty() {
        bail!("could not decode image ({} bytes)", bytes.len());
    }
    Ok(frame)
}

/// OpenCV Mat を BlazePose 用の入力テンソルに変換
///
/// - BGR -> RGB
/// - アスペクト比を保って input_size x input_size にレターボックス
/// - [1, input_size, input_size, 3] の f32 テンソル (0.0-1.0)
///
/// レターボックスは検出器アダプタ内部の処理。出力ランドマークは
/// `decode_landmarks` で元画像の正規化座標に戻してから返すので、
/// 計測パイプライン側は余白を意識しない。
pub fn preprocess_for_blazepose(frame: &Mat, input_size: u32) -> Result<(Array4<f32>, LetterboxInfo)> {
    let info = LetterboxInfo::new(frame.cols() as u32, frame.rows() as u32, input_size);
    let (scaled_w, scaled_h) = info.scaled_size();

    // BGR -> RGB
    let mut rgb = Mat::default();
    imgproc::cvt_color(frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0, AlgorithmHint::ALGO_HINT_DEFAULT)?;

    let mut resized = Mat::default();
    imgproc::resize(
        &rgb,
        &mut resized,
        Size::new(scaled_w, scaled_h),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )?;

    // 余白は黒で埋める
    let size = input_size as i32;
    let pad_x = info.pad_x as i32;
    let pad_y = info.pad_y as i32;
    let mut padded = Mat::default();
    core::copy_make_border(
        &resized,
        &mut padded,
        pad_y,
        size - scaled_h - pad_y,
        pad_x,
        size - scaled_w - pad_x,
        core::BORDER_CONSTANT,
        Scalar::all(0.0),
    )?;

    // f32 (0-1) に変換
    let mut float_mat = Mat::default();
    padded.convert_to(&mut float_mat, CV_32FC3, 1.0 / 255.0, 0.0)?;

    let side = input_size as usize;
    let mut tensor = Array4::<f32>::zeros((1, side, side, 3));
    for y in 0..size {
        for x in 0..size {
            let pixel = float_mat.at_2d::<core::Vec3f>(y, x)?;
            tensor[[0, y as usize, x as usize, 0]] = pixel[0];
            tensor[[0, y as usize, x as usize, 1]] = pixel[1];
            tensor[[0, y as usize, x as usize, 2]] = pixel[2];
        }
    }

    Ok((tensor, info))
}
