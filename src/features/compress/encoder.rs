use image::codecs::jpeg::JpegEncoder;
use std::io::Cursor;

use crate::error::AppError;

/// 把任意可解码的栅格图片重编码为 JPEG
///
/// - 带 alpha/调色板的图像统一展平为不透明 RGB8（JPEG 不支持透明度，
///   该转换有损：透明信息被直接丢弃）。
/// - quality 语义由编码器定义（1=最低，100=最高，越界值被编码器钳制）；
///   超出 u8 表示范围的值视为编码器拒绝。
/// - 不做缩放、旋转或元数据剥离。
pub fn recompress(bytes: &[u8], quality: i64) -> Result<Vec<u8>, AppError> {
    let quality = u8::try_from(quality)
        .map_err(|_| AppError::Encode(format!("quality {} out of encoder range", quality)))?;

    let image = image::load_from_memory(bytes)
        .map_err(|e| AppError::UnsupportedFormat(e.to_string()))?;

    let rgb = image.into_rgb8();

    let mut out = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut out, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| AppError::Encode(e.to_string()))?;

    let out = out.into_inner();
    if out.is_empty() {
        return Err(AppError::Encode("encoder produced no output".to_string()));
    }
    Ok(out)
}
