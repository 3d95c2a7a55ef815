use serde::{Deserialize, Serialize};

/// quality 缺省值
pub const DEFAULT_QUALITY: i64 = 80;

/// 压缩请求体
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompressRequest {
    /// base64 编码的原始图片字节（任意可解码的栅格格式）
    pub image_data: String,
    /// 文件名（仅用于输出命名与通知标注）
    #[schema(example = "photo.png")]
    pub filename: String,
    /// JPEG 编码质量（缺省 80）
    ///
    /// 契约只要求"可强转为整数"：数字字符串与浮点都接受（浮点向零
    /// 截断），不做范围校验——越界值原样传给编码器，由编码器的行为
    /// （钳制或拒绝）决定结果。
    #[serde(default = "default_quality", deserialize_with = "deserialize_quality")]
    #[schema(example = 80)]
    pub quality: i64,
}

fn default_quality() -> i64 {
    DEFAULT_QUALITY
}

/// quality 的宽松反序列化：整数直收，浮点向零截断，字符串按十进制
/// 整数解析；其余形式（null、非数字文本）报错。
fn deserialize_quality<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawQuality {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match RawQuality::deserialize(deserializer)? {
        RawQuality::Int(v) => Ok(v),
        RawQuality::Float(v) => Ok(v as i64),
        RawQuality::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid quality value: {s:?}"))),
    }
}

/// 压缩响应体
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompressResponse {
    /// 恒为 true（失败走错误响应分支）
    pub success: bool,
    /// 输出文件名：`<name>_compressed_<quality>%.jpg`
    #[schema(example = "photo.png_compressed_80%.jpg")]
    pub filename: String,
    /// 原始字节数
    pub original_size: u64,
    /// 压缩后字节数
    pub compressed_size: u64,
    /// base64 编码的 JPEG 输出字节
    pub image_data: String,
    /// 体积节省比例，一位小数带百分号
    #[schema(example = "23.4%")]
    pub savings: String,
}

/// 体积节省百分比
///
/// original == 0 时按 0% 处理（除零防护）。实践中走不到：零字节输入
/// 在图片解码阶段就会失败，但这里不依赖那层保证。
pub fn savings_percent(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - compressed as f64) / original as f64 * 100.0
}

/// savings 字段的展示格式（一位小数 + 百分号，压缩变大时为负值）
pub fn format_savings(original: u64, compressed: u64) -> String {
    format!("{:.1}%", savings_percent(original, compressed))
}

/// 输出文件名
pub fn output_filename(name: &str, quality: i64) -> String {
    format!("{}_compressed_{}%.jpg", name, quality)
}

#[cfg(test)]
mod tests {
    use super::{CompressRequest, format_savings, output_filename, savings_percent};

    #[test]
    fn savings_guard_zero_original() {
        assert_eq!(savings_percent(0, 0), 0.0);
        assert_eq!(format_savings(0, 123), "0.0%");
    }

    #[test]
    fn savings_one_decimal_rounding() {
        assert_eq!(format_savings(100_000, 76_600), "23.4%");
        assert_eq!(format_savings(100, 50), "50.0%");
        // 压缩后反而变大：允许负百分比，原样上报
        assert_eq!(format_savings(100, 150), "-50.0%");
    }

    #[test]
    fn output_filename_embeds_quality() {
        assert_eq!(output_filename("photo.png", 50), "photo.png_compressed_50%.jpg");
    }

    #[test]
    fn quality_defaults_to_80_when_absent() {
        let req: CompressRequest =
            serde_json::from_str(r#"{"imageData":"AA==","filename":"x.png"}"#).expect("parse");
        assert_eq!(req.quality, 80);
    }

    #[test]
    fn quality_coerces_string_form() {
        let req: CompressRequest =
            serde_json::from_str(r#"{"imageData":"AA==","filename":"x.png","quality":"50"}"#)
                .expect("parse");
        assert_eq!(req.quality, 50);

        // 前后空白照常容忍
        let req: CompressRequest =
            serde_json::from_str(r#"{"imageData":"AA==","filename":"x.png","quality":" 50 "}"#)
                .expect("parse");
        assert_eq!(req.quality, 50);
    }

    #[test]
    fn quality_coerces_float_by_truncation() {
        let req: CompressRequest =
            serde_json::from_str(r#"{"imageData":"AA==","filename":"x.png","quality":50.5}"#)
                .expect("parse");
        assert_eq!(req.quality, 50);

        let req: CompressRequest =
            serde_json::from_str(r#"{"imageData":"AA==","filename":"x.png","quality":-1.9}"#)
                .expect("parse");
        assert_eq!(req.quality, -1);
    }

    #[test]
    fn quality_non_numeric_text_is_rejected() {
        let err = serde_json::from_str::<CompressRequest>(
            r#"{"imageData":"AA==","filename":"x.png","quality":"high"}"#,
        )
        .expect_err("expected parse failure");
        assert!(err.to_string().contains("quality"));
    }

    #[test]
    fn quality_accepts_out_of_range_values() {
        let req: CompressRequest =
            serde_json::from_str(r#"{"imageData":"AA==","filename":"x.png","quality":400}"#)
                .expect("parse");
        assert_eq!(req.quality, 400);
    }
}
