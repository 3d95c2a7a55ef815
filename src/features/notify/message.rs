use crate::features::compress::models::savings_percent;

/// 一次压缩的结果摘要（通知消息的数据来源）
#[derive(Debug, Clone)]
pub struct CompressionSummary {
    /// 原始文件名（仅作标注用途）
    pub filename: String,
    /// 原始字节数
    pub original_size: u64,
    /// 压缩后字节数
    pub compressed_size: u64,
    /// 编码质量参数
    pub quality: i64,
}

/// 通知主题行
pub fn subject_line(filename: &str) -> String {
    format!("Compressed: {}", filename)
}

/// 多行人类可读的通知正文
///
/// 字节数按千位分组，MB 取两位小数（1 MB = 1024×1024 字节），
/// 节省比例取一位小数，与响应里的 savings 字段独立计算。
pub fn format_message(summary: &CompressionSummary) -> String {
    let savings = savings_percent(summary.original_size, summary.compressed_size);

    format!(
        "Image Compressed Successfully!\n\n\
         File: {file}\n\
         Quality: {quality}%\n\
         Original Size: {orig} bytes ({orig_mb:.2} MB)\n\
         Compressed Size: {comp} bytes ({comp_mb:.2} MB)\n\
         Savings: {savings:.1}% reduction\n\n\
         Image ready for download!",
        file = summary.filename,
        quality = summary.quality,
        orig = group_thousands(summary.original_size),
        orig_mb = summary.original_size as f64 / 1024.0 / 1024.0,
        comp = group_thousands(summary.compressed_size),
        comp_mb = summary.compressed_size as f64 / 1024.0 / 1024.0,
        savings = savings,
    )
}

/// 千位分组格式化（100000 -> "100,000"）
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
