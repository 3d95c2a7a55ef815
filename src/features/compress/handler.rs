use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::post,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use tracing::{debug, info};

use crate::error::AppError;
use crate::features::notify::{self, CompressionSummary};
use crate::state::AppState;

use super::encoder;
use super::models::{CompressRequest, CompressResponse, format_savings, output_filename};

/// 压缩接口路由
///
/// 方法分派即契约：POST 走压缩流程，OPTIONS 返回预检响应，
/// 其余方法一律 400 `Invalid request method`（不是默认的 405）。
pub fn create_compress_router() -> Router<AppState> {
    Router::new().route(
        "/compress",
        post(compress_image)
            .options(preflight)
            .fallback(invalid_method),
    )
}

/// CORS 预检响应（固定响应头由外层中间件统一附加）
async fn preflight() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

async fn invalid_method() -> AppError {
    AppError::InvalidMethod
}

/// imageData 的 base64 解码，容忍嵌入的空白字符
///
/// 分块/换行的 base64 载荷（data URL、邮件风格的 76 列折行）很常见，
/// 先剔除空白再用标准字母表严格解码；其余非法字符仍是 DecodeError。
fn decode_image_data(data: &str) -> Result<Vec<u8>, AppError> {
    let cleaned: Vec<u8> = data
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    BASE64
        .decode(&cleaned)
        .map_err(|e| AppError::Decode(e.to_string()))
}


#[utoipa::path(
    post,
    path = "/compress",
    summary = "压缩图片",
    description = "接收 base64 编码的图片与目标质量，重编码为 JPEG 后同步返回；同时尽力而为地投递一条体积变化通知（通知失败不影响响应）。",
    request_body(content = CompressRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "压缩成功", body = CompressResponse),
        (status = 400, description = "非 POST/OPTIONS 方法", body = crate::error::ErrorBody),
        (status = 500, description = "压缩失败", body = crate::error::ErrorBody),
    ),
    tag = "Compress"
)]
pub async fn compress_image(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CompressResponse>, AppError> {
    // 手动解析请求体：解析失败必须走契约固定的 500 `{"error": ...}`
    // 形态，而不是 Json 提取器默认的 4xx 拒绝。
    let req: CompressRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::Parse(e.to_string()))?;

    let original = decode_image_data(&req.image_data)?;

    debug!(
        filename = %req.filename,
        quality = req.quality,
        input_bytes = original.len(),
        "开始重编码"
    );

    // 重编码是 CPU 密集操作：放到阻塞线程池，并用信号量限制并发度。
    let permit = state
        .encode_semaphore
        .acquire()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let quality = req.quality;
    let (result, original) = tokio::task::spawn_blocking(move || {
        let result = encoder::recompress(&original, quality);
        (result, original)
    })
    .await
    .map_err(|e| AppError::Internal(format!("encode task panicked: {e}")))?;
    drop(permit);
    let compressed = result?;

    let original_size = original.len() as u64;
    let compressed_size = compressed.len() as u64;
    let compressed_b64 = BASE64.encode(&compressed);

    info!(
        filename = %req.filename,
        quality = req.quality,
        original_size,
        compressed_size,
        "重编码完成"
    );

    // 通知在响应返回前同步投递一次，失败被吞掉（尽力而为）。
    let summary = CompressionSummary {
        filename: req.filename.clone(),
        original_size,
        compressed_size,
        quality: req.quality,
    };
    notify::notify_compression(state.notifier.as_ref(), &summary).await;

    Ok(Json(CompressResponse {
        success: true,
        filename: output_filename(&req.filename, req.quality),
        original_size,
        compressed_size,
        image_data: compressed_b64,
        savings: format_savings(original_size, compressed_size),
    }))
}
