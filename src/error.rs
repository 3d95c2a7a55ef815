use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 应用统一错误类型
///
/// 错误文案即线上契约的一部分：调用方（前端）直接展示 `error` 字段，
/// 其中压缩链路的错误统一带 `Compression failed:` 前缀，方法错误固定为
/// `Invalid request method`，不做本地化。
#[derive(Error, Debug)]
pub enum AppError {
    /// 请求体 JSON 解析错误
    #[error("Compression failed: invalid request body: {0}")]
    Parse(String),

    /// imageData 的 base64 解码错误
    #[error("Compression failed: invalid base64 image data: {0}")]
    Decode(String),

    /// 输入字节无法按任何已知栅格格式解码
    #[error("Compression failed: unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// JPEG 编码失败（含编码器拒绝 quality 参数）
    #[error("Compression failed: jpeg encode error: {0}")]
    Encode(String),

    /// 非 POST/OPTIONS 方法
    #[error("Invalid request method")]
    InvalidMethod,

    /// 内部服务器错误
    #[error("{0}")]
    Internal(String),
}

/// 错误响应体（契约固定为 `{"error": "<message>"}`）
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// 人类可读的错误信息
    #[schema(example = "Compression failed: unsupported image format: ...")]
    pub error: String,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidMethod => StatusCode::BAD_REQUEST,
            AppError::Parse(_)
            | AppError::Decode(_)
            | AppError::UnsupportedFormat(_)
            | AppError::Encode(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };

        let mut res = Json(body).into_response();
        *res.status_mut() = status;
        res
    }
}

/// 通知投递错误类型
///
/// 永远不会转换为 HTTP 响应：调用方记录日志后吞掉（尽力而为语义）。
#[derive(Error, Debug)]
pub enum NotifyError {
    /// 通知通道未配置（topic 或 endpoint 为空）
    #[error("通知通道未配置: {0}")]
    Unconfigured(String),

    /// 网络请求错误
    #[error("网络错误: {0}")]
    Network(String),

    /// 端点返回了非成功状态
    #[error("端点拒绝: HTTP {0}")]
    Rejected(u16),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Network(err.to_string())
    }
}
