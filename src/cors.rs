use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, header};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::config::CorsConfig;

/// 预构建的固定响应头集合
///
/// 契约要求压缩接口的**所有**响应（成功、失败、预检）都带同一组
/// CORS 头与 `Content-Type: application/json`，因此不走按 Origin 协商的
/// 常规 CORS 中间件，而是启动时构建一次、每个响应无条件附加。
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    pairs: Arc<Vec<(HeaderName, HeaderValue)>>,
}

/// 根据配置构建固定响应头集合
///
/// 配置中的非法头值会记录 warn 并回退到默认值，保证集合始终完整。
pub fn build_cors_headers(cors: &CorsConfig) -> CorsHeaders {
    let defaults = CorsConfig::default();

    let pairs = vec![
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            parse_value("allow_origin", &cors.allow_origin, &defaults.allow_origin),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            parse_value("allow_headers", &cors.allow_headers, &defaults.allow_headers),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            parse_value("allow_methods", &cors.allow_methods, &defaults.allow_methods),
        ),
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ),
    ];

    CorsHeaders {
        pairs: Arc::new(pairs),
    }
}

fn parse_value(label: &str, raw: &str, fallback: &str) -> HeaderValue {
    match HeaderValue::from_str(raw.trim()) {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!("CORS {} 含无效值: {:?}，回退默认值", label, raw);
            HeaderValue::from_str(fallback).expect("默认 CORS 头值必须合法")
        }
    }
}

/// 给响应附加固定头集合的中间件（仅挂在压缩 API 子路由上）
pub async fn cors_headers_middleware(
    State(headers): State<CorsHeaders>,
    req: Request,
    next: Next,
) -> Response {
    let mut res = next.run(req).await;
    for (name, value) in headers.pairs.iter() {
        res.headers_mut().insert(name.clone(), value.clone());
    }
    res
}
