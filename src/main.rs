use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use imgsquash_backend::config::AppConfig;
use imgsquash_backend::cors::{build_cors_headers, cors_headers_middleware};
use imgsquash_backend::features::compress::{self, CompressRequest, CompressResponse};
use imgsquash_backend::features::health::health_check;
use imgsquash_backend::features::notify::{NoopNotifier, NotificationPublisher, WebhookNotifier};
use imgsquash_backend::shutdown::ShutdownManager;
use imgsquash_backend::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        imgsquash_backend::features::compress::handler::compress_image,
        imgsquash_backend::features::health::handler::health_check,
    ),
    components(
        schemas(
            CompressRequest,
            CompressResponse,
            imgsquash_backend::error::ErrorBody,
            imgsquash_backend::features::health::handler::HealthResponse,
        )
    ),
    tags(
        (name = "Compress", description = "Compress APIs"),
        (name = "Health", description = "Health APIs"),
    ),
    info(
        title = "Imgsquash Backend API",
        version = "0.1.0",
        description = "Image compression backend service (Axum)"
    )
)]
pub struct ApiDoc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imgsquash_backend=info,tower_http=info".into()),
        )
        .init();

    // 创建优雅退出管理器
    let shutdown_manager = ShutdownManager::new();

    // Load config
    if let Err(e) = AppConfig::init_global() {
        tracing::error!("Config init failed: {}", e);
        std::process::exit(1);
    }
    let config = AppConfig::global();

    // 启动信号处理器
    if let Err(e) = shutdown_manager.start_signal_handler() {
        tracing::error!("信号处理器启动失败: {}", e);
        std::process::exit(1);
    }

    // 通知投递器：配置缺失不阻止启动，投递时按失败吞掉
    let notifier: Arc<dyn NotificationPublisher> = if config.notify.enabled {
        if config.notify.topic.is_empty() || config.notify.endpoint.is_empty() {
            tracing::warn!("通知已启用但 notify.topic/notify.endpoint 未配置，投递将失败并被忽略");
        }
        match WebhookNotifier::new(&config.notify) {
            Ok(n) => Arc::new(n),
            Err(e) => {
                tracing::warn!("通知客户端初始化失败：{}（通知将被关闭）", e);
                Arc::new(NoopNotifier)
            }
        }
    } else {
        Arc::new(NoopNotifier)
    };

    // Shared state
    let app_state = AppState {
        notifier,
        encode_semaphore: Arc::new(Semaphore::new(config.encode.effective_parallel())),
    };

    // Routes
    let cors_headers = build_cors_headers(&config.cors);
    let api_router = compress::create_compress_router().layer(
        axum::middleware::from_fn_with_state(cors_headers, cors_headers_middleware),
    );

    let app = Router::new()
        .route("/health", get(health_check))
        .nest(&config.api.prefix, api_router)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
        // 响应压缩：base64 载荷的 JSON 响应压缩收益明显
        .layer(CompressionLayer::new());

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Bind address failed {}: {}", addr, e);
            std::process::exit(1);
        });

    tracing::info!("Server: http://{}", addr);
    tracing::info!("Docs: http://{}/docs", addr);
    tracing::info!("Health: http://{}/health", addr);
    tracing::info!("Compress API: http://{}{}/compress", addr, config.api.prefix);

    // 运行服务器直到收到退出信号
    let shutdown_timeout = config.shutdown.timeout_duration();
    let graceful = axum::serve(listener, app).with_graceful_shutdown(async move {
        let reason = shutdown_manager.wait_for_shutdown().await;
        tracing::info!("接收到退出信号: {:?}，开始优雅关闭HTTP服务器...", reason);

        // 超时兜底：在途请求悬挂时不无限等待
        tokio::spawn(async move {
            tokio::time::sleep(shutdown_timeout).await;
            tracing::warn!("优雅退出超时（{}秒），强制退出", shutdown_timeout.as_secs());
            std::process::exit(1);
        });
    });

    if let Err(e) = graceful.await {
        tracing::error!("服务器运行错误: {}", e);
        std::process::exit(1);
    }

    tracing::info!("服务器已优雅关闭");
}
