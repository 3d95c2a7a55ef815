use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::features::notify::NotificationPublisher;

/// 聚合的应用共享状态
///
/// 不含任何跨请求的业务数据：每个请求独立、无状态，
/// 这里只放显式注入的协作方与资源限制。
#[derive(Clone)]
pub struct AppState {
    /// 通知投递器（显式注入，测试时可替换为 mock）
    pub notifier: Arc<dyn NotificationPublisher>,
    /// 控制并发重编码的信号量（限制 CPU 密集型任务数量）
    pub encode_semaphore: Arc<Semaphore>,
}
