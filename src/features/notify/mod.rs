mod message;
mod notifier;

pub use message::{CompressionSummary, format_message, subject_line};
pub use notifier::{NoopNotifier, NotificationPublisher, WebhookNotifier};

use tracing::{debug, warn};

/// 投递一条压缩结果通知（尽力而为）
///
/// 任何投递失败只记录 warn，绝不向调用方传播：压缩是否成功与
/// 通知是否送达是两件事，后者不允许影响 HTTP 响应。
pub async fn notify_compression(notifier: &dyn NotificationPublisher, summary: &CompressionSummary) {
    let subject = subject_line(&summary.filename);
    let message = format_message(summary);

    match notifier.publish(&subject, &message).await {
        Ok(()) => debug!("通知已投递: {}", subject),
        Err(e) => warn!("通知投递失败（已忽略）: {}", e),
    }
}
