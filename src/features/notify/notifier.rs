use futures_util::future::BoxFuture;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::config::NotifyConfig;
use crate::error::NotifyError;

/// 通知投递的抽象接口
///
/// 以显式依赖的形式注入 handler（而非进程级全局句柄），
/// 方便测试时替换为记录型/故障型实现。
pub trait NotificationPublisher: Send + Sync {
    /// 向预配置的主题投递一条消息
    fn publish<'a>(
        &'a self,
        subject: &'a str,
        message: &'a str,
    ) -> BoxFuture<'a, Result<(), NotifyError>>;
}

/// webhook 投递请求体
#[derive(Debug, Serialize)]
struct PublishPayload<'a> {
    topic: &'a str,
    subject: &'a str,
    message: &'a str,
}

/// 基于 HTTP webhook 的通知实现
///
/// topic 与 endpoint 来自进程启动时的配置；缺失不报启动错误，
/// 而是在投递时返回 `NotifyError::Unconfigured`（由调用方吞掉）。
pub struct WebhookNotifier {
    client: Client,
    topic: String,
    endpoint: String,
}

impl WebhookNotifier {
    /// 根据配置构建通知器
    ///
    /// 未配置 timeout 时不设置超时（沿用原始行为；慢投递是已接受的外部风险）。
    pub fn new(config: &NotifyConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            topic: config.topic.clone(),
            endpoint: config.endpoint.clone(),
        })
    }
}

impl NotificationPublisher for WebhookNotifier {
    fn publish<'a>(
        &'a self,
        subject: &'a str,
        message: &'a str,
    ) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move {
            if self.topic.is_empty() {
                return Err(NotifyError::Unconfigured("notify.topic 为空".to_string()));
            }
            if self.endpoint.is_empty() {
                return Err(NotifyError::Unconfigured(
                    "notify.endpoint 为空".to_string(),
                ));
            }

            let payload = PublishPayload {
                topic: &self.topic,
                subject,
                message,
            };

            let res = self
                .client
                .post(&self.endpoint)
                .json(&payload)
                .send()
                .await?;

            if !res.status().is_success() {
                return Err(NotifyError::Rejected(res.status().as_u16()));
            }
            Ok(())
        })
    }
}

/// 关闭通知时使用的空实现
pub struct NoopNotifier;

impl NotificationPublisher for NoopNotifier {
    fn publish<'a>(
        &'a self,
        _subject: &'a str,
        _message: &'a str,
    ) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationPublisher, WebhookNotifier};
    use crate::config::NotifyConfig;
    use crate::error::NotifyError;

    #[tokio::test]
    async fn publish_without_topic_is_unconfigured_error() {
        let notifier = WebhookNotifier::new(&NotifyConfig {
            endpoint: "http://127.0.0.1:9/publish".to_string(),
            ..NotifyConfig::default()
        })
        .expect("build notifier");

        let err = notifier
            .publish("Compressed: x.png", "body")
            .await
            .expect_err("expected unconfigured");
        assert!(matches!(err, NotifyError::Unconfigured(_)));
    }

    #[tokio::test]
    async fn publish_to_unreachable_endpoint_is_network_error() {
        // 端口 0 不可连接，send() 必然失败。
        let notifier = WebhookNotifier::new(&NotifyConfig {
            topic: "image-events".to_string(),
            endpoint: "http://127.0.0.1:0/publish".to_string(),
            ..NotifyConfig::default()
        })
        .expect("build notifier");

        let err = notifier
            .publish("Compressed: x.png", "body")
            .await
            .expect_err("expected network error");
        assert!(matches!(err, NotifyError::Network(_)));
    }
}
