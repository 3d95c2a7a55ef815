//! 优雅退出管理模块
//!
//! 监听 SIGINT/SIGTERM（Windows 下为 Ctrl+C），把首个信号转换成
//! 一次性的退出事件，供 HTTP 服务器的 graceful shutdown 等待。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tracing::{debug, info};

/// 退出原因
#[derive(Debug, Clone, Copy)]
pub enum ShutdownReason {
    /// 用户中断信号 (Ctrl+C)
    Interrupt,
    /// 终止信号 (SIGTERM)
    Terminate,
    /// 应用请求退出
    Application,
}

/// 优雅退出管理器
#[derive(Debug, Clone)]
pub struct ShutdownManager {
    inner: Arc<ShutdownInner>,
}

#[derive(Debug)]
struct ShutdownInner {
    /// 退出事件通知器
    notify: Notify,
    /// 首个退出原因（此后的重复触发被忽略）
    reason: std::sync::Mutex<Option<ShutdownReason>>,
    /// 是否已经开始退出
    shutting_down: AtomicBool,
}

impl ShutdownManager {
    /// 创建新的优雅退出管理器
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ShutdownInner {
                notify: Notify::new(),
                reason: std::sync::Mutex::new(None),
                shutting_down: AtomicBool::new(false),
            }),
        }
    }

    /// 等待退出信号，返回退出原因
    pub async fn wait_for_shutdown(&self) -> ShutdownReason {
        // 先注册等待者再检查标志：若 trigger 恰好发生在检查与 await
        // 之间，notify_waiters 也不会丢失这次唤醒。
        let mut notified = std::pin::pin!(self.inner.notify.notified());
        notified.as_mut().enable();
        if !self.is_shutting_down() {
            notified.await;
        }
        self.inner
            .reason
            .lock()
            .ok()
            .and_then(|g| *g)
            .unwrap_or(ShutdownReason::Application)
    }

    /// 触发优雅退出（只有首次触发生效）
    pub fn trigger_shutdown(&self, reason: ShutdownReason) {
        let first = self
            .inner
            .shutting_down
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();

        if !first {
            debug!("重复的退出信号被忽略: {:?}", reason);
            return;
        }

        info!("触发优雅退出: {:?}", reason);
        if let Ok(mut guard) = self.inner.reason.lock() {
            *guard = Some(reason);
        }
        self.inner.notify.notify_waiters();
    }

    /// 检查是否正在关闭
    pub fn is_shutting_down(&self) -> bool {
        self.inner.shutting_down.load(Ordering::SeqCst)
    }

    /// 启动信号处理器
    ///
    /// Unix 上监听 SIGINT 与 SIGTERM，Windows 上监听 Ctrl+C。
    pub fn start_signal_handler(&self) -> Result<(), ShutdownError> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigint = signal(SignalKind::interrupt())
                .map_err(|e| ShutdownError::SignalSetup(e.to_string()))?;
            let mut sigterm = signal(SignalKind::terminate())
                .map_err(|e| ShutdownError::SignalSetup(e.to_string()))?;

            let manager = self.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("接收到SIGINT信号 (Ctrl+C)");
                        manager.trigger_shutdown(ShutdownReason::Interrupt);
                    }
                    _ = sigterm.recv() => {
                        info!("接收到SIGTERM信号");
                        manager.trigger_shutdown(ShutdownReason::Terminate);
                    }
                }
            });
        }

        #[cfg(windows)]
        {
            let manager = self.clone();
            tokio::spawn(async move {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("监听Ctrl+C信号失败: {}", e);
                    return;
                }
                info!("接收到Ctrl+C信号");
                manager.trigger_shutdown(ShutdownReason::Interrupt);
            });
        }

        Ok(())
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

/// 优雅退出错误类型
#[derive(Debug, thiserror::Error)]
pub enum ShutdownError {
    #[error("信号设置失败: {0}")]
    SignalSetup(String),
}

#[cfg(test)]
mod tests {
    use super::{ShutdownManager, ShutdownReason};

    #[tokio::test]
    async fn trigger_then_wait_returns_immediately() {
        let manager = ShutdownManager::new();
        assert!(!manager.is_shutting_down());

        manager.trigger_shutdown(ShutdownReason::Application);
        assert!(manager.is_shutting_down());

        let reason = manager.wait_for_shutdown().await;
        assert!(matches!(reason, ShutdownReason::Application));
    }

    #[tokio::test]
    async fn pending_waiter_is_woken_by_later_trigger() {
        use std::time::Duration;

        let manager = ShutdownManager::new();
        let waiter = tokio::spawn({
            let m = manager.clone();
            async move { m.wait_for_shutdown().await }
        });

        // 让等待任务先跑起来再触发
        tokio::task::yield_now().await;
        manager.trigger_shutdown(ShutdownReason::Terminate);

        let reason = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake instead of hanging")
            .expect("join waiter");
        assert!(matches!(reason, ShutdownReason::Terminate));
    }

    #[tokio::test]
    async fn only_first_trigger_wins() {
        let manager = ShutdownManager::new();
        manager.trigger_shutdown(ShutdownReason::Interrupt);
        manager.trigger_shutdown(ShutdownReason::Terminate);

        let reason = manager.wait_for_shutdown().await;
        assert!(matches!(reason, ShutdownReason::Interrupt));
    }
}
