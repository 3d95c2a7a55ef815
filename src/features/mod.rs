/// 图片压缩功能模块
pub mod compress;

/// 健康检查模块
pub mod health;

/// 通知投递模块
pub mod notify;
