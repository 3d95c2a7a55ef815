use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 全局配置单例
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        3000
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API 路由前缀
    #[serde(default = "ApiConfig::default_prefix")]
    pub prefix: String,
}

impl ApiConfig {
    fn default_prefix() -> String {
        "/api/v1".to_string()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: Self::default_prefix(),
        }
    }
}

/// CORS 响应头配置
///
/// 与常规 CORS 中间件不同：接口契约要求这组头出现在**所有**响应上
/// （包括预检与错误响应），而不是仅在带 Origin 的请求上协商返回。
/// 因此这里只配置固定的头值，由 `cors::cors_headers_middleware` 统一附加。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Access-Control-Allow-Origin 的值
    #[serde(default = "CorsConfig::default_allow_origin")]
    pub allow_origin: String,
    /// Access-Control-Allow-Headers 的值
    #[serde(default = "CorsConfig::default_allow_headers")]
    pub allow_headers: String,
    /// Access-Control-Allow-Methods 的值
    #[serde(default = "CorsConfig::default_allow_methods")]
    pub allow_methods: String,
}

impl CorsConfig {
    fn default_allow_origin() -> String {
        "*".to_string()
    }

    fn default_allow_headers() -> String {
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token".to_string()
    }

    fn default_allow_methods() -> String {
        "POST, OPTIONS".to_string()
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: Self::default_allow_origin(),
            allow_headers: Self::default_allow_headers(),
            allow_methods: Self::default_allow_methods(),
        }
    }
}

/// 通知投递配置
///
/// topic/endpoint 缺失不会阻止服务启动：按契约通知是尽力而为的，
/// 配置缺失在投递时作为 NotifyError 记录日志后吞掉。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// 是否启用通知
    #[serde(default = "NotifyConfig::default_enabled")]
    pub enabled: bool,
    /// 通知主题标识（随消息一并投递给外部通道）
    #[serde(default)]
    pub topic: String,
    /// 投递端点 URL（HTTP webhook）
    #[serde(default)]
    pub endpoint: String,
    /// 投递超时（秒，缺省不设置超时）
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl NotifyConfig {
    fn default_enabled() -> bool {
        true
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            topic: String::new(),
            endpoint: String::new(),
            timeout_secs: None,
        }
    }
}

/// 重编码配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EncodeConfig {
    /// 并发重编码许可数（0=自动，取 CPU 核心数）
    #[serde(default)]
    pub max_parallel: u32,
}

impl EncodeConfig {
    /// 实际生效的并发许可数
    pub fn effective_parallel(&self) -> usize {
        let m = self.max_parallel as usize;
        if m == 0 { num_cpus::get() } else { m }
    }
}

/// 优雅退出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// 优雅退出超时时间（秒）
    #[serde(default = "ShutdownConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ShutdownConfig {
    fn default_timeout_secs() -> u64 {
        30
    }

    /// 超时时间的 Duration 形式
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    /// CORS 响应头配置
    #[serde(default)]
    pub cors: CorsConfig,
    /// 通知投递配置
    #[serde(default)]
    pub notify: NotifyConfig,
    /// 重编码配置
    #[serde(default)]
    pub encode: EncodeConfig,
    /// 优雅退出配置
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl AppConfig {
    /// 从配置文件加载配置，支持环境变量覆盖
    ///
    /// `config.toml` 允许缺失：所有字段都有默认值兜底，便于"解压即运行"。
    pub fn load() -> Result<Self, ConfigError> {
        let builder = ConfigBuilder::builder()
            .add_source(File::with_name("config").required(false))
            // 支持环境变量覆盖，例如：APP_NOTIFY_TOPIC
            .add_source(
                Environment::with_prefix("APP")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = builder.try_deserialize()?;
        Ok(config)
    }

    /// 获取全局配置单例
    pub fn global() -> &'static AppConfig {
        CONFIG.get().expect("配置未初始化，请先调用 init_global()")
    }

    /// 初始化全局配置
    pub fn init_global() -> Result<(), ConfigError> {
        let config = Self::load()?;
        CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("配置已经被初始化".to_string()))?;
        Ok(())
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
