use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// 日志订阅器配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 是否以 JSON 格式输出
    pub json: bool,

    /// 未设置 RUST_LOG 时的默认过滤指令
    pub default_directive: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            default_directive: "info".to_string(),
        }
    }
}

/// 初始化全局日志订阅器
///
/// 进程内只能调用一次，重复调用会返回错误。
pub fn init(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_directive));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.json {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow!("Failed to init logging: {}", e))?;
    } else {
        builder
            .try_init()
            .map_err(|e| anyhow!("Failed to init logging: {}", e))?;
    }

    Ok(())
}
