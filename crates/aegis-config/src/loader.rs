use anyhow::{anyhow, Result};
use config::{Config, File, FileFormat};
use std::path::{Path, PathBuf};

use crate::GlobalConfig;

/// 配置加载器
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// 创建配置加载器
    pub fn new<P: AsRef<Path>>(config_dir: P) -> Self {
        Self {
            config_dir: config_dir.as_ref().to_path_buf(),
        }
    }

    /// 加载全局配置
    pub fn load_global(&self) -> Result<GlobalConfig> {
        let config_path = self.config_dir.join("global.toml");

        if !config_path.exists() {
            // 如果配置文件不存在，返回默认配置
            return Ok(GlobalConfig::default());
        }

        let config = Config::builder()
            .add_source(File::new(
                config_path.to_str().ok_or_else(|| anyhow!("Invalid config path"))?,
                FileFormat::Toml,
            ))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        let global = self.load_global()?;

        if global.session.ttl_ms <= 0 {
            return Err(anyhow!("session.ttl_ms must be greater than 0"));
        }

        if global.session.cleanup_interval_ms == 0 {
            return Err(anyhow!("session.cleanup_interval_ms must be greater than 0"));
        }

        if global.session.creation_window_ms <= 0 || global.session.max_creations_per_window == 0 {
            return Err(anyhow!(
                "session creation rate rule requires a positive window and at least 1 creation"
            ));
        }

        if global.rate_limit.window_ms <= 0 {
            return Err(anyhow!("rate_limit.window_ms must be greater than 0"));
        }

        if global.rate_limit.max_requests == 0 {
            return Err(anyhow!("rate_limit.max_requests must be greater than 0"));
        }

        if global.brute_force.max_attempts == 0 {
            return Err(anyhow!("brute_force.max_attempts must be greater than 0"));
        }

        if global.brute_force.lockout_duration_ms <= 0 {
            return Err(anyhow!("brute_force.lockout_duration_ms must be greater than 0"));
        }

        Ok(())
    }
}
