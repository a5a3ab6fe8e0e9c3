// ==========================================
// 急诊就诊统计引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、覆写管理
// 优先级: 默认值 < JSON 配置文件 < 环境变量
// ==========================================

use crate::config::calendar_config::CalendarConfig;
use crate::config::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const NIGHT_START_HOUR: &str = "ED_ANALYTICS_NIGHT_START_HOUR";
    pub const NIGHT_END_HOUR: &str = "ED_ANALYTICS_NIGHT_END_HOUR";
    pub const SHIFT_START_HOUR: &str = "ED_ANALYTICS_SHIFT_START_HOUR";
    pub const LOCALE: &str = "ED_ANALYTICS_LOCALE";
    pub const COMPLETENESS_RATIO: &str = "ED_ANALYTICS_COMPLETENESS_RATIO";
    /// 配置文件路径覆写
    pub const CONFIG_PATH: &str = "ED_ANALYTICS_CONFIG";
}

/// 应用目录名
const APP_DIR: &str = "ed-visit-analytics";
const CONFIG_FILE: &str = "config.json";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    config: CalendarConfig,
    source_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 仅使用默认值
    pub fn with_defaults() -> Self {
        Self {
            config: CalendarConfig::default(),
            source_path: None,
        }
    }

    /// 默认配置文件路径: <config_dir>/ed-visit-analytics/config.json
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// 按完整优先级加载: 默认值 → 配置文件 → 环境变量
    ///
    /// 配置文件不存在不算错误。
    pub fn load() -> ConfigResult<Self> {
        let path = std::env::var(config_keys::CONFIG_PATH)
            .ok()
            .map(PathBuf::from)
            .or_else(Self::default_config_path);

        let mut manager = match path {
            Some(p) if p.exists() => Self::from_file(&p)?,
            _ => Self::with_defaults(),
        };
        manager.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(manager)
    }

    /// 从 JSON 文件加载（缺失字段取默认值）
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        let config: CalendarConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;

        tracing::info!("已加载配置文件: {}", path.display());
        Ok(Self {
            config,
            source_path: Some(path.to_path_buf()),
        })
    }

    /// 应用覆写
    ///
    /// # 参数
    /// - lookup: 按键取值的函数（生产环境为环境变量）
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut next = self.config.clone();

        if let Some(v) = lookup(config_keys::NIGHT_START_HOUR) {
            next.night_start_hour = parse_hour(config_keys::NIGHT_START_HOUR, &v)?;
        }
        if let Some(v) = lookup(config_keys::NIGHT_END_HOUR) {
            next.night_end_hour = parse_hour(config_keys::NIGHT_END_HOUR, &v)?;
        }
        if let Some(v) = lookup(config_keys::SHIFT_START_HOUR) {
            next.shift_start_hour = parse_hour(config_keys::SHIFT_START_HOUR, &v)?;
        }
        if let Some(v) = lookup(config_keys::LOCALE) {
            next.locale = v.trim().to_string();
        }
        if let Some(v) = lookup(config_keys::COMPLETENESS_RATIO) {
            next.completeness_ratio =
                v.trim()
                    .parse::<f64>()
                    .map_err(|e| ConfigError::InvalidValue {
                        key: config_keys::COMPLETENESS_RATIO.to_string(),
                        value: v.clone(),
                        message: e.to_string(),
                    })?;
        }

        // 整体校验通过后再替换，避免半更新
        next.validate()?;
        if next != self.config {
            tracing::debug!("配置覆写生效: {}", next.cache_key_fragment());
        }
        self.config = next;
        Ok(())
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    pub fn into_config(self) -> CalendarConfig {
        self.config
    }

    /// 配置来源文件
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}

fn parse_hour(key: &str, value: &str) -> ConfigResult<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            message: e.to_string(),
        })
}
