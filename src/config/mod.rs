// ==========================================
// 急诊就诊统计引擎 - 配置层
// ==========================================
// 职责: 日历/业务规则配置，支持文件与环境变量多级覆写
// ==========================================

pub mod calendar_config;
pub mod config_manager;
pub mod error;

// 重导出核心配置
pub use calendar_config::{CalendarConfig, DEFAULT_COMPLETENESS_RATIO};
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
