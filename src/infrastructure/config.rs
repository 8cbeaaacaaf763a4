//! 配置基础设施
//!
//! 配置从 TOML 文件加载，缺省的段落使用默认值，
//! 随后应用环境变量覆盖（`PORT`、`DATABASE_URL`）。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 指定配置文件路径的环境变量
pub const CONFIG_ENV: &str = "CATALOG_CONFIG";

/// 未指定路径时依次尝试的配置文件
const CONFIG_PATHS: [&str; 2] = ["catalog.toml", "config/catalog.toml"];

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 诊断路由配置
    pub debug: DebugConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
    /// 静态文件目录
    pub static_dir: PathBuf,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite 连接串
    pub url: String,
    /// 连接池最大连接数
    pub max_connections: u32,
    /// 启动时清空并重新写入示例数据
    pub reset_on_start: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

/// 诊断路由配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// 关闭时 /debug/* 一律返回 404
    pub enabled: bool,
    /// 命令名 -> argv，只有表中的命令可以执行
    pub commands: BTreeMap<String, Vec<String>>,
    /// 命令执行超时（秒）
    pub exec_timeout_seconds: u64,
    /// 允许抓取的主机名
    pub allowed_hosts: Vec<String>,
    /// 抓取超时（秒）
    pub fetch_timeout_seconds: u64,
    /// 抓取响应体的最大字节数
    pub max_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
            timeout_seconds: 30,
            static_dir: PathBuf::from("public"),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://catalog.db".to_string(),
            max_connections: 5,
            reset_on_start: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        let commands = [
            ("date", vec!["date"]),
            ("uptime", vec!["uptime"]),
            ("whoami", vec!["whoami"]),
            ("uname", vec!["uname", "-a"]),
        ]
        .into_iter()
        .map(|(name, argv)| {
            (
                name.to_string(),
                argv.into_iter().map(str::to_string).collect(),
            )
        })
        .collect();

        Self {
            enabled: false,
            commands,
            exec_timeout_seconds: 10,
            allowed_hosts: Vec::new(),
            fetch_timeout_seconds: 10,
            max_body_bytes: 64 * 1024,
        }
    }
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(port) = std::env::var("PORT") {
            self.http.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Validation(format!("invalid PORT: {port}")))?;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation("http.port must be > 0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation(
                "http.bind_address must not be empty".to_string(),
            ));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "http.timeout_seconds must be > 0".to_string(),
            ));
        }
        if self.database.url.is_empty() {
            return Err(ConfigError::Validation(
                "database.url must not be empty".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be > 0".to_string(),
            ));
        }
        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "invalid logging.level: {}, expected one of {:?}",
                self.logging.level, VALID_LEVELS
            )));
        }
        if let Some((name, _)) = self.debug.commands.iter().find(|(_, argv)| argv.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "debug.commands.{name} has an empty argv"
            )));
        }
        if self.debug.exec_timeout_seconds == 0 || self.debug.fetch_timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "debug timeouts must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(String),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Validation(String),
}

/// 从文件或默认值加载配置，并应用环境变量覆盖、校验
///
/// 同时返回所用配置文件的路径，没有找到文件时为 `None`。
pub fn load_config() -> Result<(Config, Option<PathBuf>), ConfigError> {
    load_config_in(Path::new(""))
}

/// 查找顺序：`CATALOG_CONFIG` 指定的文件，然后是 `base` 下的 [`CONFIG_PATHS`]
fn find_config_file(base: &Path) -> Option<PathBuf> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => Some(PathBuf::from(path)),
        Err(_) => CONFIG_PATHS
            .iter()
            .map(|p| base.join(p))
            .find(|p| p.exists()),
    }
}

fn load_config_in(base: &Path) -> Result<(Config, Option<PathBuf>), ConfigError> {
    let source = find_config_file(base);

    let mut config = match &source {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    config.apply_env_overrides()?;
    config.validate()?;
    Ok((config, source))
}
