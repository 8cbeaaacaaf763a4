//! 诊断服务
//!
//! 命令只能从配置的命令表中按名字选择，抓取只允许配置的主机。

use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::fetcher::{Fetched, HttpFetcher, UrlFetcher};
use super::invoker::{CommandInvoker, Output, ProcessInvoker};
use crate::core::error::CoreError;
use crate::infrastructure::config::DebugConfig;

#[derive(Clone)]
pub struct DiagnosticsService {
    config: Arc<DebugConfig>,
    invoker: Arc<dyn CommandInvoker>,
    fetcher: Arc<dyn UrlFetcher>,
}

impl DiagnosticsService {
    pub fn new(config: DebugConfig) -> Result<Self, CoreError> {
        let fetcher = HttpFetcher::new(
            Duration::from_secs(config.fetch_timeout_seconds),
            config.max_body_bytes,
        )
        .map_err(|e| CoreError::Internal(format!("failed to build http client: {e}")))?;

        Ok(Self::with_backends(
            config,
            Arc::new(ProcessInvoker),
            Arc::new(fetcher),
        ))
    }

    pub fn with_backends(
        config: DebugConfig,
        invoker: Arc<dyn CommandInvoker>,
        fetcher: Arc<dyn UrlFetcher>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            invoker,
            fetcher,
        }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// 按名字执行诊断命令
    pub async fn run_command(&self, name: &str) -> Result<Output, CoreError> {
        let argv = self.config.commands.get(name).ok_or_else(|| {
            warn!(command = %name, "refused diagnostic command");
            let allowed: Vec<&str> = self.config.commands.keys().map(String::as_str).collect();
            CoreError::Forbidden(format!(
                "Command '{name}' is not allowed. Allowed: {}",
                allowed.join(", ")
            ))
        })?;

        let timeout = self.config.exec_timeout_seconds;
        let output = tokio::time::timeout(Duration::from_secs(timeout), self.invoker.invoke(argv))
            .await
            .map_err(|_| CoreError::Timeout(timeout))?
            .map_err(|e| CoreError::Internal(format!("failed to run '{name}': {e}")))?;

        info!(command = %name, status = output.status, "ran diagnostic command");
        Ok(output)
    }

    /// 校验 URL：必须是 http(s)，且主机在白名单中
    pub fn check_url(&self, raw: &str) -> Result<Url, CoreError> {
        let url = Url::parse(raw).map_err(|e| CoreError::BadRequest(format!("Invalid URL: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::BadRequest(
                "Only http and https URLs can be fetched.".to_string(),
            ));
        }

        let host = url.host_str().unwrap_or_default();
        if !self
            .config
            .allowed_hosts
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(host))
        {
            warn!(host = %host, "refused fetch to host outside allowlist");
            return Err(CoreError::Forbidden(format!(
                "Host '{host}' is not in the fetch allowlist."
            )));
        }

        Ok(url)
    }

    pub async fn fetch(&self, raw: &str) -> Result<Fetched, CoreError> {
        let url = self.check_url(raw)?;
        let host = url.host_str().unwrap_or_default().to_string();

        let fetched = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| CoreError::Upstream(e.to_string()))?;

        info!(
            host = %host,
            status = fetched.status,
            bytes = fetched.body.len(),
            truncated = fetched.truncated,
            "fetched url"
        );
        Ok(fetched)
    }
}
