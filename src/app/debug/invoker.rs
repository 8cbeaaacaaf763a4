//! 诊断命令执行
//!
//! 直接以 argv 启动进程，不经过 shell。

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// 命令输出
#[derive(Debug, Clone)]
pub struct Output {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

/// 命令执行接口，便于在测试中替换
#[async_trait]
pub trait CommandInvoker: Send + Sync {
    async fn invoke(&self, argv: &[String]) -> std::io::Result<Output>;
}

/// 基于 tokio::process 的实现
pub struct ProcessInvoker;

#[async_trait]
impl CommandInvoker for ProcessInvoker {
    async fn invoke(&self, argv: &[String]) -> std::io::Result<Output> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty argv")
        })?;

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?
            .wait_with_output()
            .await?;

        Ok(Output {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_argv_is_rejected() {
        let err = ProcessInvoker.invoke(&[]).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn arguments_are_not_shell_expanded() {
        let argv = vec!["echo".to_string(), "$HOME; ls".to_string()];
        let output = ProcessInvoker.invoke(&argv).await.unwrap();
        assert_eq!(output.status, 0);
        assert_eq!(output.stdout.trim_end(), "$HOME; ls");
    }
}
