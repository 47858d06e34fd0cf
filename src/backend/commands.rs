//! 外部平台工具调用（system_profiler / ping）
//!
//! 工具被视为不透明命令：这里只负责调用、超时与把失败变成类型化错误，
//! 文本输出交给 parsing 模块。

use std::process::Output;
use std::time::Duration;

use tokio::process::Command;

use crate::{Error, Result};

/// 运行 `system_profiler SPAirPortDataType`，返回完整的 Wi-Fi 清单文本
pub(super) async fn airport_inventory(timeout: Duration) -> Result<String> {
    let mut cmd = Command::new("system_profiler");
    cmd.arg("SPAirPortDataType");

    let output = run_with_timeout(&mut cmd, timeout, "system_profiler").await?;
    Ok(String::from_utf8(output.stdout)?)
}

/// 运行 `ping -c <count> <host>`，返回其完整输出
pub(super) async fn run_ping(host: &str, count: u32, timeout: Duration) -> Result<String> {
    let mut cmd = Command::new("ping");
    cmd.arg("-c").arg(count.to_string()).arg(host);

    let output = run_with_timeout(&mut cmd, timeout, "ping").await?;
    Ok(String::from_utf8(output.stdout)?)
}

/// 带超时地执行一个命令；非零退出码视为失败
async fn run_with_timeout(
    cmd: &mut Command,
    timeout: Duration,
    tool: &'static str,
) -> Result<Output> {
    // kill_on_drop：超时后不要留下孤儿进程
    let fut = cmd.kill_on_drop(true).output();

    let output = tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| Error::CommandTimeout(tool))??;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::CommandFailed(format!(
            "{} exited with {}: {}",
            tool,
            output.status,
            stderr.trim()
        )));
    }

    Ok(output)
}
