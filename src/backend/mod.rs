//! RoomSignal 平台后端 —— system_profiler / ping 实现
//!
//! 本模块管理 Wi-Fi 清单获取和可达性探测。
//! 数据来自平台工具的文本输出：`system_profiler SPAirPortDataType`
//! 提供当前连接和附近网络，系统 `ping` 提供延迟统计。

mod commands;
pub mod parsing;

use std::time::Duration;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::structs::{LatencySample, NetworkReading};
use crate::traits::{LatencyProbe, WifiSource};
use crate::Result;

/// 通过 `system_profiler SPAirPortDataType` 获取 Wi-Fi 清单的数据源
pub struct SystemProfilerSource {
    timeout: Duration,
}

impl SystemProfilerSource {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            timeout: config.scan.timeout(),
        }
    }
}

#[async_trait]
impl WifiSource for SystemProfilerSource {
    async fn scan(&self) -> Result<(Option<NetworkReading>, Vec<NetworkReading>)> {
        tracing::debug!("Invoking system_profiler for Wi-Fi inventory...");
        let raw = commands::airport_inventory(self.timeout).await?;
        Ok(parsing::parse_wifi_data(&raw))
    }
}

/// 单次探测的 ping 包数上限
const MAX_PING_COUNT: u32 = 10;

/// 基于系统 ping 命令的可达性探测
pub struct PingProbe {
    timeout: Duration,
}

impl PingProbe {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            timeout: config.latency.timeout(),
        }
    }
}

#[async_trait]
impl LatencyProbe for PingProbe {
    async fn measure(&self, host: &str, count: u32) -> LatencySample {
        let count = count.clamp(1, MAX_PING_COUNT);
        tracing::debug!(host, count, "Measuring latency via ping...");

        match commands::run_ping(host, count, self.timeout).await {
            Ok(output) => parsing::parse_ping_summary(&output, host),
            Err(e) => {
                // 探测失败不致命：错误装进样本，打分时跳过延迟因子
                tracing::warn!("Latency probe failed: {}", e);
                LatencySample::failed(host, e.to_string())
            }
        }
    }
}
