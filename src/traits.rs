use async_trait::async_trait;
use std::borrow::Cow;

use crate::structs::{LatencySample, NetworkReading};

// 在这里定义为后端和前端共享的 trait。

/// 平台 Wi-Fi 数据源接口。
/// 实现负责调用平台工具并把文本输出解析成结构化读数。
#[async_trait]
pub trait WifiSource: Send + Sync {
    /// Performs one scan.
    ///
    /// # Returns
    /// The current connection (if any) plus nearby networks, in the order
    /// the platform tool reported them.
    async fn scan(&self) -> crate::Result<(Option<NetworkReading>, Vec<NetworkReading>)>;
}

/// 可达性探测接口，用于给当前连接的延迟打分。
#[async_trait]
pub trait LatencyProbe: Send + Sync {
    /// Pings `host` `count` times.
    ///
    /// Failures (unreachable host, missing tool) are reported inside the
    /// sample's `error` field, never as an `Err`.
    async fn measure(&self, host: &str, count: u32) -> LatencySample;
}

/// 前端资源提供者接口。
#[async_trait]
pub trait UiAssetProvider: Send + Sync {
    /// Retrieves a single UI asset.
    ///
    /// # Arguments
    /// * `path` - The path to the asset (e.g., "index.html", "style.css").
    ///
    /// # Returns
    /// A `Result` containing a tuple of (`Cow<'static, [u8]>`, `String`)
    /// representing the asset's content and its MIME type, or an `Error` if not found.
    /// 获取单个 UI 资源。
    async fn get_asset(&self, path: &str) -> crate::Result<(Cow<'static, [u8]>, String)>;
}
