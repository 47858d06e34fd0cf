//! RoomSignal —— 房间 Wi-Fi 信号分析器核心库
//!
//! 这个库提供了 `run_roomsignal()` 函数，封装了整个服务流程：
//! 1. 加载配置并创建平台后端（system_profiler / ping）
//! 2. 启动 Web 服务器，提供扫描、延迟测试与仪表盘页面
//! 3. 每次扫描请求触发一次工具调用、一次解析和一次打分

use std::sync::Arc;

// 声明所有模块
pub mod backend;
pub mod config;
pub mod embed;
pub mod score;
pub mod structs;
pub mod traits;
mod web_server;

// Define a shared Error and Result type for the entire crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Command timed out: {0}")]
    CommandTimeout(&'static str),

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),
}

/// A specialized `Result` type for this crate's operations.
pub type Result<T> = std::result::Result<T, Error>;

use backend::{PingProbe, SystemProfilerSource};
use traits::{LatencyProbe, WifiSource};

/// 核心服务流程：创建平台后端并启动 Web 服务器
///
/// 这个函数是整个应用的核心逻辑入口。它会：
/// 1. 加载配置（ROOMSIGNAL_CONFIG 指向的 TOML 文件，或内置默认值）
/// 2. 创建 system_profiler 数据源和 ping 探测器
/// 3. 启动 Web 服务器，直到进程被终止
pub async fn run_roomsignal() -> Result<()> {
    let config = config::AppConfig::load();

    tracing::info!("🚀 Starting RoomSignal (system_profiler backend)...");

    let wifi: Arc<dyn WifiSource> = Arc::new(SystemProfilerSource::new(&config));
    let probe: Arc<dyn LatencyProbe> = Arc::new(PingProbe::new(&config));

    if let Err(e) = web_server::run_server(config, wifi, probe).await {
        // 将错误冒泡到调用者
        tracing::error!("❌ Web server failed: {}", e);
        return Err(e);
    }

    tracing::info!("🛑 Shutting down.");
    Ok(())
}
