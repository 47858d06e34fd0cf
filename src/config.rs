use serde::Deserialize;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// 顶层应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub scan: ScanConfig,
    pub latency: LatencyConfig,
}

/// 用于解析 TOML 的临时结构
#[derive(Deserialize, Default)]
struct AppConfigFile {
    /// [server] 表（可选）
    #[serde(default)]
    server: Option<ServerConfigToml>,

    /// [scan] 表（可选）
    #[serde(default)]
    scan: Option<ScanConfigToml>,

    /// [latency] 表（可选）
    #[serde(default)]
    latency: Option<LatencyConfigToml>,
}

// ============= 服务器配置 =============

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

#[derive(Deserialize)]
struct ServerConfigToml {
    bind_addr: String,
}

impl From<ServerConfigToml> for ServerConfig {
    fn from(t: ServerConfigToml) -> Self {
        let bind_addr =
            SocketAddr::from_str(&t.bind_addr).expect("Invalid bind_addr in TOML");
        ServerConfig { bind_addr }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            // 只监听本机；这是一个本地诊断工具
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
        }
    }
}

// ============= 扫描配置 =============

/// /api/scan 的预算：整个请求（工具调用 + 解析 + 打分）共用一个超时
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub timeout_secs: u64,
    /// 扫描时顺带对当前连接做的快速 ping 次数
    pub quick_ping_count: u32,
}

#[derive(Deserialize)]
struct ScanConfigToml {
    #[serde(default = "default_scan_timeout_secs")]
    timeout_secs: u64,
    #[serde(default = "default_quick_ping_count")]
    quick_ping_count: u32,
}

impl From<ScanConfigToml> for ScanConfig {
    fn from(t: ScanConfigToml) -> Self {
        ScanConfig {
            timeout_secs: t.timeout_secs,
            quick_ping_count: t.quick_ping_count,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            timeout_secs: default_scan_timeout_secs(),
            quick_ping_count: default_quick_ping_count(),
        }
    }
}

impl ScanConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============= 延迟探测配置 =============

#[derive(Debug, Clone)]
pub struct LatencyConfig {
    /// /api/latency 未指定 host 时的默认探测目标
    pub host: String,
    pub default_count: u32,
    pub timeout_secs: u64,
}

#[derive(Deserialize)]
struct LatencyConfigToml {
    #[serde(default = "default_latency_host")]
    host: String,
    #[serde(default = "default_latency_count")]
    default_count: u32,
    #[serde(default = "default_latency_timeout_secs")]
    timeout_secs: u64,
}

impl From<LatencyConfigToml> for LatencyConfig {
    fn from(t: LatencyConfigToml) -> Self {
        LatencyConfig {
            host: t.host,
            default_count: t.default_count,
            timeout_secs: t.timeout_secs,
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        LatencyConfig {
            host: default_latency_host(),
            default_count: default_latency_count(),
            timeout_secs: default_latency_timeout_secs(),
        }
    }
}

impl LatencyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_scan_timeout_secs() -> u64 {
    30
}

fn default_quick_ping_count() -> u32 {
    3
}

fn default_latency_host() -> String {
    "8.8.8.8".to_string()
}

fn default_latency_count() -> u32 {
    5
}

fn default_latency_timeout_secs() -> u64 {
    30
}

// ============= 配置加载函数 =============

/// 从 TOML 字符串加载应用配置；缺失的表使用默认值
pub fn load_config_from_toml_str(s: &str) -> AppConfig {
    let parsed: AppConfigFile = toml::from_str(s).expect("Failed to parse config TOML");

    AppConfig {
        server: parsed.server.map(ServerConfig::from).unwrap_or_default(),
        scan: parsed.scan.map(ScanConfig::from).unwrap_or_default(),
        latency: parsed.latency.map(LatencyConfig::from).unwrap_or_default(),
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            server: ServerConfig::default(),
            scan: ScanConfig::default(),
            latency: LatencyConfig::default(),
        }
    }
}

impl AppConfig {
    /// 读取 ROOMSIGNAL_CONFIG 指向的配置文件；未设置时使用默认配置
    pub fn load() -> Self {
        match std::env::var("ROOMSIGNAL_CONFIG") {
            Ok(path) => {
                tracing::info!("Loading config from {}", path);
                let data = std::fs::read_to_string(&path)
                    .unwrap_or_else(|e| panic!("Failed to read config file {path}: {e}"));
                load_config_from_toml_str(&data)
            }
            Err(_) => AppConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = load_config_from_toml_str("");
        assert_eq!(config.server.bind_addr, SocketAddr::from(([127, 0, 0, 1], 8000)));
        assert_eq!(config.scan.timeout_secs, 30);
        assert_eq!(config.scan.quick_ping_count, 3);
        assert_eq!(config.latency.host, "8.8.8.8");
        assert_eq!(config.latency.default_count, 5);
    }

    #[test]
    fn full_toml_overrides_everything() {
        let config = load_config_from_toml_str(
            r#"
[server]
bind_addr = "0.0.0.0:9000"

[scan]
timeout_secs = 10
quick_ping_count = 2

[latency]
host = "1.1.1.1"
default_count = 4
timeout_secs = 15
"#,
        );
        assert_eq!(config.server.bind_addr, SocketAddr::from(([0, 0, 0, 0], 9000)));
        assert_eq!(config.scan.timeout_secs, 10);
        assert_eq!(config.scan.quick_ping_count, 2);
        assert_eq!(config.latency.host, "1.1.1.1");
        assert_eq!(config.latency.default_count, 4);
        assert_eq!(config.latency.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn partial_table_fills_in_field_defaults() {
        let config = load_config_from_toml_str("[scan]\ntimeout_secs = 5\n");
        assert_eq!(config.scan.timeout_secs, 5);
        assert_eq!(config.scan.quick_ping_count, 3);
    }
}
