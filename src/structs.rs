use serde::Serialize;

/// Wi-Fi 频段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Band {
    #[serde(rename = "2.4GHz")]
    Ghz2_4,
    #[serde(rename = "5GHz")]
    Ghz5,
}

impl Band {
    /// 信道号决定频段：1-14 为 2.4GHz，其余为 5GHz
    pub fn from_channel(channel: u32) -> Self {
        if channel <= 14 {
            Band::Ghz2_4
        } else {
            Band::Ghz5
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Ghz2_4 => "2.4GHz",
            Band::Ghz5 => "5GHz",
        }
    }
}

/// 表示一次扫描中看到的单个 Wi-Fi 网络
///
/// 解析器容错优先：平台工具没有给出的字段保持 None / "Unknown"，
/// 不会让整条记录失败。
#[derive(Debug, Clone, Serialize)]
pub struct NetworkReading {
    pub ssid: String,
    pub channel: u32,
    pub band: Band,
    pub band_width: String, // "20MHz", "40MHz", "80MHz", "160MHz" 或 "Unknown"
    pub phy_mode: String,   // "802.11ac", "802.11ax" 等
    pub security: String,
    pub rssi: Option<i32>,  // dBm，视野边缘的网络可能没有
    pub noise: Option<i32>, // dBm
    pub tx_rate: Option<f64>, // Mbps，只有当前连接会报告
    pub mcs_index: Option<u32>,
    pub is_current: bool,
}

impl NetworkReading {
    /// RSSI 的可读质量描述
    pub fn signal_quality(&self) -> &'static str {
        match self.rssi {
            None => "Unknown",
            Some(r) if r >= -50 => "Excellent",
            Some(r) if r >= -60 => "Good",
            Some(r) if r >= -70 => "Fair",
            Some(_) => "Poor",
        }
    }

    /// RSSI 折算成百分比（-90..-30 dBm 线性映射到 0..100）
    pub fn signal_percentage(&self) -> u8 {
        match self.rssi {
            None => 0,
            Some(r) => (((r.clamp(-90, -30) + 90) * 100) / 60) as u8,
        }
    }

    /// 信噪比（dB）；需要同时有信号和噪声读数
    pub fn snr(&self) -> Option<i32> {
        Some(self.rssi? - self.noise?)
    }
}

/// 一次可达性探测的结果；`error` 非空时统计字段无效
#[derive(Debug, Clone, Serialize)]
pub struct LatencySample {
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stddev_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LatencySample {
    /// 构造一个失败样本（主机不可达、工具缺失等）
    pub fn failed(host: &str, error: impl Into<String>) -> Self {
        LatencySample {
            host: host.to_string(),
            min_ms: None,
            avg_ms: None,
            max_ms: None,
            stddev_ms: None,
            error: Some(error.into()),
        }
    }

    /// 样本是否可用于打分
    pub fn is_usable(&self) -> bool {
        self.error.is_none() && self.avg_ms.is_some()
    }
}

/// 字母等级；Ord 的顺序是 A 最好
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

/// 单个网络的得分明细
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub signal_points: f64, // 0-40
    pub band_points: f64,   // 0-25
    pub phy_points: f64,    // 0-15
    /// 0-20，只有对当前连接成功测到延迟时才存在
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_points: Option<f64>,
    pub total: f64, // 0-100
    /// 没有延迟样本时封顶 80，而不是倒扣分
    pub max_possible: f64,
    pub grade: Grade,
    pub recommendation: String,
}

/// /api/scan 响应中的单个网络：读数 + 派生字段 + 得分
#[derive(Debug, Clone, Serialize)]
pub struct ScoredNetwork {
    #[serde(flatten)]
    pub reading: NetworkReading,
    pub signal_quality: &'static str,
    pub signal_percentage: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snr: Option<i32>,
    /// 只有当前连接带延迟样本
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<LatencySample>,
    pub score: ScoreBreakdown,
}

/// 当前位置 Wi-Fi 状况的整体分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Excellent,
    Good,
    Fair,
    Poor,
    Disconnected,
}

/// 对当前位置的总结与建议
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub status: Status,
    pub message: String,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_band: Option<Band>,
    pub networks_found: usize,
}

/// /api/scan 的完整响应体
#[derive(Debug, Clone, Serialize)]
pub struct ScanResponse {
    pub current: Option<ScoredNetwork>,
    pub networks: Vec<ScoredNetwork>,
    pub best_alternative: Option<ScoredNetwork>,
    pub summary: Summary,
}
