//! system_profiler / ping 文本输出解析
//!
//! 解析容错优先：字段缺失时产生 None / "Unknown"，格式错误的网络块被跳过，
//! 绝不让单个坏块使整次扫描失败。

use std::collections::HashMap;

use crate::structs::{Band, LatencySample, NetworkReading};

/// 网络块里已知的属性键；以这些开头的行不会被当作网络名
const PROPERTY_KEYS: [&str; 8] = [
    "PHY Mode",
    "Channel",
    "Security",
    "Signal / Noise",
    "Network Type",
    "Country Code",
    "Transmit Rate",
    "MCS Index",
];

/// 这些接口小节标志着 Wi-Fi 网络列表的结束
const SECTION_ENDS: [&str; 3] = ["awdl0:", "llw0:", "Bluetooth:"];

/// 把 `system_profiler SPAirPortDataType` 的完整输出解析成
/// (当前连接, 附近网络列表)。
///
/// 空输入或没有网络小节时返回 `(None, vec![])`。
pub fn parse_wifi_data(raw: &str) -> (Option<NetworkReading>, Vec<NetworkReading>) {
    let mut current_connection: Option<NetworkReading> = None;
    let mut other_networks: Vec<NetworkReading> = Vec::new();

    let mut in_current = false;
    let mut in_others = false;

    // 当前小节里还没落盘的网络块
    let mut current_name: Option<String> = None;
    let mut current_props: HashMap<String, String> = HashMap::new();

    let mut name: Option<String> = None;
    let mut props: HashMap<String, String> = HashMap::new();

    for line in raw.lines() {
        let stripped = line.trim();

        // 其它接口小节开始，网络列表到此为止
        if SECTION_ENDS.iter().any(|end| stripped.starts_with(end)) {
            if in_others {
                flush_network(&mut name, &mut props, &mut other_networks);
            }
            in_current = false;
            in_others = false;
            continue;
        }

        if line.contains("Current Network Information:") {
            in_current = true;
            in_others = false;
            continue;
        }

        if line.contains("Other Local Wi-Fi Networks:") {
            // 当前连接的块在这里结束
            if let Some(built) = take_current(&mut current_name, &mut current_props) {
                current_connection = Some(built);
            }
            in_current = false;
            in_others = true;
            continue;
        }

        if in_current {
            if stripped.ends_with(':') && !is_property_line(stripped) {
                // 新的网络名；先落盘上一个块
                if let Some(built) = take_current(&mut current_name, &mut current_props) {
                    current_connection = Some(built);
                }
                current_name = Some(stripped.strip_suffix(':').unwrap_or(stripped).to_string());
                current_props.clear();
            } else if let Some((key, value)) = stripped.split_once(':') {
                current_props.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        if in_others {
            if stripped.ends_with(':') && !is_property_line(stripped) {
                flush_network(&mut name, &mut props, &mut other_networks);
                name = Some(stripped.strip_suffix(':').unwrap_or(stripped).to_string());
                props.clear();
            } else if name.is_some() {
                if let Some((key, value)) = stripped.split_once(':') {
                    props.insert(key.trim().to_string(), value.trim().to_string());
                }
            }
        }
    }

    // 不要忘记最后一个块
    flush_network(&mut name, &mut props, &mut other_networks);
    if current_connection.is_none() {
        current_connection = take_current(&mut current_name, &mut current_props);
    }

    (current_connection, other_networks)
}

fn is_property_line(stripped: &str) -> bool {
    PROPERTY_KEYS
        .iter()
        .any(|key| stripped.strip_prefix(key).is_some_and(|rest| rest.starts_with(':')))
}

fn take_current(
    name: &mut Option<String>,
    props: &mut HashMap<String, String>,
) -> Option<NetworkReading> {
    let ssid = name.take()?;
    if props.is_empty() {
        return None;
    }
    let built = build_reading(ssid, props, true);
    props.clear();
    built
}

fn flush_network(
    name: &mut Option<String>,
    props: &mut HashMap<String, String>,
    out: &mut Vec<NetworkReading>,
) {
    if let Some(ssid) = name.take() {
        if !props.is_empty() {
            if let Some(net) = build_reading(ssid, props, false) {
                out.push(net);
            }
        }
        props.clear();
    }
}

/// 从属性表构造一条网络读数
fn build_reading(
    ssid: String,
    props: &HashMap<String, String>,
    is_current: bool,
) -> Option<NetworkReading> {
    if ssid.is_empty() {
        return None;
    }

    let channel_str = props.get("Channel").map(String::as_str).unwrap_or("0");
    let (channel, band, band_width) = parse_channel_info(channel_str);

    let (mut rssi, mut noise) = props
        .get("Signal / Noise")
        .map(|s| parse_signal_noise(s))
        .unwrap_or((None, None));

    if is_current {
        // 当前连接理论上总有信号读数；缺失时用保守默认值兜底
        rssi = rssi.or(Some(-70));
        noise = noise.or(Some(-90));
    }

    let tx_rate = props
        .get("Transmit Rate")
        .and_then(|s| s.trim().parse::<f64>().ok());
    let mcs_index = props
        .get("MCS Index")
        .and_then(|s| s.trim().parse::<u32>().ok());

    Some(NetworkReading {
        ssid,
        channel,
        band,
        band_width,
        phy_mode: props
            .get("PHY Mode")
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string()),
        security: props
            .get("Security")
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string()),
        rssi,
        noise,
        tx_rate,
        mcs_index,
        is_current,
    })
}

/// 解析形如 `149 (5GHz, 80MHz)` 的信道描述。
/// 频段始终由信道号推导（1-14 → 2.4GHz，其余 → 5GHz）。
fn parse_channel_info(s: &str) -> (u32, Band, String) {
    let s = s.trim();
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    let Ok(channel) = digits.parse::<u32>() else {
        return (0, Band::Ghz2_4, "Unknown".to_string());
    };
    let band = Band::from_channel(channel);

    // 括号里形如 "(5GHz, 80MHz)"；只取带 MHz 的宽度字段
    let band_width = s
        .split_once('(')
        .map(|(_, rest)| rest.trim_end_matches(')'))
        .and_then(|inner| inner.split(',').map(str::trim).find(|part| part.ends_with("MHz")))
        .map(str::to_string)
        .unwrap_or_else(|| "Unknown".to_string());

    (channel, band, band_width)
}

/// 解析形如 `-45 dBm / -93 dBm` 的信号/噪声对
fn parse_signal_noise(s: &str) -> (Option<i32>, Option<i32>) {
    let mut parts = s.splitn(2, '/');
    let rssi = parse_dbm(parts.next().unwrap_or(""));
    let noise = parse_dbm(parts.next().unwrap_or(""));
    (rssi, noise)
}

fn parse_dbm(s: &str) -> Option<i32> {
    let s = s.trim();
    s.strip_suffix("dBm").map(str::trim).unwrap_or(s).parse().ok()
}

/// 从 ping 输出中提取 `min/avg/max/stddev = a/b/c/d ms` 统计行。
/// 没有统计行时返回带 error 的失败样本。
pub fn parse_ping_summary(output: &str, host: &str) -> LatencySample {
    for line in output.lines() {
        let Some((label, stats)) = line.split_once('=') else {
            continue;
        };
        if !label.contains("min/avg/max") {
            continue;
        }

        let values: Vec<f64> = stats
            .trim()
            .trim_end_matches("ms")
            .trim()
            .split('/')
            .filter_map(|v| v.trim().parse().ok())
            .collect();

        if values.len() == 4 {
            return LatencySample {
                host: host.to_string(),
                min_ms: Some(values[0]),
                avg_ms: Some(values[1]),
                max_ms: Some(values[2]),
                stddev_ms: Some(values[3]),
                error: None,
            };
        }
    }

    LatencySample::failed(host, "Could not parse ping output")
}
