//! Network scoring and recommendation logic.
//!
//! Everything here is a pure function over parsed readings; the web layer
//! feeds it fresh data on every scan request and nothing is retained.

use std::cmp::Ordering;

use crate::structs::{
    Band, Grade, LatencySample, NetworkReading, ScanResponse, ScoreBreakdown, ScoredNetwork,
    Status, Summary,
};

const SIGNAL_FLOOR_DBM: f64 = -90.0;
const SIGNAL_CEIL_DBM: f64 = -30.0;
const SIGNAL_MAX_POINTS: f64 = 40.0;

const LATENCY_BEST_MS: f64 = 20.0;
const LATENCY_WORST_MS: f64 = 150.0;
const LATENCY_MAX_POINTS: f64 = 20.0;

/// 另一个网络要比当前高出这么多分才值得建议切换
const SWITCH_MARGIN: f64 = 10.0;

/// Signal strength contribution (0-40): linear in RSSI between
/// -90 dBm (0 pts) and -30 dBm (40 pts), clamped outside that range.
fn signal_points(rssi: Option<i32>) -> f64 {
    let Some(rssi) = rssi else { return 0.0 };
    let rssi = (rssi as f64).clamp(SIGNAL_FLOOR_DBM, SIGNAL_CEIL_DBM);
    (rssi - SIGNAL_FLOOR_DBM) / (SIGNAL_CEIL_DBM - SIGNAL_FLOOR_DBM) * SIGNAL_MAX_POINTS
}

/// Band preference (0-25): 5GHz base 15 vs 2.4GHz base 5, plus a bonus
/// for wide channels (160MHz -> 10, 80MHz -> 5).
fn band_points(band: Band, band_width: &str) -> f64 {
    let base = match band {
        Band::Ghz5 => 15.0,
        Band::Ghz2_4 => 5.0,
    };
    let bonus = match parse_width_mhz(band_width) {
        Some(w) if w >= 160 => 10.0,
        Some(w) if w >= 80 => 5.0,
        _ => 0.0,
    };
    base + bonus
}

fn parse_width_mhz(band_width: &str) -> Option<u32> {
    band_width.trim().strip_suffix("MHz")?.trim().parse().ok()
}

/// PHY generation contribution (0-15). Substring match, case-insensitive,
/// checked in ax -> ac -> n priority order: "ac" and "n" also occur inside
/// other tokens, so the order is load-bearing.
fn phy_points(phy_mode: &str) -> f64 {
    let mode = phy_mode.to_ascii_lowercase();
    if mode.contains("ax") {
        15.0
    } else if mode.contains("ac") {
        10.0
    } else if mode.contains('n') {
        5.0
    } else {
        0.0
    }
}

/// Latency contribution (0-20): linear between 20 ms (20 pts) and
/// 150 ms (0 pts), clamped.
fn latency_points(avg_ms: f64) -> f64 {
    let avg = avg_ms.clamp(LATENCY_BEST_MS, LATENCY_WORST_MS);
    (LATENCY_WORST_MS - avg) / (LATENCY_WORST_MS - LATENCY_BEST_MS) * LATENCY_MAX_POINTS
}

/// Letter grade as a step function of the total score.
pub fn grade(total: f64) -> Grade {
    if total >= 85.0 {
        Grade::A
    } else if total >= 70.0 {
        Grade::B
    } else if total >= 55.0 {
        Grade::C
    } else if total >= 40.0 {
        Grade::D
    } else {
        Grade::F
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Score one network.
///
/// `latency` is only ever supplied for the current connection; nearby
/// networks are scored on radio metrics alone. Without a usable sample the
/// latency factor is dropped from `max_possible` (capped at 80) instead of
/// counting against the total.
pub fn score_network(network: &NetworkReading, latency: Option<&LatencySample>) -> ScoreBreakdown {
    let signal = signal_points(network.rssi);
    let band = band_points(network.band, &network.band_width);
    let phy = phy_points(&network.phy_mode);

    let lat = latency
        .filter(|s| s.is_usable())
        .and_then(|s| s.avg_ms)
        .map(latency_points);

    let max_possible = if lat.is_some() { 100.0 } else { 80.0 };
    let total = round1((signal + band + phy + lat.unwrap_or(0.0)).clamp(0.0, 100.0));
    let grade = grade(total);

    ScoreBreakdown {
        signal_points: round1(signal),
        band_points: round1(band),
        phy_points: round1(phy),
        latency_points: lat.map(round1),
        total,
        max_possible,
        grade,
        recommendation: recommendation_text(total, network.is_current, network.rssi),
    }
}

/// Short per-network advice string shown next to the score.
fn recommendation_text(total: f64, is_current: bool, rssi: Option<i32>) -> String {
    let text = if is_current {
        if total >= 80.0 {
            "Excellent connection - optimal for this location"
        } else if total >= 60.0 {
            "Good connection - suitable for most tasks"
        } else if total >= 40.0 {
            "Fair connection - may experience slowdowns"
        } else {
            "Poor connection - consider switching networks"
        }
    } else if rssi.is_none() {
        "Signal strength unknown - try connecting to test"
    } else if total >= 50.0 {
        "Good candidate for this location"
    } else if total >= 30.0 {
        "Acceptable - may work for basic tasks"
    } else {
        "Weak signal - not recommended for this location"
    };
    text.to_string()
}

fn scored(reading: NetworkReading, latency: Option<LatencySample>) -> ScoredNetwork {
    let score = score_network(&reading, latency.as_ref());
    ScoredNetwork {
        signal_quality: reading.signal_quality(),
        signal_percentage: reading.signal_percentage(),
        snr: reading.snr(),
        latency,
        score,
        reading,
    }
}

/// Assemble the full `/api/scan` payload from freshly parsed readings.
///
/// Nearby networks are sorted by total score descending; the best
/// alternative is the top network whose SSID differs from the current one.
pub fn build_scan_response(
    current: Option<NetworkReading>,
    networks: Vec<NetworkReading>,
    latency: Option<LatencySample>,
) -> ScanResponse {
    let current = current.map(|r| scored(r, latency));

    let mut networks: Vec<ScoredNetwork> =
        networks.into_iter().map(|r| scored(r, None)).collect();
    networks.sort_by(|a, b| {
        b.score
            .total
            .partial_cmp(&a.score.total)
            .unwrap_or(Ordering::Equal)
    });

    let current_ssid = current.as_ref().map(|c| c.reading.ssid.as_str());
    let best_alternative = networks
        .iter()
        .find(|n| current_ssid != Some(n.reading.ssid.as_str()))
        .cloned();

    let summary = summarize(current.as_ref(), best_alternative.as_ref(), networks.len());

    ScanResponse {
        current,
        networks,
        best_alternative,
        summary,
    }
}

/// Overall verdict for the current location.
pub fn summarize(
    current: Option<&ScoredNetwork>,
    best_alt: Option<&ScoredNetwork>,
    networks_found: usize,
) -> Summary {
    let Some(current) = current else {
        return Summary {
            status: Status::Disconnected,
            message: "Not connected to any WiFi network".to_string(),
            recommendation: "Connect to a network to see analysis".to_string(),
            grade: None,
            current_band: None,
            networks_found,
        };
    };

    let total = current.score.total;
    let ssid = &current.reading.ssid;

    // 只有明显更好（高出 SWITCH_MARGIN 分）且自身至少 C 级的网络才值得建议
    let candidate = best_alt.filter(|alt| {
        alt.score.total > total + SWITCH_MARGIN && alt.score.grade <= Grade::C
    });

    let (status, message) = match current.score.grade {
        Grade::A => (
            Status::Excellent,
            format!("Your current connection ({ssid}) is excellent for this location."),
        ),
        Grade::B => (
            Status::Good,
            format!("Your current connection ({ssid}) is good for this location."),
        ),
        Grade::C => (
            Status::Fair,
            format!("Your current connection ({ssid}) is fair - you may experience some slowdowns."),
        ),
        Grade::D | Grade::F => (
            Status::Poor,
            format!("Your current connection ({ssid}) has poor signal at this location."),
        ),
    };

    let recommendation = match (status, candidate) {
        (Status::Poor, Some(alt)) => format!(
            "Strongly recommend switching to {} ({}).",
            alt.reading.ssid,
            alt.reading.band.as_str()
        ),
        (Status::Poor, None) => {
            "Move to a different location or check your router placement.".to_string()
        }
        (_, Some(alt)) => format!(
            "Consider switching to {} ({}) for potentially better performance.",
            alt.reading.ssid,
            alt.reading.band.as_str()
        ),
        (Status::Excellent, None) => {
            "No change needed - you have optimal WiFi coverage here.".to_string()
        }
        (_, None) => "Your current network is a good choice for this location.".to_string(),
    };

    Summary {
        status,
        message,
        recommendation,
        grade: Some(current.score.grade),
        current_band: Some(current.reading.band),
        networks_found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(
        ssid: &str,
        channel: u32,
        width: &str,
        phy: &str,
        rssi: Option<i32>,
        is_current: bool,
    ) -> NetworkReading {
        NetworkReading {
            ssid: ssid.to_string(),
            channel,
            band: Band::from_channel(channel),
            band_width: width.to_string(),
            phy_mode: phy.to_string(),
            security: "WPA2 Personal".to_string(),
            rssi,
            noise: Some(-95),
            tx_rate: None,
            mcs_index: None,
            is_current,
        }
    }

    fn sample(avg_ms: f64) -> LatencySample {
        LatencySample {
            host: "8.8.8.8".to_string(),
            min_ms: Some(avg_ms - 1.0),
            avg_ms: Some(avg_ms),
            max_ms: Some(avg_ms + 1.0),
            stddev_ms: Some(0.5),
            error: None,
        }
    }

    #[test]
    fn signal_points_endpoints() {
        assert_eq!(signal_points(Some(-30)), 40.0);
        assert_eq!(signal_points(Some(-90)), 0.0);
        assert_eq!(signal_points(Some(-60)), 20.0);
        // clamped outside the range
        assert_eq!(signal_points(Some(-20)), 40.0);
        assert_eq!(signal_points(Some(-100)), 0.0);
        assert_eq!(signal_points(None), 0.0);
    }

    #[test]
    fn signal_points_monotonic() {
        let mut last = -1.0;
        for rssi in -90..=-30 {
            let pts = signal_points(Some(rssi));
            assert!(pts >= last, "not monotonic at {rssi}");
            assert!((0.0..=40.0).contains(&pts));
            last = pts;
        }
    }

    #[test]
    fn band_points_table() {
        assert_eq!(band_points(Band::Ghz5, "160MHz"), 25.0);
        assert_eq!(band_points(Band::Ghz5, "80MHz"), 20.0);
        assert_eq!(band_points(Band::Ghz5, "40MHz"), 15.0);
        assert_eq!(band_points(Band::Ghz2_4, "20MHz"), 5.0);
        assert_eq!(band_points(Band::Ghz2_4, "Unknown"), 5.0);
    }

    #[test]
    fn phy_points_priority_order() {
        assert_eq!(phy_points("802.11ax"), 15.0);
        assert_eq!(phy_points("802.11AC"), 10.0);
        assert_eq!(phy_points("802.11n"), 5.0);
        assert_eq!(phy_points("802.11g"), 0.0);
        // mixed-mode strings resolve at the newest generation
        assert_eq!(phy_points("802.11 n/ac/ax"), 15.0);
    }

    #[test]
    fn latency_points_endpoints() {
        assert_eq!(latency_points(20.0), 20.0);
        assert_eq!(latency_points(150.0), 0.0);
        assert_eq!(latency_points(85.0), 10.0);
        // clamped outside the range
        assert_eq!(latency_points(5.0), 20.0);
        assert_eq!(latency_points(500.0), 0.0);
    }

    #[test]
    fn grade_boundaries() {
        assert_eq!(grade(100.0), Grade::A);
        assert_eq!(grade(85.0), Grade::A);
        assert_eq!(grade(84.0), Grade::B);
        assert_eq!(grade(70.0), Grade::B);
        assert_eq!(grade(69.9), Grade::C);
        assert_eq!(grade(55.0), Grade::C);
        assert_eq!(grade(54.9), Grade::D);
        assert_eq!(grade(40.0), Grade::D);
        assert_eq!(grade(39.9), Grade::F);
        assert_eq!(grade(0.0), Grade::F);
    }

    #[test]
    fn fast_5ghz_beats_slow_2ghz_at_equal_rssi() {
        let fast = reading("Fast", 149, "80MHz", "802.11ax", Some(-40), false);
        let slow = reading("Slow", 6, "20MHz", "802.11n", Some(-40), false);

        let fast = score_network(&fast, None);
        let slow = score_network(&slow, None);
        assert!(fast.total > slow.total);
    }

    #[test]
    fn perfect_network_hits_the_ceiling() {
        let net = reading("Perfect", 149, "160MHz", "802.11ax", Some(-30), true);
        let breakdown = score_network(&net, Some(&sample(10.0)));

        assert_eq!(breakdown.signal_points, 40.0);
        assert_eq!(breakdown.band_points, 25.0);
        assert_eq!(breakdown.phy_points, 15.0);
        assert_eq!(breakdown.latency_points, Some(20.0));
        assert_eq!(breakdown.total, 100.0);
        assert_eq!(breakdown.max_possible, 100.0);
        assert_eq!(breakdown.grade, Grade::A);
    }

    #[test]
    fn missing_rssi_scores_zero_signal() {
        let net = reading("Faint", 44, "80MHz", "802.11ac", None, false);
        let breakdown = score_network(&net, None);
        assert_eq!(breakdown.signal_points, 0.0);
        assert!((0.0..=100.0).contains(&breakdown.total));
    }

    #[test]
    fn no_latency_sample_caps_at_80_without_penalty() {
        let net = reading("Home", 149, "80MHz", "802.11ax", Some(-40), true);

        let without = score_network(&net, None);
        assert_eq!(without.latency_points, None);
        assert_eq!(without.max_possible, 80.0);

        // 失败样本和没有样本一样，不倒扣分
        let failed = LatencySample::failed("8.8.8.8", "Ping failed");
        let with_failed = score_network(&net, Some(&failed));
        assert_eq!(with_failed.latency_points, None);
        assert_eq!(with_failed.total, without.total);

        let with = score_network(&net, Some(&sample(20.0)));
        assert_eq!(with.latency_points, Some(20.0));
        assert_eq!(with.max_possible, 100.0);
        assert_eq!(with.total, without.total + 20.0);
    }

    #[test]
    fn summary_disconnected_without_current() {
        let summary = summarize(None, None, 0);
        assert_eq!(summary.status, Status::Disconnected);
        assert_eq!(summary.grade, None);
    }

    #[test]
    fn summary_poor_for_low_grades() {
        // 2.4GHz/20MHz/n @ -40 => 33.3 + 5 + 5 = 43.3 (D)
        let response = build_scan_response(
            Some(reading("Weak", 6, "20MHz", "802.11n", Some(-40), true)),
            vec![],
            None,
        );
        assert_eq!(response.summary.status, Status::Poor);
        assert_eq!(response.summary.grade, Some(Grade::D));
        assert!(response
            .summary
            .recommendation
            .contains("Move to a different location"));
    }

    #[test]
    fn summary_recommends_clearly_better_alternative() {
        // current: 5GHz/40MHz/ac @ -70 => 13.3 + 15 + 10 = 38.3... use -60:
        // 20 + 15 + 10 = 45 (D) -> poor, alternative must beat 55 and be >= C
        let current = reading("Home", 36, "40MHz", "802.11ac", Some(-60), true);
        let alt = reading("Better", 149, "160MHz", "802.11ax", Some(-45), false);

        let response = build_scan_response(Some(current), vec![alt], None);
        assert_eq!(response.summary.status, Status::Poor);
        let best = response.best_alternative.as_ref().expect("alternative");
        assert_eq!(best.reading.ssid, "Better");
        assert!(response
            .summary
            .recommendation
            .contains("Strongly recommend switching to Better"));
    }

    #[test]
    fn summary_affirms_when_margin_is_small() {
        // current: 5GHz/80MHz/ax @ -50 => 26.7 + 20 + 15 = 61.7 (C)
        let current = reading("Home", 149, "80MHz", "802.11ax", Some(-50), true);
        // alternative: 5GHz/80MHz/ac @ -50 => 26.7 + 20 + 10 = 56.7, margin < 10
        let alt = reading("Neighbor", 44, "80MHz", "802.11ac", Some(-50), false);

        let response = build_scan_response(Some(current), vec![alt], None);
        assert_eq!(response.summary.status, Status::Fair);
        assert!(!response.summary.recommendation.contains("switching"));
    }

    #[test]
    fn best_alternative_skips_current_ssid() {
        let current = reading("Home", 149, "80MHz", "802.11ax", Some(-45), true);
        let same = reading("Home", 149, "80MHz", "802.11ax", Some(-45), false);
        let other = reading("Cafe", 6, "20MHz", "802.11n", Some(-60), false);

        let response = build_scan_response(Some(current), vec![same, other], None);
        let best = response.best_alternative.expect("alternative");
        assert_eq!(best.reading.ssid, "Cafe");
    }

    #[test]
    fn networks_sorted_by_score_descending() {
        let a = reading("A", 6, "20MHz", "802.11n", Some(-80), false);
        let b = reading("B", 149, "80MHz", "802.11ax", Some(-45), false);
        let c = reading("C", 44, "40MHz", "802.11ac", Some(-60), false);

        let response = build_scan_response(None, vec![a, b, c], None);
        let ssids: Vec<&str> = response
            .networks
            .iter()
            .map(|n| n.reading.ssid.as_str())
            .collect();
        assert_eq!(ssids, vec!["B", "C", "A"]);
        assert_eq!(response.summary.status, Status::Disconnected);
        assert_eq!(response.summary.networks_found, 3);
    }
}
