//! Web 服务器：扫描 API、延迟测试 API 与内嵌仪表盘

use crate::config::AppConfig;
use crate::embed::EmbedFrontend;
use crate::score;
use crate::structs::ScanResponse;
use crate::traits::{LatencyProbe, UiAssetProvider, WifiSource};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// Web 服务器状态
struct AppState {
    wifi: Arc<dyn WifiSource>,
    probe: Arc<dyn LatencyProbe>,
    // 一次只服务一个扫描请求
    scan_gate: tokio::sync::Mutex<()>,
    // UI 资产提供器
    ui_provider: Arc<dyn UiAssetProvider>,
    config: AppConfig,
}

/// 启动 Web 服务器
pub async fn run_server(
    config: AppConfig,
    wifi: Arc<dyn WifiSource>,
    probe: Arc<dyn LatencyProbe>,
) -> crate::Result<()> {
    // 初始化 EmbedFrontend
    let ui_provider = Arc::new(EmbedFrontend::new());

    let bind_addr = config.server.bind_addr;
    let app_state = Arc::new(AppState {
        wifi,
        probe,
        scan_gate: tokio::sync::Mutex::new(()),
        ui_provider,
        config,
    });

    // 构建路由；仪表盘是纯展示层，本地开发时允许跨域访问
    let app = Router::new()
        .route("/api/scan", get(api_scan))
        .route("/api/latency", get(api_latency))
        .route("/api/health", get(api_health))
        .fallback(get(serve_static_asset))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    tracing::info!("🌐 RoomSignal listening on http://{}", bind_addr);

    let listener = TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// 扫描 Wi-Fi 并返回当前连接、附近网络与总结建议
async fn api_scan(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::debug!("Handling /api/scan");

    // 同一时间只执行一次扫描
    let _gate = state.scan_gate.lock().await;

    let scan_timeout = state.config.scan.timeout();
    match tokio::time::timeout(scan_timeout, perform_scan(&state)).await {
        Ok(Ok(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Err(e)) => {
            tracing::error!("Scan failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
        Err(_) => {
            tracing::error!("Scan timed out after {:?}", scan_timeout);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Scan timed out" })),
            )
                .into_response()
        }
    }
}

/// 一次完整的扫描：调用平台工具、探测延迟、打分并生成总结。
/// 空的或解析不出的工具输出不是错误：返回 disconnected 状态。
async fn perform_scan(state: &AppState) -> crate::Result<ScanResponse> {
    let (current, networks) = state.wifi.scan().await?;

    // 只对当前连接做一次快速延迟探测
    let latency = match &current {
        Some(_) => Some(
            state
                .probe
                .measure(
                    &state.config.latency.host,
                    state.config.scan.quick_ping_count,
                )
                .await,
        ),
        None => None,
    };

    Ok(score::build_scan_response(current, networks, latency))
}

#[derive(Deserialize)]
struct LatencyParams {
    host: Option<String>,
    count: Option<u32>,
}

/// 对指定主机运行一次延迟测试
async fn api_latency(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LatencyParams>,
) -> impl IntoResponse {
    let host = params
        .host
        .unwrap_or_else(|| state.config.latency.host.clone());
    let count = params.count.unwrap_or(state.config.latency.default_count);
    tracing::debug!(host = %host, count, "Handling /api/latency");

    // 探测失败装在样本的 error 字段里返回，不是 HTTP 错误
    let sample = state.probe.measure(&host, count).await;
    (StatusCode::OK, Json(sample)).into_response()
}

/// 健康检查
async fn api_health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "ok", "service": "roomsignal" })),
    )
        .into_response()
}

/// 处理静态资产的 Fallback 处理器
///
/// 这个处理器会捕获所有未被 API 路由匹配的 GET 请求，
/// 并尝试从 `UiAssetProvider` (即 EmbedFrontend) 中服务文件。
async fn serve_static_asset(State(state): State<Arc<AppState>>, uri: Uri) -> impl IntoResponse {
    let mut path = uri.path().trim_start_matches('/').to_string();

    // 如果路径为空 (即请求根目录 "/"), 则服务 "index.html"
    if path.is_empty() {
        path = "index.html".to_string();
    }

    match state.ui_provider.get_asset(&path).await {
        Ok((data, mime)) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, mime)
            .body(Body::from(data))
            .unwrap_or_else(|_| {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response()
            }),
        Err(e) => {
            tracing::warn!("Failed to get asset: {} (Error: {})", path, e);
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}
