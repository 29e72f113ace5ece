use chrono::{TimeZone, Utc};
use pulse_warehouse::api::{Api, Http};
use pulse_warehouse::{
    fetch_recent_history, get_analysis, AnalysisError, CalcError, FeedConfig, FeedZone,
    FetchError, FixedClock, Sohu,
};
use reqwest::Client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serve exactly one HTTP exchange with a canned `response`; yields the request head.
async fn serve_once(response: String) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        let _ = tx.send(String::from_utf8_lossy(&head).into_owned());
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });

    (format!("http://{addr}/hisHq"), rx)
}

fn ok_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

fn config(endpoint: String) -> FeedConfig {
    FeedConfig {
        endpoint,
        ..FeedConfig::default()
    }
}

/// Six days, newest-first, volume doubling on the last one.
const SIX_DAYS: &str = r#"[{"status":0,"hq":[
    ["2024-07-01","1","1","0","0%","1","1","200","20","0%"],
    ["2024-06-28","1","1","0","0%","1","1","100","10","0%"],
    ["2024-06-27","1","1","0","0%","1","1","100","10","0%"],
    ["2024-06-26","1","1","0","0%","1","1","100","10","0%"],
    ["2024-06-25","1","1","0","0%","1","1","100","10","0%"],
    ["2024-06-24","1","1","0","0%","1","1","100","10","0%"]
],"code":"zs_000001"}]"#;

#[tokio::test]
async fn fetch_sends_window_and_fixed_parameters() {
    let (url, head) = serve_once(ok_response(SIX_DAYS)).await;
    let now = Utc.with_ymd_and_hms(2024, 6, 30, 20, 0, 0).unwrap();

    let body = fetch_recent_history(&client(), &config(url), now)
        .await
        .unwrap();
    assert_eq!(body, SIX_DAYS);

    let head = head.await.unwrap();
    let request_line = head.lines().next().unwrap();
    assert!(request_line.starts_with("GET /hisHq?"), "{request_line}");
    for param in [
        "code=zs_000001",
        "start=20240103",
        "end=20240701",
        "stat=1",
        "order=D",
        "period=d",
    ] {
        assert!(request_line.contains(param), "{param} missing from {request_line}");
    }
}

#[tokio::test]
async fn analysis_composes_fetch_and_calculation() {
    let (url, _head) = serve_once(ok_response(SIX_DAYS)).await;
    let now = Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap();

    let out = get_analysis(&client(), config(url), now).await.unwrap();
    assert_eq!(out.len(), 6);
    assert_eq!(out[0].date, "2024-06-24");
    assert_eq!(out[5].date, "2024-07-01");
    assert_eq!(out[5].five_day_volume_rate, 100.0);
    assert_eq!(out[5].five_day_turnover_rate, 100.0);
}

#[tokio::test]
async fn provider_fetch_uses_injected_clock_and_zone() {
    let (url, head) = serve_once(ok_response("[]")).await;
    let now = Utc.with_ymd_and_hms(2024, 6, 30, 20, 0, 0).unwrap();
    let config = FeedConfig {
        zone: FeedZone::resolve("America/New_York"),
        ..config(url)
    };

    let sohu = Sohu::with_clock(config, FixedClock(now));
    let body = sohu.fetch(&client()).await.unwrap();
    assert_eq!(body, "[]");
    assert!(head.await.unwrap().contains("end=20240630"));
}

#[tokio::test]
async fn non_success_status_is_network_error() {
    let (url, _head) = serve_once(
        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string(),
    )
    .await;

    let err = get_analysis(&client(), config(url), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Fetch(FetchError::Network(_))));
    assert!(err.to_string().starts_with("fetch failed: "));
}

#[tokio::test]
async fn truncated_body_is_read_error() {
    let (url, _head) = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Length: 4096\r\nConnection: close\r\n\r\n[{\"hq\":[".to_string(),
    )
    .await;

    let err = fetch_recent_history(&client(), &config(url), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Read(_)), "{err:?}");
}

#[tokio::test]
async fn unreachable_endpoint_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sohu = Sohu::with_clock(config(format!("http://{addr}/hisHq")), FixedClock(Utc::now()));
    let err = sohu.etl(&client()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Fetch(FetchError::Network(_))));
}

#[tokio::test]
async fn empty_payload_is_labelled_calculation_failure() {
    let (url, _head) = serve_once(ok_response("[]")).await;

    let err = get_analysis(&client(), config(url), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Calculation(CalcError::EmptyData(_))
    ));
    assert_eq!(err.to_string(), "calculation failed: no stock data available");
}
