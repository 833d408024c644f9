use axum::{Json, Router, extract::Query, routing::get};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct UnitStat {
    unit: String,
    count: u64,
    target: u32,
    percentage: u32,
}

#[derive(Debug, Deserialize)]
struct Stats {
    total_checkins: u64,
    unique_attendees: u64,
    by_unit: Vec<UnitStat>,
    top_unit: Option<UnitStat>,
    absentees: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Winner {
    unit: String,
    percentage: u32,
    locked_at: String,
}

#[derive(Debug, Deserialize)]
struct DashboardResponse {
    stats: Stats,
    session: String,
    winner: Option<Winner>,
}

struct TestServer {
    base_url: String,
    winner_path: PathBuf,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));
static STORE_URL: Lazy<String> = Lazy::new(start_fake_store);

#[cfg(unix)]
mod cleanup {
    use std::sync::Once;
    use std::sync::atomic::{AtomicI32, Ordering};

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn attendance_rows() -> Value {
    let mut rows = Vec::new();
    for n in 0..16 {
        rows.push(json!({
            "employee_id": format!("L{n}"),
            "date": "2025-03-01",
            "unit": "WP Labuan",
            "session": "Pagi",
            "name": format!("Labuan {n}")
        }));
    }
    for n in 0..5 {
        rows.push(json!({
            "employee_id": format!("P{n}"),
            "date": "2025-03-01",
            "unit": "PERLIS",
            "session": "Pagi"
        }));
    }
    for n in 0..3 {
        rows.push(json!({
            "employee_id": format!("P{n}"),
            "date": "2025-03-02",
            "unit": "PERLIS",
            "session": "Petang"
        }));
    }
    rows.push(json!({
        "employee_id": 9001,
        "date": "2025-03-02",
        "unit": null,
        "session": "Petang"
    }));
    Value::Array(rows)
}

fn roster_rows() -> Value {
    let mut rows: Vec<Value> = (0..16)
        .map(|n| json!({ "employee_id": format!("L{n}"), "unit": "WP LABUAN" }))
        .chain((0..5).map(|n| json!({ "employee_id": format!("P{n}"), "unit": "PERLIS" })))
        .collect();
    rows.push(json!({ "employee_id": "R1", "name": "Late One", "unit": "WP LABUAN" }));
    rows.push(json!({ "employee_id": "R2", "name": "Late Two", "unit": "PERLIS" }));
    Value::Array(rows)
}

fn page(rows: Value, params: &HashMap<String, String>) -> Json<Value> {
    let offset = params
        .get("offset")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    if offset == 0 { Json(rows) } else { Json(json!([])) }
}

fn start_fake_store() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake store");
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("fake store runtime");
        runtime.block_on(async move {
            let app = Router::new()
                .route(
                    "/rest/v1/attendance",
                    get(|Query(params): Query<HashMap<String, String>>| async move {
                        page(attendance_rows(), &params)
                    }),
                )
                .route(
                    "/rest/v1/roster",
                    get(|Query(params): Query<HashMap<String, String>>| async move {
                        page(roster_rows(), &params)
                    }),
                );
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    format!("http://{addr}")
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_winner_path() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("checkin_http_{}_{}.json", std::process::id(), nanos));
    path
}

async fn wait_until_synced(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/health")).send().await {
            if let Ok(status) = resp.json::<Value>().await {
                if !status["last_synced_at"].is_null() {
                    return;
                }
            }
        }
        if Instant::now() > deadline {
            panic!("server did not sync with the fake store");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let winner_path = unique_winner_path();
    let child = Command::new(env!("CARGO_BIN_EXE_checkin_dashboard"))
        .env("PORT", port.to_string())
        .env("STORE_URL", STORE_URL.as_str())
        .env("STORE_KEY", "test-key")
        .env("ATTENDANCE_TABLE", "attendance")
        .env("ROSTER_TABLE", "roster")
        .env("POLL_INTERVAL_SECS", "1")
        .env("WINNER_PATH", &winner_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_synced(&base_url).await;

    TestServer {
        base_url,
        winner_path,
        child,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn dashboard(client: &Client, server: &TestServer, query: &str) -> DashboardResponse {
    client
        .get(format!("{}/api/dashboard?{query}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_dashboard_aggregates_store_rows() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = dashboard(&client, &server, "date=all&session=all&unit=all").await;
    assert_eq!(response.session, "all");
    assert_eq!(response.stats.total_checkins, 25);
    assert_eq!(response.stats.unique_attendees, 22);

    let labuan = response
        .stats
        .by_unit
        .iter()
        .find(|u| u.unit == "WP LABUAN")
        .expect("labuan in distribution");
    assert_eq!((labuan.count, labuan.target, labuan.percentage), (16, 15, 107));
    let perlis = response
        .stats
        .by_unit
        .iter()
        .find(|u| u.unit == "PERLIS")
        .expect("perlis in distribution");
    assert_eq!((perlis.count, perlis.percentage), (5, 25));
    assert!(response.stats.by_unit.iter().all(|u| u.unit != "UNCLASSIFIED"));
    assert_eq!(
        response.stats.top_unit.as_ref().map(|u| u.unit.as_str()),
        Some("WP LABUAN")
    );

    let absent: Vec<&str> = response
        .stats
        .absentees
        .iter()
        .filter_map(|m| m["employee_id"].as_str())
        .collect();
    assert_eq!(absent, vec!["R1", "R2"]);
}

#[tokio::test]
async fn http_winner_lock_survives_filter_changes() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let first = dashboard(&client, &server, "session=Pagi").await;
    let winner = first.winner.expect("morning session locked");
    assert_eq!(winner.unit, "WP LABUAN");
    assert_eq!(winner.percentage, 107);

    let narrowed = dashboard(&client, &server, "session=Pagi&date=2025-03-02").await;
    assert_eq!(narrowed.stats.total_checkins, 0);
    let kept = narrowed.winner.expect("lock kept after date change");
    assert_eq!(kept.unit, winner.unit);
    assert_eq!(kept.locked_at, winner.locked_at);

    let afternoon = dashboard(&client, &server, "session=Petang").await;
    assert!(afternoon.winner.is_none());

    let saved: Value =
        serde_json::from_slice(&std::fs::read(&server.winner_path).unwrap()).unwrap();
    assert_eq!(saved["winner_locks_v1"]["PAGI"]["unit"], "WP LABUAN");
}

#[tokio::test]
async fn http_clearing_winners_allows_a_new_lock() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    dashboard(&client, &server, "session=Pagi").await;
    let cleared: Value = client
        .delete(format!("{}/api/winners", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cleared["winners"], json!({}));

    let listed: Value = client
        .get(format!("{}/api/winners", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["winners"], json!({}));

    let relocked = dashboard(&client, &server, "session=Pagi").await;
    assert_eq!(relocked.winner.map(|w| w.unit).as_deref(), Some("WP LABUAN"));
}

#[tokio::test]
async fn http_lock_taken_under_narrow_filters_follows_the_session() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let cleared = client
        .delete(format!("{}/api/winners", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(cleared.status().is_success());

    let empty_day = dashboard(&client, &server, "session=Pagi&date=2025-03-02").await;
    assert!(empty_day.winner.is_none());

    let perlis_view = dashboard(&client, &server, "session=pagi&unit=PERLIS").await;
    assert_eq!(perlis_view.session, "PAGI");
    assert_eq!(perlis_view.stats.by_unit.len(), 1);
    assert_eq!(perlis_view.stats.by_unit[0].unit, "PERLIS");
    let winner = perlis_view.winner.expect("session locked from a unit view");
    assert_eq!((winner.unit.as_str(), winner.percentage), ("WP LABUAN", 107));

    let full_view = dashboard(&client, &server, "session=PAGI").await;
    assert_eq!(full_view.winner.map(|w| w.locked_at), Some(winner.locked_at));
}

#[tokio::test]
async fn http_filters_and_index_page() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let options: Value = client
        .get(format!("{}/api/filters", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(options["dates"], json!(["2025-03-01", "2025-03-02"]));
    assert_eq!(options["sessions"], json!(["PAGI", "PETANG"]));
    let units = options["units"].as_array().unwrap();
    assert_eq!(units.first(), Some(&json!("JOHOR")));
    assert_eq!(units.last(), Some(&json!("UNCLASSIFIED")));

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(page.status().is_success());
    let body = page.text().await.unwrap();
    assert!(body.contains("Check-in Dashboard"));
    assert!(!body.contains("{{REFRESH_MS}}"));
}
