use http_body_util::BodyExt;
use hyper::{Request, Response};
use static_ldp::config::{
    default_valid_rdf_formats, AppState, Config, HttpConfig, LdpConfig, LoggingConfig,
    PerformanceConfig, ServerConfig,
};
use static_ldp::handler::handle_request;
use static_ldp::http::ResponseBody;
use static_ldp::ldp::graph::{DCTERMS_MODIFIED, LDP_CONTAINS};
use static_ldp::ldp::RdfGraph;
use static_ldp::server;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const NOTE: &str = r#"@prefix dc: <http://purl.org/dc/terms/> .
<> dc:title "Scenario A" ;
   dc:subject <http://example.org/topic> .
"#;
const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

fn test_config(source: &std::path::Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
            base_url: None,
        },
        ldp: LdpConfig {
            source_directory: source.to_string_lossy().into_owned(),
            default_rdf_format: "turtle".to_string(),
            valid_rdf_formats: default_valid_rdf_formats(),
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            access_log: true,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
        },
        performance: PerformanceConfig {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
            shutdown_timeout: 10,
        },
        http: HttpConfig::default(),
    }
}

fn fixture() -> (tempfile::TempDir, Arc<AppState>) {
    fixture_with(|_| {})
}

fn fixture_with(tweak: impl FnOnce(&mut Config)) -> (tempfile::TempDir, Arc<AppState>) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("note.ttl"), NOTE).unwrap();
    std::fs::write(dir.path().join("photo.jpg"), JPEG).unwrap();
    std::fs::write(dir.path().join(".secret"), "hidden").unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("sub/deep.ttl"), NOTE).unwrap();
    std::fs::create_dir(dir.path().join("empty")).unwrap();
    let mut config = test_config(dir.path());
    tweak(&mut config);
    let state = Arc::new(AppState::new(config).unwrap());
    (dir, state)
}

async fn send(
    state: &Arc<AppState>,
    method: &str,
    path: &str,
    accept: Option<&str>,
) -> Response<ResponseBody> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header("host", "localhost");
    if let Some(accept) = accept {
        builder = builder.header("accept", accept);
    }
    let req = builder.body(()).unwrap();
    handle_request(req, Arc::clone(state), "127.0.0.1:50000".parse().unwrap())
        .await
        .unwrap()
}

async fn body_of(response: Response<ResponseBody>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

async fn spawn_server(state: Arc<AppState>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::run(listener, state, std::future::pending()));
    addr
}

fn header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
}

fn links(response: &Response<ResponseBody>) -> Vec<String> {
    response
        .headers()
        .get_all("link")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn triples(graph: &RdfGraph) -> HashSet<String> {
    graph.inner().iter().map(|t| t.to_string()).collect()
}

#[tokio::test]
async fn scenario_a_turtle_served_as_rdfxml() {
    let (_dir, state) = fixture();
    let response = send(&state, "GET", "/note.ttl", Some("application/rdf+xml")).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "application/rdf+xml");
    assert_eq!(response.headers()["vary"], "Accept");
    let link = links(&response);
    assert!(link.iter().any(|l| l.contains("ldp#Resource")));
    assert!(link.iter().any(|l| l.contains("ldp#RDFSource")));

    let declared: usize = response.headers()["content-length"]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    let body = body_of(response).await;
    assert_eq!(declared, body.len());

    let subject = "http://localhost/note.ttl";
    let served = RdfGraph::parse(&body, "rdfxml", subject).unwrap();
    let source = RdfGraph::parse(NOTE.as_bytes(), "turtle", subject).unwrap();
    assert_eq!(triples(&served), triples(&source));
}

#[tokio::test]
async fn scenario_b_binary_file_passthrough() {
    let (_dir, state) = fixture();
    let response = send(&state, "GET", "/photo.jpg", Some("text/turtle")).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "image/jpeg");
    assert_eq!(response.headers()["content-length"], JPEG.len().to_string().as_str());
    assert!(response.headers().get("vary").is_none());
    assert!(links(&response).iter().any(|l| l.contains("NonRDFSource")));
    assert_eq!(body_of(response).await, JPEG);
}

#[tokio::test]
async fn scenario_c_missing_resource() {
    let (_dir, state) = fixture();
    let response = send(&state, "GET", "/missing.ttl", None).await;

    assert_eq!(response.status(), 404);
    assert!(links(&response).is_empty());
    assert_eq!(body_of(response).await, b"Not Found");
}

#[tokio::test]
async fn scenario_d_root_container_listing() {
    let (_dir, state) = fixture();
    let response = send(&state, "GET", "/", None).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "text/turtle");
    assert!(links(&response).iter().any(|l| l.contains("BasicContainer")));

    let body = body_of(response).await;
    let graph = RdfGraph::parse(&body, "turtle", "http://localhost/").unwrap();
    assert_eq!(
        graph.objects_of("http://localhost/", LDP_CONTAINS),
        vec![
            "http://localhost/empty",
            "http://localhost/note.ttl",
            "http://localhost/photo.jpg",
            "http://localhost/sub",
        ]
    );
    assert_eq!(graph.objects_of("http://localhost/", DCTERMS_MODIFIED).len(), 1);
}

#[tokio::test]
async fn scenario_d_nested_and_empty_containers() {
    let (_dir, state) = fixture();

    let sub = send(&state, "GET", "/sub/", Some("application/n-triples")).await;
    assert_eq!(sub.headers()["content-type"], "application/n-triples");
    let graph = RdfGraph::parse(&body_of(sub).await, "ntriples", "http://localhost/sub/").unwrap();
    assert_eq!(
        graph.objects_of("http://localhost/sub/", LDP_CONTAINS),
        vec!["http://localhost/sub/deep.ttl"]
    );

    let empty = send(&state, "GET", "/empty", None).await;
    let graph = RdfGraph::parse(&body_of(empty).await, "turtle", "http://localhost/empty").unwrap();
    assert!(graph.objects_of("http://localhost/empty", LDP_CONTAINS).is_empty());
    assert_eq!(graph.objects_of("http://localhost/empty", DCTERMS_MODIFIED).len(), 1);
}

#[tokio::test]
async fn scenario_e_options() {
    let (_dir, state) = fixture();
    let response = send(&state, "OPTIONS", "/anything", None).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["allow"], "OPTIONS, GET, HEAD");
    assert!(body_of(response).await.is_empty());
}

#[tokio::test]
async fn head_matches_get() {
    let (_dir, state) = fixture();
    for path in ["/note.ttl", "/photo.jpg", "/", "/missing.ttl"] {
        let get = send(&state, "GET", path, Some("application/n-triples")).await;
        let head = send(&state, "HEAD", path, Some("application/n-triples")).await;
        assert_eq!(get.status(), head.status(), "{path}");
        if get.status() == 200 {
            assert_eq!(get.headers(), head.headers(), "{path}");
            assert!(body_of(head).await.is_empty());
        }
    }
}

#[tokio::test]
async fn unregistered_accept_falls_back_to_default() {
    let (_dir, state) = fixture();
    for accept in ["text/html", "*/*", "application/xml;q=0.9, image/png"] {
        let response = send(&state, "GET", "/note.ttl", Some(accept)).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-type"], "text/turtle", "{accept}");
    }
}

#[tokio::test]
async fn quality_weights_pick_format() {
    let (_dir, state) = fixture();
    let response = send(
        &state,
        "GET",
        "/note.ttl",
        Some("text/turtle;q=0.5, application/n-triples"),
    )
    .await;
    assert_eq!(response.headers()["content-type"], "application/n-triples");
}

#[tokio::test]
async fn traversal_is_not_found() {
    let (_dir, state) = fixture();
    for path in ["/../etc/passwd", "/sub/../../etc/passwd", "/%2e%2e/etc/passwd"] {
        let response = send(&state, "GET", path, None).await;
        assert_eq!(response.status(), 404, "{path}");
    }
}

#[tokio::test]
async fn percent_encoded_paths() {
    let (dir, state) = fixture();
    std::fs::write(dir.path().join("my note.ttl"), NOTE).unwrap();
    let response = send(&state, "GET", "/my%20note.ttl", Some("application/n-triples")).await;
    assert_eq!(response.status(), 200);
    let body = String::from_utf8(body_of(response).await).unwrap();
    assert!(body.contains("<http://localhost/my%20note.ttl>"));
}

#[tokio::test]
async fn malformed_source_is_server_error() {
    let (dir, state) = fixture();
    std::fs::write(dir.path().join("broken.ttl"), "<a> <b> .").unwrap();
    let response = send(&state, "GET", "/broken.ttl", None).await;
    assert_eq!(response.status(), 500);
    assert!(response.headers().get("link").is_none());
}

#[tokio::test]
async fn write_methods_not_allowed() {
    let (_dir, state) = fixture();
    for method in ["POST", "PUT", "PATCH", "DELETE"] {
        let response = send(&state, method, "/note.ttl", None).await;
        assert_eq!(response.status(), 405, "{method}");
        assert_eq!(response.headers()["allow"], "OPTIONS, GET, HEAD");
    }
}

#[tokio::test]
async fn unusable_host_header_falls_back_to_configured_address() {
    let (_dir, state) = fixture();
    for host in ["bad host", "x\"y"] {
        let req = Request::builder()
            .uri("/note.ttl")
            .header("host", host)
            .header("accept", "application/n-triples")
            .body(())
            .unwrap();
        let response = handle_request(req, Arc::clone(&state), "127.0.0.1:50000".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200, "{host}");
        let body = String::from_utf8(body_of(response).await).unwrap();
        assert!(body.contains("<http://127.0.0.1:8080/note.ttl>"), "{host}");
    }
}

#[cfg(unix)]
#[tokio::test]
async fn filesystem_error_is_server_error() {
    let (dir, state) = fixture();
    std::os::unix::fs::symlink(dir.path().join("loop-b"), dir.path().join("loop-a")).unwrap();
    std::os::unix::fs::symlink(dir.path().join("loop-a"), dir.path().join("loop-b")).unwrap();

    let response = send(&state, "GET", "/loop-a", None).await;
    assert_eq!(response.status(), 500);
    assert!(response.headers().get("link").is_none());
    assert_eq!(body_of(response).await, b"Internal Server Error");
}

#[tokio::test]
async fn slow_download_is_not_cut_off() {
    let (dir, state) = fixture_with(|config| {
        config.logging.access_log = false;
        config.performance.read_timeout = 1;
        config.performance.write_timeout = 1;
        config.performance.keep_alive_timeout = 1;
    });
    let big: Vec<u8> = (0..4 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    std::fs::write(dir.path().join("big.bin"), &big).unwrap();
    let addr = spawn_server(state).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /big.bin HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();

    // about 1.6 MB/s, well past the one second timeouts
    let mut received = Vec::new();
    let mut chunk = vec![0u8; 64 * 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        received.extend_from_slice(&chunk[..n]);
        tokio::time::sleep(Duration::from_millis(40)).await;
    }

    let body_start = header_end(&received).unwrap();
    let head = String::from_utf8_lossy(&received[..body_start]).to_lowercase();
    assert!(head.starts_with("http/1.1 200"));
    assert!(head.contains("content-length: 4194304"));
    assert_eq!(received.len() - body_start, big.len(), "download truncated");
    assert!(received[body_start..] == big[..]);
}

#[tokio::test]
async fn idle_keep_alive_connection_is_closed() {
    let (_dir, state) = fixture_with(|config| {
        config.logging.access_log = false;
        config.performance.read_timeout = 1;
        config.performance.write_timeout = 1;
        config.performance.keep_alive_timeout = 1;
    });
    let addr = spawn_server(state).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /photo.jpg HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();

    let mut received = Vec::new();
    let mut chunk = [0u8; 1024];
    while header_end(&received).map_or(true, |end| received.len() < end + JPEG.len()) {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before the response was complete");
        received.extend_from_slice(&chunk[..n]);
    }

    let closed = tokio::time::timeout(Duration::from_secs(5), stream.read(&mut chunk))
        .await
        .expect("idle connection left open");
    assert_eq!(closed.unwrap_or(0), 0);
}
