use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use toxic_repos::config::HttpConfig;
use toxic_repos::{Fetcher, HttpFetcher, ToxicError};

/// Answer a single request with `status` and `body`, returning the base URL
async fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await.unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: text/csv\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{}", addr)
}

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&HttpConfig {
        timeout_secs: 5,
        user_agent: "toxic-repos-test".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_text_success() {
    let base = serve_once("200 OK", "id,name\n1,alpha\n").await;
    let url = format!("{}/data-en/csv/toxic-repos.csv", base);

    let text = fetcher().fetch_text(&url).await.unwrap();
    assert_eq!(text, "id,name\n1,alpha\n");
}

#[tokio::test]
async fn test_non_success_status_is_http_error() {
    let base = serve_once("404 Not Found", "missing").await;
    let url = format!("{}/data/csv/toxic-repos.csv", base);

    let err = fetcher().fetch_bytes(&url).await.unwrap_err();
    match &err {
        ToxicError::Http { url: failed, status } => {
            assert_eq!(*status, 404);
            assert_eq!(failed, &url);
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
    assert!(err.to_string().starts_with("Failed to load data:"));
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = fetcher()
        .fetch_bytes(&format!("http://{}/x.csv", addr))
        .await
        .unwrap_err();
    assert!(matches!(err, ToxicError::Network { .. }));
}
