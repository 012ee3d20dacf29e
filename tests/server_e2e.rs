//! End-to-end test over a real socket.

use std::time::Duration;

use docs_helmet::config::RuntimeMode;

mod common;

#[tokio::test]
async fn test_headers_over_tcp_and_graceful_shutdown() {
    let (addr, shutdown, handle) = common::start_server(RuntimeMode::Production).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("http://{}/enterprise/2.15/developer/webhooks", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    let csp = res.headers()["content-security-policy"].to_str().unwrap();
    assert!(csp.contains("*.googleapis.com"));
    assert!(res.text().await.unwrap().contains("/enterprise/2.15/developer/webhooks"));

    let res = client
        .post(format!("http://{}/search", addr))
        .send()
        .await
        .unwrap();
    assert!(res.headers().get("access-control-allow-origin").is_none());
    assert!(res.headers().get("content-security-policy").is_some());

    drop(client);
    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap();
}
