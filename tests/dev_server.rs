use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

use static_dev_server::config::{config_dir, load_config};
use static_dev_server::server::DevServer;

// send one raw request and return the whole response as text
async fn roundtrip(addr: std::net::SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

#[test]
fn stylesheets_alias_does_not_depend_on_working_directory() {
    let before = load_config("development");

    let original_dir = std::env::current_dir().unwrap();
    let elsewhere = tempdir().unwrap();
    std::env::set_current_dir(elsewhere.path()).unwrap();
    let after = load_config("development");
    std::env::set_current_dir(&original_dir).unwrap();

    assert_eq!(before.aliases["stylesheets"], after.aliases["stylesheets"]);
    assert!(after.aliases["stylesheets"].starts_with(config_dir()));
    assert!(
        after.aliases["stylesheets"].ends_with(Path::new("frontend/src/main/static/stylesheets"))
    );
}

#[tokio::test]
async fn serves_files_and_answers_preflights_over_tcp() {
    let public = tempdir().unwrap();
    let css = tempdir().unwrap();
    fs::write(public.path().join("index.html"), "<h1>dev</h1>").unwrap();
    fs::write(css.path().join("app.css"), "body{}").unwrap();

    let mut config = load_config("development");
    config.server.port = 0;
    config.public_dir = public.path().to_path_buf();
    config
        .aliases
        .insert("stylesheets".into(), css.path().to_path_buf());

    let server = DevServer::new(config);
    let listener = server.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.serve(listener, async move {
        stop_rx.await.ok();
    }));

    let index = roundtrip(
        addr,
        "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(index.starts_with("HTTP/1.1 200 OK\r\n"), "{index}");
    assert!(index.ends_with("<h1>dev</h1>"));

    let sheet = roundtrip(
        addr,
        "GET /stylesheets/app.css HTTP/1.1\r\nHost: localhost\r\n\
         Origin: http://localhost:8080\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(sheet.starts_with("HTTP/1.1 200 OK\r\n"), "{sheet}");
    assert!(sheet.contains("content-type: text/css\r\n"));
    assert!(sheet.contains("access-control-allow-origin: *\r\n"));

    let preflight = roundtrip(
        addr,
        "OPTIONS /api/items HTTP/1.1\r\nHost: localhost\r\nOrigin: http://localhost:8080\r\n\
         Access-Control-Request-Method: DELETE\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(preflight.starts_with("HTTP/1.1 204 No Content\r\n"), "{preflight}");
    assert!(preflight.contains("access-control-allow-origin: *\r\n"));

    // a chunked upload is read to the end before the answer
    let chunked = roundtrip(
        addr,
        "POST /index.html HTTP/1.1\r\nHost: localhost\r\nTransfer-Encoding: chunked\r\n\
         Connection: close\r\n\r\n5\r\nhello\r\n0\r\n\r\n",
    )
    .await;
    assert!(chunked.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"), "{chunked}");

    let bad = roundtrip(addr, "NONSENSE\r\n\r\n").await;
    assert!(bad.starts_with("HTTP/1.1 4"), "{bad}");

    stop_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}
