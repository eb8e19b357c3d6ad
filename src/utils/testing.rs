use std::net::TcpListener;
use axum::Router;

// spawn_server serves the router on an ephemeral local port and returns its base url
pub(crate) async fn spawn_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("should bind local port");
    let addr = listener.local_addr().expect("should have local addr");
    let server = axum::Server::from_tcp(listener).expect("should build server");
    tokio::spawn(async move {
        server.serve(app.into_make_service()).await.expect("server should run");
    });
    format!("http://{}", addr)
}

// unused_base_url points at a local port nothing is listening on
pub(crate) fn unused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("should bind local port");
    let addr = listener.local_addr().expect("should have local addr");
    drop(listener);
    format!("http://{}", addr)
}
