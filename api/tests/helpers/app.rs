use api::routes::routes;
use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::Request,
    response::Response,
};
use serde_json::Value;
use std::convert::Infallible;
use tower::ServiceExt;
use tower::util::BoxCloneService;
use util::state::AppState;

/// Fresh in-memory application: migrated database, full router under `/api`.
pub async fn make_test_app() -> (
    BoxCloneService<Request<Body>, Response, Infallible>,
    AppState,
) {
    let db = db::test_utils::setup_test_db().await;
    let app_state = AppState::new(db);

    let router = Router::new().nest("/api", routes(app_state.clone()));
    (router.into_service().boxed_clone(), app_state)
}

/// Attaches a `ConnectInfo<SocketAddr>` so handlers that record the client
/// address work under `oneshot`.
pub fn with_connect_info(mut req: Request<Body>, ip: [u8; 4]) -> Request<Body> {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::from(ip)), 43210);
    req.extensions_mut().insert(ConnectInfo(addr));
    req
}

/// JSON request with a bearer token, ready for `oneshot`.
pub fn bearer_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    with_connect_info(req, [192, 168, 0, 7])
}

pub async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
