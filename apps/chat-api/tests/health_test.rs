mod common;

use axum_test::TestServer;

#[tokio::test]
async fn health_returns_ok() {
    let (state, _backend) = common::test_state();
    let app = chat_api::routes::router().with_state(state);
    let server = TestServer::new(app).expect("test server");

    let resp = server.get("/health").await;
    resp.assert_status_ok();
    resp.assert_json(&serde_json::json!({ "ok": true }));
}
