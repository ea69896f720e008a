use emby_cover::core::renderer::CoverRenderer;
use emby_cover::{AppState, init_route};
use poem::{http::StatusCode, test::TestClient};
use std::sync::Arc;

fn test_client() -> TestClient<impl poem::Endpoint> {
    let renderer = Arc::new(CoverRenderer::new().expect("Failed to initialize cover renderer"));
    TestClient::new(init_route(Arc::new(AppState { renderer })))
}

#[tokio::test]
async fn test_preflight_on_any_path() {
    let cli = test_client();

    for path in ["/generate", "/", "/anything/else"] {
        let resp = cli.options(path).send().await;

        resp.assert_status_is_ok();
        resp.assert_header("access-control-allow-origin", "*");
        resp.assert_header("access-control-allow-methods", "POST, OPTIONS");
        resp.assert_header("access-control-allow-headers", "Content-Type");

        let body = resp.0.into_body().into_vec().await.unwrap();
        assert!(body.is_empty(), "preflight on {path} returned a body");
    }
}

#[tokio::test]
async fn test_preflight_ignores_body() {
    let cli = test_client();

    let resp = cli.options("/generate").body("{ not json").send().await;
    resp.assert_status_is_ok();
    resp.assert_header("access-control-allow-methods", "POST, OPTIONS");
}

#[tokio::test]
async fn test_fallback_page() {
    let cli = test_client();

    let requests = [
        cli.get("/"),
        cli.get("/generate"),
        cli.get("/some/other/path"),
        cli.post("/render"),
        cli.put("/generate"),
        cli.delete("/"),
    ];

    for req in requests {
        let resp = req.send().await;

        resp.assert_status(StatusCode::OK);
        resp.assert_content_type("text/html");
        assert!(
            resp.0.headers().get("access-control-allow-origin").is_none(),
            "fallback page must not carry CORS headers"
        );

        let body = resp.0.into_body().into_string().await.unwrap();
        assert!(body.contains("<title>Emby Cover Generator</title>"));
        assert!(body.contains("<h1>Emby Cover Generator Worker</h1>"));
    }
}
