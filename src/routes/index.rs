use poem::{Response, handler, http::header};

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Emby Cover Generator</title>
    <style>body { font-family: Arial; text-align: center; padding: 50px; }</style>
  </head>
  <body>
    <h1>Emby Cover Generator Worker</h1>
    <p>This is the backend worker for the Emby Cover Generator.</p>
    <p>Please use the frontend interface to generate covers.</p>
  </body>
</html>
"#;

/// Static informational page served for every unmatched method or path.
///
/// Carries no CORS headers.
pub fn index_page() -> Response {
    Response::builder()
        .header(header::CONTENT_TYPE, "text/html")
        .body(INDEX_HTML)
}

#[handler]
pub fn index() -> Response {
    index_page()
}
