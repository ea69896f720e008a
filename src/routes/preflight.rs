use poem::{
    Endpoint, IntoResponse, Middleware, Request, Response, Result,
    http::{Method, header},
};

pub const ALLOWED_METHODS: &str = "POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Answers every `OPTIONS` request with the CORS preflight headers and
/// passes all other requests through.
pub struct Preflight;

impl<E: Endpoint> Middleware<E> for Preflight {
    type Output = PreflightEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        PreflightEndpoint { inner: ep }
    }
}

pub struct PreflightEndpoint<E> {
    inner: E,
}

impl<E: Endpoint> Endpoint for PreflightEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        if req.method() == Method::OPTIONS {
            tracing::debug!("CORS preflight for {}", req.uri().path());
            return Ok(preflight_response());
        }

        self.inner.call(req).await.map(IntoResponse::into_response)
    }
}

fn preflight_response() -> Response {
    Response::builder()
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS)
        .header(header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS)
        .finish()
}
