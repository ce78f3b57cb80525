use axum::{extract::Request, http::header, middleware::Next, response::IntoResponse};

/// Pages load their scripts from the same origin and the unpkg/Tailwind CDNs.
/// The Tailwind runtime injects a `<style>` element, hence inline styles.
const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
     script-src 'self' https://unpkg.com https://cdn.tailwindcss.com; \
     style-src 'self' 'unsafe-inline'; \
     img-src 'self' data:; \
     connect-src 'self'; \
     frame-ancestors 'none'";

pub async fn security_headers_middleware(req: Request, next: Next) -> impl IntoResponse {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::X_FRAME_OPTIONS,
        header::HeaderValue::from_static("DENY"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        header::HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        header::HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );

    response
}
