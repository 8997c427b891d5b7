use axum::body::to_bytes;
use axum::body::Body;
use axum::extract::Query;
use axum::http::{Request, Uri};
use axum::middleware::Next;
use axum::response::Response;
use contracts::shared::sales_filter::{DateRange, FilterState};

use crate::shared::format::format_number;

/// Routes whose query string carries a record filter
const FILTERED_PREFIXES: [&str; 2] = ["/api/a001/sales-records", "/api/d400/sales-dashboard"];

/// `category=Tools, date_range=30` for the non-`all` filter dimensions of a
/// sales request; `None` for other routes or when nothing is restricted.
pub fn active_filter_summary(uri: &Uri) -> Option<String> {
    if !FILTERED_PREFIXES.iter().any(|p| uri.path().starts_with(p)) {
        return None;
    }
    let Query(filter) = Query::<FilterState>::try_from_uri(uri).ok()?;
    if !filter.is_active() {
        return None;
    }

    let defaults = FilterState::default();
    let mut parts = Vec::with_capacity(filter.active_count());
    for (name, value, default) in [
        ("category", &filter.category, &defaults.category),
        ("region", &filter.region, &defaults.region),
        ("product", &filter.product, &defaults.product),
    ] {
        if value != default {
            parts.push(format!("{}={}", name, value));
        }
    }
    if filter.date_range != DateRange::All {
        parts.push(format!("date_range={}", filter.date_range));
    }
    Some(parts.join(", "))
}

/// Logs one line per HTTP request: method, path, status, duration, response
/// size and, for sales routes, the active filter
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let filter = active_filter_summary(&uri).unwrap_or_else(|| "-".to_string());

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Buffer the body to learn its real size
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                "{} {} -> {} after {}ms, body unreadable: {}",
                method,
                uri.path(),
                parts.status.as_u16(),
                start.elapsed().as_millis(),
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let status = parts.status;
    let elapsed_ms = start.elapsed().as_millis();
    if status.is_server_error() {
        tracing::warn!(
            "{} {} -> {} | {}ms | {} bytes | filter: {}",
            method,
            uri.path(),
            status.as_u16(),
            elapsed_ms,
            format_number(bytes.len()),
            filter
        );
    } else {
        tracing::info!(
            "{} {} -> {} | {}ms | {} bytes | filter: {}",
            method,
            uri.path(),
            status.as_u16(),
            elapsed_ms,
            format_number(bytes.len()),
            filter
        );
    }

    Response::from_parts(parts, Body::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{middleware, Router};
    use tower::ServiceExt;

    #[test]
    fn test_filter_summary_for_sales_routes() {
        let uri: Uri = "/api/a001/sales-records?category=Tools&region=all&date_range=30"
            .parse()
            .unwrap();
        assert_eq!(
            active_filter_summary(&uri).as_deref(),
            Some("category=Tools, date_range=30")
        );

        let plain: Uri = "/api/d400/sales-dashboard?top_limit=3".parse().unwrap();
        assert_eq!(active_filter_summary(&plain), None);

        let other: Uri = "/api/a002/data-uploads?category=Tools".parse().unwrap();
        assert_eq!(active_filter_summary(&other), None);
    }

    #[tokio::test]
    async fn test_body_and_status_pass_through() {
        let app = Router::new()
            .route(
                "/api/a001/sales-records",
                get(|| async { (StatusCode::ACCEPTED, "Date,Product\n2024-01-15,Widget\n") }),
            )
            .layer(middleware::from_fn(request_logger));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/a001/sales-records?product=Widget")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Date,Product\n2024-01-15,Widget\n");
    }
}
