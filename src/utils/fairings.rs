use std::time::Instant;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Data, Request, Response};

/// Logs method, path, status and latency for every request.
pub struct RequestLogger;

#[derive(Clone, Copy)]
struct RequestStart(Option<Instant>);

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request logger",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _: &mut Data<'_>) {
        request.local_cache(|| RequestStart(Some(Instant::now())));
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let start = request.local_cache(|| RequestStart(None));
        let latency_ms = start.0.map(|t| t.elapsed().as_millis() as u64).unwrap_or_default();
        let status = response.status().code;

        if status >= 500 {
            tracing::error!(method = %request.method(), path = %request.uri().path(), status, latency_ms, "request failed");
        } else {
            tracing::info!(method = %request.method(), path = %request.uri().path(), status, latency_ms, "request handled");
        }
    }
}
