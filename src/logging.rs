use log::{error, info, warn};
use rocket::{
    fairing::{Fairing, Info, Kind},
    http::{Header, StatusClass},
    Data, Orbit, Request, Response, Rocket,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Header carrying the time spent handling a request, in milliseconds.
pub const RESPONSE_TIME_HEADER: &str = "X-Response-Time";

/// Header carrying the [`RequestId`] used in the log lines for a request.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// A unique identifier for a particular request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct RequestId(pub usize);

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RequestId {
    /// Atomically get the next ID. This wraps around back to zero if you somehow exceed a usize.
    pub fn next() -> RequestId {
        static REQUEST_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        RequestId(REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The ID assigned to `req`, assigning one if the logger has not.
    pub fn of(req: &Request<'_>) -> RequestId {
        *req.local_cache(RequestId::next)
    }
}

/// When the fairing first saw a request.
#[derive(Debug, Copy, Clone)]
struct RequestStart(Instant);

/// Server-wide request counters, kept in managed state.
#[derive(Debug)]
pub struct Metrics {
    requests: AtomicUsize,
    started: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            requests: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }
}

impl Metrics {
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsReport {
        MetricsReport {
            requests: self.requests.load(Ordering::Relaxed),
            uptime_sec: self.started.elapsed().as_secs_f64(),
        }
    }
}

/// Metrics as served by `/api/metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Responses sent so far, not counting the one carrying this report.
    pub requests: usize,
    pub uptime_sec: f64,
}

/// A rocket fairing that does global logging, e.g. logging every request and response.
/// It also times each response and counts it in the managed [`Metrics`].
#[derive(Debug, Copy, Clone)]
pub struct LoggerFairing;

#[rocket::async_trait]
impl Fairing for LoggerFairing {
    fn info(&self) -> Info {
        Info {
            name: "Logger",
            kind: Kind::Liftoff | Kind::Request | Kind::Response | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let protocol = if rocket.config().tls_enabled() {
            "https"
        } else {
            "http"
        };
        let ip = &rocket.config().address;
        let port = &rocket.config().port;
        info!("Server launched on {protocol}://{ip}:{port}");
    }

    async fn on_request(&self, req: &mut Request<'_>, _data: &mut Data<'_>) {
        // Start the clock.
        req.local_cache(|| RequestStart(Instant::now()));
        // Assign an ID.
        let id = RequestId::of(req);
        // Get the HTTP method.
        let method = req.method();
        // Get the request URI.
        let uri = req.uri();
        // Log the incoming request.
        info!("->req{id} {method} {uri}");
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        // Get the ID.
        let id = RequestId::of(req);
        res.set_header(Header::new(REQUEST_ID_HEADER, id.to_string()));
        // Stamp the elapsed time.
        let RequestStart(start) = *req.local_cache(|| RequestStart(Instant::now()));
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        res.set_header(Header::new(RESPONSE_TIME_HEADER, elapsed_ms.to_string()));
        if let Some(metrics) = req.rocket().state::<Metrics>() {
            metrics.record_request();
        }
        // Get the response code.
        let code = res.status();
        // Get the matched route.
        let route = match req.route() {
            Some(r) => {
                let mut str = r.uri.to_string();
                if let Some(ref name) = r.name {
                    str = format!("{name} ({str})");
                }
                str
            }
            None => "UNKNOWN ROUTE".to_string(),
        };
        // Log the outgoing response.
        let log_msg = format!("<-rsp{id} {code} {route} in {elapsed_ms:.3}ms");
        match code.class() {
            StatusClass::ServerError => error!("{log_msg}"),
            StatusClass::ClientError => warn!("{log_msg}"),
            _ => info!("{log_msg}"),
        }
    }

    async fn on_shutdown(&self, _rocket: &Rocket<Orbit>) {
        warn!("Shutdown requested, stopping gracefully...");
    }
}
