use log::warn;
use rocket::{
    serde::json::{json, Json, Value},
    Route, State,
};

use crate::config::AnalyticsConfig;
use crate::logging::{Metrics, MetricsReport};
use crate::model::{Election, ElectionStore};

use super::detail;

pub fn routes() -> Vec<Route> {
    routes![health, metrics, config, version, reset]
}

#[get("/health")]
fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[get("/api/metrics")]
fn metrics(counters: &State<Metrics>) -> Json<MetricsReport> {
    Json(counters.snapshot())
}

/// The analytics defaults currently in force.
#[get("/api/config")]
fn config(analytics: &State<AnalyticsConfig>) -> Json<AnalyticsConfig> {
    Json(**analytics)
}

#[get("/api/version")]
fn version() -> Json<Value> {
    Json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}

/// Forget all voters, candidates, votes and encrypted ballots.
#[delete("/api/state/reset")]
fn reset(store: &State<ElectionStore>) -> Json<Value> {
    store.write(Election::reset);
    warn!("Election state reset");
    detail("reset")
}

#[cfg(test)]
mod tests {
    use rocket::http::Status;
    use rocket::local::asynchronous::{Client, LocalResponse};

    use super::*;
    use crate::logging::{REQUEST_ID_HEADER, RESPONSE_TIME_HEADER};

    #[backend_test]
    async fn health_and_version(client: Client) {
        let response = client.get(uri!(health)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let elapsed = response
            .headers()
            .get_one(RESPONSE_TIME_HEADER)
            .unwrap()
            .parse::<f64>()
            .unwrap();
        assert!(elapsed >= 0.0);
        assert_eq!(
            response.into_json::<Value>().await,
            Some(json!({ "status": "ok" }))
        );

        let response = client.get(uri!(version)).dispatch().await;
        let body = response.into_json::<Value>().await.unwrap();
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["version"], "1.0.0");
    }

    #[backend_test]
    async fn responses_carry_request_ids(client: Client) {
        let request_id = |response: &LocalResponse<'_>| {
            response
                .headers()
                .get_one(REQUEST_ID_HEADER)
                .unwrap()
                .parse::<usize>()
                .unwrap()
        };
        let first = client.get(uri!(health)).dispatch().await;
        // Error responses log under the same ID the logger assigned.
        let second = client.get("/api/voters/nobody").dispatch().await;
        assert_eq!(Status::NotFound, second.status());
        assert!(request_id(&second) > request_id(&first));
    }

    #[backend_test]
    async fn metrics_count_requests(client: Client) {
        for _ in 0..3 {
            client.get(uri!(health)).dispatch().await;
        }
        // A missing route still produces a response.
        client.get("/nowhere").dispatch().await;

        let response = client.get(uri!(metrics)).dispatch().await;
        let report = response.into_json::<MetricsReport>().await.unwrap();
        assert_eq!(report.requests, 4);
        assert!(report.uptime_sec >= 0.0);
    }

    #[backend_test]
    async fn default_config(client: Client) {
        let response = client.get(uri!(config)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let config = response.into_json::<AnalyticsConfig>().await.unwrap();
        assert!(config.dp_epsilon > 0.0);
        assert!(config.dp_sensitivity > 0.0);
    }

    #[backend_test(seeded)]
    async fn reset_clears_store(client: Client, store: ElectionStore) {
        let response = client.delete(uri!(reset)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert_eq!(
            response.into_json::<Value>().await,
            Some(json!({ "detail": "reset" }))
        );
        assert_eq!(store.read(|e| e.registry.voters().count()), 0);
    }
}
