use rocket::serde::json::{json, Json, Value};
use rocket::Route;

mod candidates;
mod results;
mod system;
mod voters;
mod votes;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(voters::routes());
    routes.extend(candidates::routes());
    routes.extend(votes::routes());
    routes.extend(results::routes());
    routes.extend(system::routes());
    routes
}

/// A bare `{"detail": ...}` acknowledgement.
fn detail(message: &str) -> Json<Value> {
    Json(json!({ "detail": message }))
}
