use rocket::{
    response::status::Created,
    serde::json::{Json, Value},
    Route, State,
};

use crate::error::Result;
use crate::model::{
    voter::{Voter, VoterPatch},
    ElectionStore,
};

use super::detail;

pub fn routes() -> Vec<Route> {
    routes![create_voter, list_voters, get_voter, update_voter, delete_voter]
}

#[post("/api/voters", data = "<voter>", format = "json")]
fn create_voter(voter: Json<Voter>, store: &State<ElectionStore>) -> Result<Created<Json<Voter>>> {
    let voter = store.write(|e| e.registry.register_voter(voter.0).cloned())?;
    let location = uri!(get_voter(voter.voter_id.as_str())).to_string();
    Ok(Created::new(location).body(Json(voter)))
}

#[get("/api/voters")]
fn list_voters(store: &State<ElectionStore>) -> Json<Vec<Voter>> {
    Json(store.read(|e| e.registry.voters().cloned().collect()))
}

#[get("/api/voters/<voter_id>")]
fn get_voter(voter_id: &str, store: &State<ElectionStore>) -> Result<Json<Voter>> {
    store
        .read(|e| e.registry.voter(voter_id).cloned())
        .map(Json)
}

#[put("/api/voters/<voter_id>", data = "<patch>", format = "json")]
fn update_voter(
    voter_id: &str,
    patch: Json<VoterPatch>,
    store: &State<ElectionStore>,
) -> Result<Json<Voter>> {
    store
        .write(|e| e.registry.update_voter(voter_id, patch.0).cloned())
        .map(Json)
}

#[delete("/api/voters/<voter_id>")]
fn delete_voter(voter_id: &str, store: &State<ElectionStore>) -> Result<Json<Value>> {
    store.write(|e| e.registry.delete_voter(voter_id))?;
    Ok(detail("deleted"))
}
