use rocket::{
    response::status::Created,
    serde::json::{Json, Value},
    Route, State,
};

use crate::error::Result;
use crate::model::{
    candidate::{Candidate, CandidatePatch},
    ElectionStore,
};

use super::detail;

pub fn routes() -> Vec<Route> {
    routes![
        create_candidate,
        list_candidates,
        get_candidate,
        update_candidate,
        delete_candidate,
    ]
}

#[post("/api/candidates", data = "<candidate>", format = "json")]
fn create_candidate(
    candidate: Json<Candidate>,
    store: &State<ElectionStore>,
) -> Result<Created<Json<Candidate>>> {
    let candidate = store.write(|e| e.registry.register_candidate(candidate.0).cloned())?;
    let location = uri!(get_candidate(candidate.candidate_id.as_str())).to_string();
    Ok(Created::new(location).body(Json(candidate)))
}

/// All candidates, or only those standing for `party` when it is non-empty.
#[get("/api/candidates?<party>")]
fn list_candidates(party: Option<&str>, store: &State<ElectionStore>) -> Json<Vec<Candidate>> {
    Json(store.read(|e| e.registry.candidates(party).cloned().collect()))
}

#[get("/api/candidates/<candidate_id>")]
fn get_candidate(candidate_id: &str, store: &State<ElectionStore>) -> Result<Json<Candidate>> {
    store
        .read(|e| e.registry.candidate(candidate_id).cloned())
        .map(Json)
}

#[put("/api/candidates/<candidate_id>", data = "<patch>", format = "json")]
fn update_candidate(
    candidate_id: &str,
    patch: Json<CandidatePatch>,
    store: &State<ElectionStore>,
) -> Result<Json<Candidate>> {
    store
        .write(|e| e.registry.update_candidate(candidate_id, patch.0).cloned())
        .map(Json)
}

#[delete("/api/candidates/<candidate_id>")]
fn delete_candidate(candidate_id: &str, store: &State<ElectionStore>) -> Result<Json<Value>> {
    store.write(|e| e.registry.delete_candidate(candidate_id))?;
    Ok(detail("deleted"))
}

#[cfg(test)]
mod tests {
    use rocket::http::{ContentType, Status};
    use rocket::local::asynchronous::Client;
    use rocket::serde::json::json;

    use super::*;

    async fn candidate_ids(client: &Client, party: Option<&str>) -> Vec<String> {
        client
            .get(uri!(list_candidates(party)))
            .dispatch()
            .await
            .into_json::<Vec<Candidate>>()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.candidate_id)
            .collect()
    }

    #[backend_test]
    async fn register_twice(client: Client) {
        let body = json!(Candidate::example1()).to_string();
        let response = client
            .post(uri!(create_candidate))
            .header(ContentType::JSON)
            .body(&body)
            .dispatch()
            .await;
        assert_eq!(Status::Created, response.status());

        let response = client
            .post(uri!(create_candidate))
            .header(ContentType::JSON)
            .body(&body)
            .dispatch()
            .await;
        assert_eq!(Status::Conflict, response.status());
        let error = response.into_json::<Value>().await.unwrap();
        assert!(error["detail"].as_str().unwrap().contains("c1"));
    }

    #[backend_test(seeded)]
    async fn filter_by_party(client: Client) {
        assert_eq!(candidate_ids(&client, None).await, ["c1", "c2", "c3"]);
        assert_eq!(candidate_ids(&client, Some("Purple")).await, ["c1"]);
        assert_eq!(candidate_ids(&client, Some("")).await, ["c1", "c2", "c3"]);
        assert!(candidate_ids(&client, Some("Teal")).await.is_empty());
    }

    #[backend_test(seeded)]
    async fn patch_and_delete(client: Client, store: ElectionStore) {
        let response = client
            .put(uri!(update_candidate("c3")))
            .header(ContentType::JSON)
            .body(json!({ "party": "Teal" }).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        assert_eq!(candidate_ids(&client, Some("Teal")).await, ["c3"]);

        let response = client
            .put(uri!(update_candidate("c1")))
            .header(ContentType::JSON)
            .body(json!({ "party": null }).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let updated = response.into_json::<Candidate>().await.unwrap();
        assert_eq!(updated.name, "Carol");
        assert_eq!(updated.party, None);
        assert!(candidate_ids(&client, Some("Purple")).await.is_empty());

        let response = client.delete(uri!(delete_candidate("c3"))).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert!(!store.read(|e| e.registry.candidate_exists("c3")));

        let response = client.get(uri!(get_candidate("c3"))).dispatch().await;
        assert_eq!(Status::NotFound, response.status());
    }
}
