use rocket::{serde::json::Json, Route, State};

use crate::analytics::plurality::{Leaderboard, WinnerReport};
use crate::model::{Election, ElectionStore};

pub fn routes() -> Vec<Route> {
    routes![leaderboard, winner]
}

#[get("/api/results/leaderboard")]
fn leaderboard(store: &State<ElectionStore>) -> Json<Leaderboard> {
    Json(Leaderboard {
        leaderboard: store.read(Election::leaderboard),
    })
}

#[get("/api/results/winner")]
fn winner(store: &State<ElectionStore>) -> Json<WinnerReport> {
    Json(store.read(Election::winner))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rocket::http::Status;
    use rocket::local::asynchronous::Client;

    use super::*;
    use crate::model::vote::VoteRequest;

    async fn fetch_winner(client: &Client) -> WinnerReport {
        let response = client.get(uri!(winner)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        response.into_json::<WinnerReport>().await.unwrap()
    }

    #[backend_test]
    async fn no_candidates_no_winner(client: Client) {
        let report = fetch_winner(&client).await;
        assert_eq!(
            report,
            WinnerReport {
                winner: None,
                tie: false,
                tied: None,
            }
        );

        let response = client.get(uri!(leaderboard)).dispatch().await;
        let board = response.into_json::<Leaderboard>().await.unwrap();
        assert!(board.leaderboard.is_empty());
    }

    #[backend_test(seeded)]
    async fn ties_then_a_winner(client: Client, store: ElectionStore) {
        store.write(|e| {
            e.cast(VoteRequest::new("v1", "c2"), Utc::now()).unwrap();
            e.cast(VoteRequest::new("v2", "c1"), Utc::now()).unwrap();
        });
        let report = fetch_winner(&client).await;
        assert!(report.tie);
        assert_eq!(report.winner, None);
        assert_eq!(report.tied, Some(vec!["c1".to_string(), "c2".to_string()]));

        store.write(|e| {
            e.cast_weighted(VoteRequest::new("v3", "c2").with_weight(0.25), Utc::now())
                .unwrap();
        });
        let report = fetch_winner(&client).await;
        assert!(!report.tie);
        assert_eq!(report.winner.as_deref(), Some("c2"));

        let response = client.get(uri!(leaderboard)).dispatch().await;
        let board = response.into_json::<Leaderboard>().await.unwrap().leaderboard;
        assert_eq!(board[0].candidate_id, "c2");
        assert_eq!(board[0].votes, 1.25);
    }
}
