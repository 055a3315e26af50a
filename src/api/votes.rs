use chrono::Utc;
use rocket::{http::Status, response::status::Custom, serde::json::Json, Route, State};

use crate::analytics::{
    audit::{self, AuditResult},
    plurality::Leaderboard,
    privacy::{self, DpMetric, DpRequest, DpResult, DpValue},
    schulze::{self, SchulzeRequest, SchulzeResult},
};
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::model::{
    timestamp::parse_bound,
    vote::{BallotAccepted, EncryptedBallot, VoteAccepted, VoteList, VoteRequest},
    Election, ElectionStore,
};
use crate::toy_crypto::homomorphic::{self, TallyRequest, TallyResult};

pub fn routes() -> Vec<Route> {
    routes![
        cast_vote,
        cast_weighted_vote,
        query_votes,
        vote_summary,
        submit_encrypted,
        homomorphic_tally,
        kaplan_markov,
        differential_privacy,
        schulze_winners,
    ]
}

#[post("/api/votes", data = "<vote>", format = "json")]
fn cast_vote(
    vote: Json<VoteRequest>,
    store: &State<ElectionStore>,
) -> Result<Custom<Json<VoteAccepted>>> {
    let timestamp = store.write(|e| e.cast(vote.0, Utc::now()))?;
    Ok(Custom(
        Status::Created,
        Json(VoteAccepted {
            detail: "vote accepted".to_string(),
            timestamp,
        }),
    ))
}

#[post("/api/votes/weighted", data = "<vote>", format = "json")]
fn cast_weighted_vote(
    vote: Json<VoteRequest>,
    store: &State<ElectionStore>,
) -> Result<Custom<Json<VoteAccepted>>> {
    let timestamp = store.write(|e| e.cast_weighted(vote.0, Utc::now()))?;
    Ok(Custom(
        Status::Created,
        Json(VoteAccepted {
            detail: "weighted vote accepted".to_string(),
            timestamp,
        }),
    ))
}

/// Votes timestamped within `[start, end]`. Either bound may be omitted.
#[get("/api/votes?<start>&<end>")]
fn query_votes(
    start: Option<&str>,
    end: Option<&str>,
    store: &State<ElectionStore>,
) -> Result<Json<VoteList>> {
    let (start, end) = (parse_bound(start)?, parse_bound(end)?);
    Ok(Json(store.read(|e| {
        e.ledger.query(start, end).cloned().collect()
    })))
}

#[get("/api/votes/summary")]
fn vote_summary(store: &State<ElectionStore>) -> Json<Leaderboard> {
    Json(Leaderboard {
        leaderboard: store.read(Election::leaderboard),
    })
}

#[post("/api/votes/encrypted", data = "<ballot>", format = "json")]
fn submit_encrypted(
    ballot: Json<EncryptedBallot>,
    store: &State<ElectionStore>,
) -> Result<Json<BallotAccepted>> {
    let index = store.write(|e| e.submit_encrypted(ballot.0))?;
    Ok(Json(BallotAccepted {
        detail: "encrypted ballot accepted".to_string(),
        index,
    }))
}

#[post("/api/votes/homomorphic_tally", data = "<request>", format = "json")]
fn homomorphic_tally(request: Json<TallyRequest>) -> Result<Json<TallyResult>> {
    homomorphic::tally(&request).map(Json)
}

#[post("/api/votes/rla/kaplan_markov?<sampled_winner_votes>&<sampled_loser_votes>&<reported_margin>")]
fn kaplan_markov(
    sampled_winner_votes: i64,
    sampled_loser_votes: i64,
    reported_margin: f64,
) -> Result<Json<AuditResult>> {
    audit::kaplan_markov_p_value(sampled_winner_votes, sampled_loser_votes, reported_margin)
        .map(Json)
}

#[post("/api/votes/analytics/dp", data = "<request>", format = "json")]
fn differential_privacy(
    request: Json<DpRequest>,
    store: &State<ElectionStore>,
    config: &State<AnalyticsConfig>,
) -> Result<Json<DpResult>> {
    let metric = request.metric.parse::<DpMetric>()?;
    let params = config.privacy_params(request.epsilon, request.sensitivity)?;
    let mut rng = rand::thread_rng();
    let value = match metric {
        DpMetric::Turnout => DpValue::Scalar(
            store.read(|e| privacy::noisy_turnout(&mut rng, e.ledger.votes(), params)),
        ),
        DpMetric::PerCandidate => DpValue::PerCandidate(privacy::noisy_per_candidate(
            &mut rng,
            store.read(Election::totals),
            params,
        )),
    };
    Ok(Json(DpResult { metric, value }))
}

#[post("/api/votes/rcv/schulze", data = "<request>", format = "json")]
fn schulze_winners(request: Json<SchulzeRequest>) -> Result<Json<SchulzeResult>> {
    schulze::resolve(&request).map(Json)
}
