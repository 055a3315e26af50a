use std::fmt::Display;

use log::warn;
use rocket::{
    http::Status,
    response::Responder,
    serde::json::{json, Json, Value},
    Request,
};
use thiserror::Error;

use crate::logging::RequestId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid proof: {0}")]
    InvalidProof(String),
}

impl Error {
    /// Shorthand for a missing entity, e.g. `Error::not_found(format!("Voter '{id}'"))`.
    pub fn not_found(what: impl Display) -> Self {
        Self::NotFound(format!("{what} does not exist"))
    }

    /// The HTTP status this error maps to.
    pub fn status(&self) -> Status {
        match self {
            Self::NotFound(_) => Status::NotFound,
            Self::Conflict(_) => Status::Conflict,
            Self::InvalidArgument(_) => Status::UnprocessableEntity,
            Self::InvalidProof(_) => Status::BadRequest,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'o> {
        warn!("rsp{} {self}", RequestId::of(req));
        let body: Json<Value> = Json(json!({ "detail": self.to_string() }));
        (self.status(), body).respond_to(req)
    }
}
