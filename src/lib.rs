#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

use crate::config::ConfigFairing;
use crate::cors::CorsFairing;
use crate::logging::{LoggerFairing, Metrics};
use crate::model::ElectionStore;

pub mod analytics;
pub mod api;
pub mod config;
pub mod cors;
pub mod error;
pub mod logging;
pub mod model;
pub mod toy_crypto;

/// A server with fresh, empty election state.
pub fn build() -> Rocket<Build> {
    rocket_for_store(ElectionStore::default())
}

/// A server sharing the given election state.
pub fn rocket_for_store(store: ElectionStore) -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .mount("/", cors::routes())
        .attach(ConfigFairing)
        .attach(LoggerFairing)
        .attach(CorsFairing)
        .manage(store)
        .manage(Metrics::default())
}
