use log::{error, info};
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::{Deserialize, Serialize};

use crate::analytics::privacy::PrivacyParams;
use crate::error::Result;

fn default_dp_parameter() -> f64 {
    1.0
}

/// Analytics configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and is reported
/// by `/api/config`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Privacy budget used when a query does not supply one.
    #[serde(default = "default_dp_parameter")]
    pub dp_epsilon: f64,
    /// Query sensitivity used when a query does not supply one.
    #[serde(default = "default_dp_parameter")]
    pub dp_sensitivity: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            dp_epsilon: default_dp_parameter(),
            dp_sensitivity: default_dp_parameter(),
        }
    }
}

impl AnalyticsConfig {
    /// Privacy parameters for a query, falling back to the configured values.
    pub fn privacy_params(
        &self,
        epsilon: Option<f64>,
        sensitivity: Option<f64>,
    ) -> Result<PrivacyParams> {
        PrivacyParams::new(
            epsilon.unwrap_or(self.dp_epsilon),
            sensitivity.unwrap_or(self.dp_sensitivity),
        )
    }

    /// Check the configured defaults are themselves usable.
    pub fn validate(&self) -> Result<()> {
        self.privacy_params(None, None).map(|_| ())
    }
}

/// A fairing that loads the analytics config and puts it in managed state.
/// This could easily be achieved using `AdHoc::config`, but is written out
/// explicitly for control over error messages and validation.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<AnalyticsConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        if let Err(e) = config.validate() {
            error!("Invalid application config: {e}");
            return Err(rocket);
        }
        info!(
            "Loaded analytics config (dp_epsilon = {}, dp_sensitivity = {})",
            config.dp_epsilon, config.dp_sensitivity
        );

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}
