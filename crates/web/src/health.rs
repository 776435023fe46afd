use hdp_core::Domain;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    /// Domains with a bound model.
    pub domains: Vec<Domain>,
}

/// Liveness check for the web front-end.
///
/// Models are loaded and bound before the server starts listening, so a process that can
/// answer is ready to predict for every domain it lists.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    pub fn check_health(domains: impl IntoIterator<Item = Domain>) -> HealthRes {
        HealthRes {
            ok: true,
            message: "HDP is alive".into(),
            domains: domains.into_iter().collect(),
        }
    }
}
