use serde::Serialize;

/// Body of the liveness probe.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct Health {
    pub status: &'static str,
}
