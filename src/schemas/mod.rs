pub(crate) mod auth;
pub(crate) mod category;
pub(crate) mod material;
pub(crate) mod question;
pub(crate) mod quiz;
pub(crate) mod stats;
pub(crate) mod submission;
pub(crate) mod user;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
    pub(crate) docs: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) database: &'static str,
    pub(crate) redis: String,
}
