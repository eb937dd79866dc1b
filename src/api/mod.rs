pub(crate) mod attempts;
pub(crate) mod auth;
pub(crate) mod categories;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod materials;
pub(crate) mod quizzes;
pub(crate) mod reports;
pub(crate) mod router;
pub(crate) mod stats;
