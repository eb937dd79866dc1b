pub(crate) mod categories;
pub(crate) mod materials;
pub(crate) mod questions;
pub(crate) mod quizzes;
pub(crate) mod stats;
pub(crate) mod submissions;
pub(crate) mod users;
