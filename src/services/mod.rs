pub(crate) mod quiz_codes;
pub(crate) mod reports;
pub(crate) mod scoring;
pub(crate) mod sequencing;
