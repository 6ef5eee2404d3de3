pub(crate) mod assessments;
pub(crate) mod auth;
pub(crate) mod errors;
pub(crate) mod forms;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod router;
pub(crate) mod submissions;
pub(crate) mod users;
pub(crate) mod validation;
