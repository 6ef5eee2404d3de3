pub(crate) mod answer_keys;
pub(crate) mod assessments;
pub(crate) mod forms;
pub(crate) mod maintenance;
pub(crate) mod question_bank;
pub(crate) mod submissions;
pub(crate) mod users;
