pub(crate) mod form_render;
pub(crate) mod form_tokens;
pub(crate) mod grading;
