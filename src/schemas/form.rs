use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(crate) struct FormCreate {
    #[serde(alias = "assessmentId")]
    pub(crate) assessment_id: String,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default = "default_true")]
    #[serde(alias = "requireName")]
    pub(crate) require_name: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct FormCreated {
    pub(crate) id: String,
    pub(crate) token: String,
    pub(crate) url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_name_defaults_to_true() {
        let payload: FormCreate =
            serde_json::from_value(serde_json::json!({"assessment_id": "a-1"})).expect("payload");
        assert!(payload.require_name);
        assert!(payload.title.is_none());
    }
}
