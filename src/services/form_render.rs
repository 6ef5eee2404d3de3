use crate::db::models::{Assessment, Form};

pub(crate) const ANSWER_CHOICES: [&str; 5] = ["A", "B", "C", "D", "E"];

/// Full fill-in page for a distribution link: one radio group per question,
/// plus the student name field.
pub(crate) fn render_form_page(form: &Form, assessment: &Assessment) -> String {
    let mut body = String::new();

    body.push_str(&format!("<h1>{}</h1>\n", escape_html(&form.title)));
    if let Some(description) = &form.description {
        if !description.is_empty() {
            body.push_str(&format!("<p>{}</p>\n", escape_html(description)));
        }
    }

    body.push_str(&format!(
        "<form method=\"post\" action=\"/form/{}/submit\">\n",
        escape_html(&form.token)
    ));

    let required = if form.require_name { " required" } else { "" };
    body.push_str("<label>Nome do aluno\n");
    body.push_str(&format!(
        "<input type=\"text\" name=\"student_name\" placeholder=\"Anônimo\"{required}>\n"
    ));
    body.push_str("</label>\n");

    for question in assessment.questions.0.iter() {
        body.push_str(&format!(
            "<fieldset>\n<legend>Questão {} ({})</legend>\n",
            question.number,
            escape_html(&question.subject)
        ));
        for choice in ANSWER_CHOICES {
            body.push_str(&format!(
                "<label><input type=\"radio\" name=\"q{}\" value=\"{choice}\"> {choice}</label>\n",
                question.number
            ));
        }
        body.push_str("</fieldset>\n");
    }

    body.push_str("<button type=\"submit\">Enviar respostas</button>\n</form>");

    wrap_page(&form.title, &body)
}

/// Terse human-readable page used for confirmations and for every public
/// failure; no internal detail ever reaches it.
pub(crate) fn render_message_page(title: &str, message: &str) -> String {
    let body =
        format!("<h1>{}</h1>\n<p>{}</p>", escape_html(title), escape_html(message));
    wrap_page(title, &body)
}

fn wrap_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>",
        escape_html(title),
        body
    )
}

pub(crate) fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;
    use crate::db::models::AssessmentQuestion;
    use sqlx::types::Json;

    fn sample_form() -> Form {
        Form {
            id: "form-1".to_string(),
            token: "tok123".to_string(),
            assessment_id: "a-1".to_string(),
            title: "Prova 1".to_string(),
            description: Some("Primeira avaliação".to_string()),
            require_name: true,
            created_at: primitive_now_utc(),
        }
    }

    fn sample_assessment() -> Assessment {
        Assessment {
            id: "a-1".to_string(),
            name: "Prova 1".to_string(),
            question_count: 2,
            questions: Json(vec![
                AssessmentQuestion { number: 1, subject: "Física".to_string() },
                AssessmentQuestion { number: 2, subject: "Física".to_string() },
            ]),
            created_at: primitive_now_utc(),
        }
    }

    #[test]
    fn form_page_has_one_field_per_question() {
        let page = render_form_page(&sample_form(), &sample_assessment());

        assert!(page.contains("name=\"q1\""));
        assert!(page.contains("name=\"q2\""));
        assert!(!page.contains("name=\"q3\""));
        assert!(page.contains("action=\"/form/tok123/submit\""));
        assert!(page.contains("name=\"student_name\""));
        assert!(page.contains("required"));
    }

    #[test]
    fn optional_name_field_is_not_required() {
        let mut form = sample_form();
        form.require_name = false;
        let page = render_form_page(&form, &sample_assessment());

        assert!(!page.contains("required"));
    }

    #[test]
    fn escapes_html_in_titles() {
        let mut form = sample_form();
        form.title = "<script>alert(1)</script>".to_string();
        let page = render_form_page(&form, &sample_assessment());

        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn message_page_is_terse() {
        let page = render_message_page("Erro", "Formulário não encontrado.");
        assert!(page.contains("Formulário não encontrado."));
    }
}
