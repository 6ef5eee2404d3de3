use std::collections::HashMap;

use crate::db::models::{GradedAnswer, KeyAnswer};

/// One answer as it arrives for grading, before correctness is known.
#[derive(Debug, Clone)]
pub(crate) struct SubmittedAnswer {
    pub(crate) question_number: i32,
    pub(crate) answer: String,
    pub(crate) subject: String,
}

/// Grades every submitted item against the authoritative key.
///
/// Pure and total: a question number the key does not cover grades as
/// incorrect rather than erroring, so the submission flow always completes.
/// Correctness is recomputed here regardless of anything a client claimed.
pub(crate) fn grade(submitted: Vec<SubmittedAnswer>, key: &[KeyAnswer]) -> Vec<GradedAnswer> {
    let correct_by_number: HashMap<i32, &str> =
        key.iter().map(|entry| (entry.question_number, entry.correct_answer.as_str())).collect();

    submitted
        .into_iter()
        .map(|item| {
            let is_correct = correct_by_number
                .get(&item.question_number)
                .is_some_and(|correct| !item.answer.is_empty() && item.answer == *correct);

            GradedAnswer {
                question_number: item.question_number,
                answer: item.answer,
                is_correct,
                subject: item.subject,
            }
        })
        .collect()
}
