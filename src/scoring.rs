// src/scoring.rs

use std::collections::HashMap;

use crate::models::{
    question::{Question, QuestionId},
    submission::{Answer, AnswerDetail},
};

/// Result of scoring one attempt against a question set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scored {
    pub score: usize,
    pub total: usize,
    pub details: Vec<AnswerDetail>,
}

/// Scores `answers` against every question in `questions`.
///
/// * Details follow question order, one entry per question.
/// * A question without an answer is "not attempted" (`chosen = None`) and never correct.
/// * Answers for unknown question ids are ignored.
/// * If an id is answered twice the first answer counts.
/// * A choice that is negative or past the options is kept as sent and scored wrong.
pub fn score(questions: &[Question], answers: &[Answer]) -> Scored {
    let mut chosen_by_id: HashMap<&QuestionId, Option<i64>> = HashMap::with_capacity(answers.len());
    for answer in answers {
        chosen_by_id.entry(&answer.id).or_insert(answer.choice_index);
    }

    let details: Vec<AnswerDetail> = questions
        .iter()
        .map(|q| {
            let chosen = chosen_by_id.get(&q.id).copied().flatten();
            AnswerDetail {
                id: q.id.clone(),
                chosen,
                correct: q.correct_index,
                is_correct: chosen.and_then(|c| usize::try_from(c).ok()) == Some(q.correct_index),
            }
        })
        .collect();

    let score = details.iter().filter(|d| d.is_correct).count();

    Scored {
        score,
        total: questions.len(),
        details,
    }
}
