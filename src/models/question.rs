// src/models/question.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Question identifier as written in the question file, a number or a string.
/// `1` and `"1"` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{}", n),
            QuestionId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for QuestionId {
    fn from(n: i64) -> Self {
        QuestionId::Number(n)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        QuestionId::Text(s.to_string())
    }
}

/// One record of the question file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,

    /// The prompt shown to the participant.
    pub question: String,

    /// Answer options, in display order.
    pub options: Vec<String>,

    /// Index into `options` of the correct answer.
    pub correct_index: usize,
}

impl Question {
    /// `correct_index` must point at an existing option.
    pub fn has_valid_answer_key(&self) -> bool {
        self.correct_index < self.options.len()
    }
}

/// DTO for sending a question to clients (excludes the answer key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<String>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question: q.question,
            options: q.options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_question_drops_answer_key() {
        let q = Question {
            id: 1.into(),
            question: "2+2?".to_string(),
            options: vec!["3".into(), "4".into(), "5".into()],
            correct_index: 1,
        };
        let json = serde_json::to_value(PublicQuestion::from(q)).unwrap();
        assert!(json.get("correctIndex").is_none());
        assert_eq!(json["options"][1], "4");
    }

    #[test]
    fn answer_key_must_index_options() {
        let mut q: Question = serde_json::from_str(
            r#"{"id": 7, "question": "?", "options": ["a", "b"], "correctIndex": 1}"#,
        )
        .unwrap();
        assert!(q.has_valid_answer_key());
        q.correct_index = 2;
        assert!(!q.has_valid_answer_key());
    }

    #[test]
    fn ids_may_be_numbers_or_strings() {
        let questions: Vec<Question> = serde_json::from_str(
            r#"[
                {"id": 1, "question": "?", "options": ["a"], "correctIndex": 0},
                {"id": "q2", "question": "?", "options": ["a"], "correctIndex": 0}
            ]"#,
        )
        .unwrap();
        assert_eq!(questions[0].id, QuestionId::Number(1));
        assert_eq!(questions[1].id, QuestionId::from("q2"));
        assert_ne!(QuestionId::from(1), QuestionId::from("1"));

        let json = serde_json::to_value(PublicQuestion::from(questions[1].clone())).unwrap();
        assert_eq!(json["id"], "q2");
    }
}
