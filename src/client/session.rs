// src/client/session.rs

use std::fmt;

use super::{ResolveError, Resolver};
use crate::models::{
    question::PublicQuestion,
    submission::{Answer, SubmissionRecord, SubmitRequest},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the participant to start.
    Identify,
    Loading,
    Answering,
    Submitting,
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub email: String,
}

#[derive(Debug)]
pub enum SessionError {
    /// The action is not valid in the current phase.
    WrongPhase(Phase),
    Resolve(ResolveError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::WrongPhase(phase) => write!(f, "not possible while {:?}", phase),
            SessionError::Resolve(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ResolveError> for SessionError {
    fn from(err: ResolveError) -> Self {
        SessionError::Resolve(err)
    }
}

/// One participant's pass through the quiz.
///
/// Network failures never leave the session half-way: a failed load goes back
/// to the phase it started from, a failed submit goes back to `Answering`
/// with every selection intact.
#[derive(Debug)]
pub struct QuizSession {
    phase: Phase,
    participant: Participant,
    questions: Vec<PublicQuestion>,
    selections: Vec<Option<usize>>,
    result: Option<SubmissionRecord>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::Identify,
            participant: Participant::default(),
            questions: Vec::new(),
            selections: Vec::new(),
            result: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    pub fn questions(&self) -> &[PublicQuestion] {
        &self.questions
    }

    pub fn selections(&self) -> &[Option<usize>] {
        &self.selections
    }

    pub fn result(&self) -> Option<&SubmissionRecord> {
        self.result.as_ref()
    }

    /// Loads the question set and starts over, from any phase.
    pub async fn start(
        &mut self,
        participant: Participant,
        resolver: &mut Resolver,
    ) -> Result<(), SessionError> {
        let previous = self.phase;
        self.phase = Phase::Loading;

        match resolver.questions().await {
            Ok(questions) => {
                self.present(participant, questions);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Loading questions failed: {}", e);
                self.phase = previous;
                Err(e.into())
            }
        }
    }

    fn present(&mut self, participant: Participant, questions: Vec<PublicQuestion>) {
        self.selections = vec![None; questions.len()];
        self.questions = questions;
        self.participant = participant;
        self.result = None;
        self.phase = Phase::Answering;
    }

    /// Selects `option` for the question at `position`, replacing any earlier choice.
    /// Returns `false` if either index is out of range or the quiz is not open.
    pub fn select(&mut self, position: usize, option: usize) -> bool {
        if self.phase != Phase::Answering {
            return false;
        }
        match self.questions.get(position) {
            Some(q) if option < q.options.len() => {
                self.selections[position] = Some(option);
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self, position: usize) -> bool {
        if self.phase != Phase::Answering {
            return false;
        }
        match self.selections.get_mut(position) {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    pub fn answered(&self) -> usize {
        self.selections.iter().filter(|s| s.is_some()).count()
    }

    /// One answer per question, unanswered ones as `null`.
    pub fn answers(&self) -> Vec<Answer> {
        self.questions
            .iter()
            .zip(&self.selections)
            .map(|(q, chosen)| Answer {
                id: q.id.clone(),
                choice_index: chosen.and_then(|c| i64::try_from(c).ok()),
            })
            .collect()
    }

    pub fn request(&self) -> SubmitRequest {
        let non_empty = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        SubmitRequest {
            name: non_empty(&self.participant.name),
            email: non_empty(&self.participant.email),
            answers: self.answers(),
        }
    }

    /// Sends the answers for server-side scoring.
    pub async fn submit(
        &mut self,
        resolver: &mut Resolver,
    ) -> Result<&SubmissionRecord, SessionError> {
        if self.phase != Phase::Answering {
            return Err(SessionError::WrongPhase(self.phase));
        }

        let request = self.request();
        self.phase = Phase::Submitting;

        match resolver.submit(&request).await {
            Ok(record) => {
                self.phase = Phase::Finished;
                Ok(&*self.result.insert(record))
            }
            Err(e) => {
                tracing::warn!("Submitting answers failed: {}", e);
                self.phase = Phase::Answering;
                Err(e.into())
            }
        }
    }
}
