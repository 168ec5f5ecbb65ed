use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::types::question::{Question, QuestionId};
use handle_errors::Error;

/// Category id that stands for "every category" in a quiz round.
pub const ALL_CATEGORIES: i32 = 0;

/// Body of `POST /quizzes`. The client carries the round's progress in
/// `previous_questions` and resends it on every call.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct QuizRequest {
    pub quiz_category: Option<QuizCategory>,
    pub previous_questions: Option<Vec<QuestionId>>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum QuizCategory {
    Object { id: CategoryIdValue },
    Bare(CategoryIdValue),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum CategoryIdValue {
    Number(i32),
    Text(String),
}

impl CategoryIdValue {
    fn resolve(&self) -> Result<i32, Error> {
        match self {
            CategoryIdValue::Number(id) => Ok(*id),
            CategoryIdValue::Text(text) => text.trim().parse::<i32>().map_err(Error::ParseError),
        }
    }
}

impl QuizRequest {
    pub fn category_id(&self) -> Result<i32, Error> {
        match &self.quiz_category {
            Some(QuizCategory::Object { id }) | Some(QuizCategory::Bare(id)) => id.resolve(),
            None => Err(Error::MissingParameters),
        }
    }

    pub fn previous_questions(&self) -> &[QuestionId] {
        self.previous_questions.as_deref().unwrap_or_default()
    }
}

/// Picks uniformly among the candidates that were not served before.
pub fn pick_question<'a, R: Rng + ?Sized>(
    candidates: &'a [Question],
    previous: &[QuestionId],
    rng: &mut R,
) -> Option<&'a Question> {
    let remaining: Vec<&Question> = candidates
        .iter()
        .filter(|question| !previous.contains(&question.id))
        .collect();
    remaining.choose(rng).copied()
}
