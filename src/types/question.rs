use serde::{Deserialize, Serialize};

use crate::types::category::{CategoryId, CategoryRef};
use handle_errors::Error;

pub const MIN_DIFFICULTY: i32 = 1;
pub const MAX_DIFFICULTY: i32 = 5;

#[derive(Serialize, Debug, Deserialize, Clone, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub answer: String,
    pub category: CategoryId,
    pub difficulty: i32,
}

#[derive(Serialize, Debug, Clone, Copy, Eq, Hash, Deserialize, PartialEq)]
pub struct QuestionId(pub i32);

/// A question ready to be inserted, its category already resolved.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: CategoryId,
    pub difficulty: i32,
}

/// Body of `POST /questions`. Every key is required, but they are decoded
/// as options so a missing key is reported as a bad request instead of a
/// deserialization failure.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct QuestionRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<CategoryRef>,
    /// Wider than the stored column so an oversized number is out of range
    /// rather than undecodable.
    pub difficulty: Option<i64>,
}

/// A create request whose fields are all present and whose difficulty is in
/// range. The category still has to be looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidQuestionRequest {
    pub question: String,
    pub answer: String,
    pub category: CategoryRef,
    pub difficulty: i32,
}

impl ValidQuestionRequest {
    pub fn into_new_question(self, category: CategoryId) -> NewQuestion {
        NewQuestion {
            question: self.question,
            answer: self.answer,
            category,
            difficulty: self.difficulty,
        }
    }
}

impl QuestionRequest {
    pub fn validate(self) -> Result<ValidQuestionRequest, Error> {
        let (Some(question), Some(answer), Some(category), Some(difficulty)) =
            (self.question, self.answer, self.category, self.difficulty)
        else {
            return Err(Error::MissingParameters);
        };

        let difficulty = match i32::try_from(difficulty) {
            Ok(d) if (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&d) => d,
            _ => return Err(Error::InvalidDifficulty(difficulty)),
        };

        Ok(ValidQuestionRequest {
            question,
            answer,
            category,
            difficulty,
        })
    }
}

/// Body of `POST /search`.
#[derive(Deserialize, Debug, Clone)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm")]
    pub search_term: Option<String>,
}

/// Turns a search term into an `ILIKE` pattern that matches it as a literal
/// substring.
pub fn search_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
