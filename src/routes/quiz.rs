use serde::Serialize;
use tracing::{Level, event, instrument};

use crate::store::Store;
use crate::types::category::CategoryId;
use crate::types::question::Question;
use crate::types::quiz::{ALL_CATEGORIES, QuizRequest, pick_question};
use handle_errors::Error;

#[derive(Serialize, Debug)]
struct QuizResponse {
    success: bool,
    question: Question,
}

#[instrument(skip(store))]
pub async fn next_question(
    store: Store,
    request: QuizRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let category_id = request.category_id()?;

    let candidates = if category_id == ALL_CATEGORIES {
        store.get_questions().await?
    } else {
        let category = store
            .get_category(CategoryId(category_id))
            .await?
            .ok_or(Error::CategoryNotFound(category_id))?;
        store.get_questions_by_category(category.id).await?
    };

    let previous = request.previous_questions();
    let next = pick_question(&candidates, previous, &mut rand::thread_rng()).cloned();

    match next {
        Some(question) => {
            event!(
                target: "trivia_api",
                Level::INFO,
                category = category_id,
                id = question.id.0,
                seen = previous.len(),
                "quiz question served"
            );
            Ok(warp::reply::json(&QuizResponse {
                success: true,
                question,
            }))
        }
        None => Err(warp::reject::custom(Error::NotFound)),
    }
}
