use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{Level, event, info, instrument};

use crate::store::Store;
use crate::types::category::category_map;
use crate::types::pagination::{Pagination, extract_pagination};
use crate::types::question::{Question, QuestionId, QuestionRequest, SearchRequest};
use handle_errors::Error;

#[derive(Serialize, Debug)]
struct QuestionsResponse<'a> {
    success: bool,
    questions: &'a [Question],
    categories: BTreeMap<i32, String>,
    total_questions: usize,
}

#[derive(Serialize, Debug)]
struct QuestionResponse {
    success: bool,
    question: Question,
}

#[derive(Serialize, Debug)]
struct DeleteResponse {
    success: bool,
    id: QuestionId,
}

#[derive(Serialize, Debug)]
struct SearchResponse {
    success: bool,
    questions: Vec<Question>,
    #[serde(rename = "totalQuestions")]
    total_questions: usize,
}

#[instrument(skip(store))]
pub async fn get_questions(
    params: HashMap<String, String>,
    store: Store,
) -> Result<impl warp::Reply, warp::Rejection> {
    event!(target: "trivia_api", Level::INFO, "querying questions");
    let pagination = extract_pagination(params);
    list_questions(pagination, store).await
}

#[instrument(skip(store))]
pub async fn get_questions_page(page: u32, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    let pagination = Pagination::new(page);
    list_questions(pagination, store).await
}

async fn list_questions(
    pagination: Pagination,
    store: Store,
) -> Result<warp::reply::Json, warp::Rejection> {
    let questions = store.get_questions().await?;
    let categories = store.get_categories().await?;

    let page = pagination.paginate(&questions);
    if page.is_empty() {
        return Err(warp::reject::custom(Error::NotFound));
    }

    info!(page = pagination.page(), total = questions.len());
    Ok(warp::reply::json(&QuestionsResponse {
        success: true,
        questions: page,
        categories: category_map(&categories),
        total_questions: questions.len(),
    }))
}

#[instrument(skip(store))]
pub async fn add_question(
    store: Store,
    request: QuestionRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let request = request.validate()?;

    let category = match store.find_category(&request.category).await? {
        Some(category) => category,
        None => {
            return Err(warp::reject::custom(Error::UnknownCategory(
                request.category.to_string(),
            )));
        }
    };

    let question = store
        .add_question(request.into_new_question(category.id))
        .await?;

    event!(target: "trivia_api", Level::INFO, id = question.id.0, "question added");
    Ok(warp::reply::json(&QuestionResponse {
        success: true,
        question,
    }))
}

#[instrument(skip(store))]
pub async fn delete_question(id: i32, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    if id <= 0 {
        return Err(warp::reject::custom(Error::InvalidId(id)));
    }

    let id = QuestionId(id);
    if !store.delete_question(id).await? {
        return Err(warp::reject::custom(Error::NotFound));
    }

    event!(target: "trivia_api", Level::INFO, id = id.0, "question deleted");
    Ok(warp::reply::json(&DeleteResponse { success: true, id }))
}

/// `DELETE /questions` without an id.
pub async fn delete_without_id() -> Result<warp::reply::Json, warp::Rejection> {
    Err(warp::reject::custom(Error::MissingParameters))
}

#[instrument(skip(store))]
pub async fn search_questions(
    store: Store,
    request: SearchRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let term = request.search_term.ok_or(Error::MissingParameters)?;
    let questions = store.search_questions(&term).await?;
    if questions.is_empty() {
        return Err(warp::reject::custom(Error::NotFound));
    }

    info!(matches = questions.len());
    Ok(warp::reply::json(&SearchResponse {
        success: true,
        total_questions: questions.len(),
        questions,
    }))
}
