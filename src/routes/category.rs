use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{Level, event, instrument};

use crate::store::Store;
use crate::types::category::{CategoryRef, category_map};
use crate::types::pagination::{Pagination, extract_pagination};
use crate::types::question::Question;
use handle_errors::Error;

#[derive(Serialize, Debug)]
struct CategoriesResponse {
    success: bool,
    categories: BTreeMap<i32, String>,
    total_categories: usize,
}

#[derive(Serialize, Debug)]
struct CategoryQuestionsResponse<'a> {
    success: bool,
    questions: &'a [Question],
    total_questions: usize,
    current_category: String,
}

#[instrument(skip(store))]
pub async fn get_categories(store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    let categories = store.get_categories().await?;
    if categories.is_empty() {
        return Err(warp::reject::custom(Error::NotFound));
    }

    event!(target: "trivia_api", Level::INFO, total = categories.len(), "listing categories");
    Ok(warp::reply::json(&CategoriesResponse {
        success: true,
        categories: category_map(&categories),
        total_categories: categories.len(),
    }))
}

pub async fn get_questions_by_category(
    category: String,
    params: HashMap<String, String>,
    store: Store,
) -> Result<impl warp::Reply, warp::Rejection> {
    let pagination = extract_pagination(params);
    list_category_questions(category, pagination, store).await
}

pub async fn get_questions_by_category_page(
    category: String,
    page: u32,
    store: Store,
) -> Result<impl warp::Reply, warp::Rejection> {
    let pagination = Pagination::new(page);
    list_category_questions(category, pagination, store).await
}

#[instrument(skip(store))]
async fn list_category_questions(
    category: String,
    pagination: Pagination,
    store: Store,
) -> Result<warp::reply::Json, warp::Rejection> {
    // warp은 경로 조각을 디코딩하지 않는다
    let category = urlencoding::decode(&category)
        .map_err(Error::InvalidEncoding)?
        .into_owned();
    let category_ref = CategoryRef::parse(&category);
    let category = match store.find_category(&category_ref).await? {
        Some(category) => category,
        None => return Err(warp::reject::custom(Error::UnknownCategory(category))),
    };

    let questions = store.get_questions_by_category(category.id).await?;
    let page = pagination.paginate(&questions);
    if page.is_empty() {
        return Err(warp::reject::custom(Error::NotFound));
    }

    event!(
        target: "trivia_api",
        Level::INFO,
        category = %category_ref,
        page = pagination.page(),
        "listing questions by category"
    );
    Ok(warp::reply::json(&CategoryQuestionsResponse {
        success: true,
        questions: page,
        total_questions: questions.len(),
        current_category: category.kind,
    }))
}
