#![warn(clippy::all)]

use handle_errors::return_error;
use tracing_subscriber::fmt::format::FmtSpan;
use warp::{Filter, Reply, http::Method};

pub mod config;
pub mod routes;
pub mod store;
pub mod types;

/// Builds every route of the service, recovered into JSON error envelopes.
///
/// Paths are matched before methods, so an unknown path is a 404 and a
/// known path with the wrong verb is a 405.
pub fn build_routes(
    store: store::Store,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let store_filter = warp::any().map(move || store.clone());

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["Content-Type", "Authorization"])
        .allow_methods(&[
            Method::GET,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]);

    let get_categories = warp::path("categories")
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(routes::category::get_categories);

    let get_questions_by_category = warp::path!("categories" / String / "questions")
        .and(warp::get())
        .and(warp::query())
        .and(store_filter.clone())
        .and_then(routes::category::get_questions_by_category);

    let get_questions_by_category_page = warp::path!("categories" / String / "questions" / u32)
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(routes::category::get_questions_by_category_page);

    let get_questions = warp::path("questions")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query())
        .and(store_filter.clone())
        .and_then(routes::question::get_questions);

    let get_questions_page = warp::path!("questions" / u32)
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(routes::question::get_questions_page);

    let add_question = warp::path("questions")
        .and(warp::path::end())
        .and(warp::post())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(routes::question::add_question);

    let delete_question = warp::path!("questions" / i32)
        .and(warp::delete())
        .and(store_filter.clone())
        .and_then(routes::question::delete_question);

    let delete_without_id = warp::path("questions")
        .and(warp::path::end())
        .and(warp::delete())
        .and_then(routes::question::delete_without_id);

    let search_questions = warp::path("search")
        .and(warp::path::end())
        .and(warp::post())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(routes::question::search_questions);

    let next_quiz_question = warp::path("quizzes")
        .and(warp::path::end())
        .and(warp::post())
        .and(store_filter)
        .and(warp::body::json())
        .and_then(routes::quiz::next_question);

    get_categories
        .or(get_questions_by_category)
        .or(get_questions_by_category_page)
        .or(get_questions)
        .or(get_questions_page)
        .or(add_question)
        .or(delete_question)
        .or(delete_without_id)
        .or(search_questions)
        .or(next_quiz_question)
        .with(cors)
        .with(warp::trace(|info| {
            tracing::info_span!(
                "request",
                method = %info.method(),
                path = %info.path(),
                id = %uuid::Uuid::new_v4(),
            )
        }))
        .recover(return_error)
}

pub async fn setup_store(config: &config::Config) -> Result<store::Store, handle_errors::Error> {
    let log_filter = format!(
        "handle_errors={},trivia_api={},warp={}",
        config.log_level, config.log_level, config.log_level
    );

    tracing_subscriber::fmt()
        // 위에 만든 필터로 어떤 추적을 기록할지 결정한다.
        .with_env_filter(log_filter)
        // 각 범위가 닫힐 때 이벤트를 기록한다.
        .with_span_events(FmtSpan::CLOSE)
        .init();

    store::Store::new(&config.database_url())
        .await
        .map_err(handle_errors::Error::DatabaseQueryError)
}

pub async fn run(config: &config::Config, store: store::Store) {
    let routes = build_routes(store);
    tracing::info!(port = config.port, "Trivia API listening");
    warp::serve(routes).run(([0, 0, 0, 0], config.port)).await;
}
