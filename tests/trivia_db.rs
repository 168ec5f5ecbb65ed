//! End-to-end run against PostgreSQL. Set `TEST_DATABASE_URL` to a scratch
//! database to enable it; the `categories` and `questions` tables in it are
//! dropped and recreated.

use serde_json::{Value, json};
use trivia_api::{build_routes, store::Store};
use warp::http::StatusCode;
use warp::test::RequestBuilder;

const SCHEMA: [&str; 4] = [
    "DROP TABLE IF EXISTS questions",
    "DROP TABLE IF EXISTS categories",
    "CREATE TABLE categories (id SERIAL PRIMARY KEY, type TEXT NOT NULL)",
    "CREATE TABLE questions (
        id SERIAL PRIMARY KEY,
        question TEXT NOT NULL,
        answer TEXT NOT NULL,
        category INTEGER NOT NULL REFERENCES categories(id),
        difficulty INTEGER NOT NULL
    )",
];

async fn seed(store: &Store) {
    for statement in SCHEMA {
        sqlx::query(statement).execute(&store.connection).await.unwrap();
    }
    sqlx::query("INSERT INTO categories (id, type) VALUES (1, 'Science'), (5, 'Art')")
        .execute(&store.connection)
        .await
        .unwrap();
    for n in 1..=12 {
        sqlx::query(
            "INSERT INTO questions (question, answer, category, difficulty) VALUES ($1, $2, 1, $3)",
        )
        .bind(format!("Science question {}", n))
        .bind(format!("Science answer {}", n))
        .bind(n % 5 + 1)
        .execute(&store.connection)
        .await
        .unwrap();
    }
    sqlx::query(
        "INSERT INTO questions (id, question, answer, category, difficulty)
        VALUES (42, 'Whose Art is full of impossible staircases?', 'Escher', 5, 4)",
    )
    .execute(&store.connection)
    .await
    .unwrap();
}

async fn send(store: &Store, request: RequestBuilder) -> (StatusCode, Value) {
    let routes = build_routes(store.clone());
    let res = request.reply(&routes).await;
    (res.status(), serde_json::from_slice(res.body()).unwrap())
}

fn get(path: &str) -> RequestBuilder {
    warp::test::request().method("GET").path(path)
}

fn post(path: &str, body: Value) -> RequestBuilder {
    warp::test::request().method("POST").path(path).json(&body)
}

fn ids(body: &Value) -> Vec<i64> {
    body["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn trivia_round_trip() {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set, skipping");
            return;
        }
    };
    let store = Store::new(&url).await.unwrap();
    seed(&store).await;

    // categories
    let (status, body) = send(&store, get("/categories")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["categories"], json!({"1": "Science", "5": "Art"}));
    assert_eq!(body["total_categories"], 2);

    // pagination
    let (status, body) = send(&store, get("/questions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body).len(), 10);
    assert_eq!(body["total_questions"], 13);
    assert_eq!(body["categories"]["5"], "Art");

    let (_, by_query) = send(&store, get("/questions?page=2")).await;
    let (_, by_path) = send(&store, get("/questions/2")).await;
    assert_eq!(ids(&by_query), vec![11, 12, 42]);
    assert_eq!(ids(&by_query), ids(&by_path));
    assert_eq!(by_query["total_questions"], 13);

    let (status, _) = send(&store, get("/questions/3")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for path in ["/questions?page=0", "/questions/0", "/categories/Art/questions/0"] {
        let (status, body) = send(&store, get(path)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
        assert_eq!(body["error"], 404);
    }
    let (status, first_page) = send(&store, get("/questions")).await;
    let (abc_status, not_a_number) = send(&store, get("/questions?page=abc")).await;
    assert_eq!(status, abc_status);
    assert_eq!(ids(&not_a_number), ids(&first_page));
    let (status, body) = send(&store, get("/categories/Art/questions?page=-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![42]);

    // by category, id or type
    let (status, by_id) = send(&store, get("/categories/1/questions")).await;
    assert_eq!(status, StatusCode::OK);
    let (_, by_type) = send(&store, get("/categories/Science/questions")).await;
    assert_eq!(ids(&by_id), ids(&by_type));
    assert_eq!(by_id["total_questions"], 12);
    assert_eq!(by_id["current_category"], "Science");

    let (_, second_page) = send(&store, get("/categories/Science/questions/2")).await;
    assert_eq!(ids(&second_page), vec![11, 12]);

    let (status, _) = send(&store, get("/categories/Cooking/questions")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&store, get("/categories/99/questions")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&store, get("/categories/5/questions?page=2")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // search
    let (status, body) = send(&store, post("/search", json!({"searchTerm": "art"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![42]);
    assert_eq!(body["totalQuestions"], 1);

    let (_, body) = send(&store, post("/search", json!({"searchTerm": "QUESTION"}))).await;
    assert_eq!(body["totalQuestions"], 12);

    let (status, _) = send(&store, post("/search", json!({"searchTerm": "100%"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // quizzes
    let (status, body) = send(
        &store,
        post("/quizzes", json!({"quiz_category": {"id": 5}, "previous_questions": []})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"]["id"], 42);
    assert_eq!(body["question"]["answer"], "Escher");

    let (status, _) = send(
        &store,
        post("/quizzes", json!({"quiz_category": {"id": 5}, "previous_questions": [42]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&store, post("/quizzes", json!({"quiz_category": {"id": 77}}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut previous: Vec<i64> = (1..=12).collect();
    previous.retain(|id| *id != 7);
    previous.push(42);
    let (status, body) = send(
        &store,
        post("/quizzes", json!({"quiz_category": {"type": "click", "id": 0}, "previous_questions": previous})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"]["id"], 7);

    // create then delete
    let (status, body) = send(
        &store,
        post(
            "/questions",
            json!({"question": "What is H2O?", "answer": "Water", "category": "Science", "difficulty": 2}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let created = &body["question"];
    assert_eq!(created["question"], "What is H2O?");
    assert_eq!(created["answer"], "Water");
    assert_eq!(created["category"], 1);
    assert_eq!(created["difficulty"], 2);
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send(
        &store,
        post(
            "/questions",
            json!({"question": "q", "answer": "a", "category": "Cooking", "difficulty": 2}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&store, post("/search", json!({"searchTerm": "h2o"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![id]);

    let delete = |id: i64| {
        warp::test::request()
            .method("DELETE")
            .path(&format!("/questions/{}", id))
    };
    let (status, body) = send(&store, delete(id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "id": id}));

    let (status, _) = send(&store, delete(id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&store, post("/search", json!({"searchTerm": "h2o"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = send(&store, get("/questions")).await;
    assert_eq!(body["total_questions"], 13);

    // types that need escaping or look like ids
    sqlx::query("INSERT INTO categories (id, type) VALUES (2, '1984'), (3, 'Science Fiction')")
        .execute(&store.connection)
        .await
        .unwrap();
    for (category, question) in [
        ("Science Fiction", "Who wrote Dune?"),
        ("1984", "Who is always watching?"),
    ] {
        let (status, body) = send(
            &store,
            post(
                "/questions",
                json!({"question": question, "answer": "a", "category": category, "difficulty": 3}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", category);
        assert_eq!(body["question"]["category"], if category == "1984" { 2 } else { 3 });
    }

    let (status, body) = send(&store, get("/categories/Science%20Fiction/questions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_category"], "Science Fiction");
    assert_eq!(body["total_questions"], 1);
    assert_eq!(body["questions"][0]["question"], "Who wrote Dune?");

    let (status, body) = send(&store, get("/categories/1984/questions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_category"], "1984");
    assert_eq!(body["questions"][0]["question"], "Who is always watching?");

    // an id still wins over a type with the same digits
    let (_, body) = send(&store, get("/categories/2/questions")).await;
    assert_eq!(body["current_category"], "1984");
    let (status, _) = send(&store, get("/categories/99/questions")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
