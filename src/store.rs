use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, Row, Transaction};
use tracing::{Level, event, instrument};

use crate::types::{
    category::{Category, CategoryId, CategoryRef},
    question::{NewQuestion, Question, QuestionId, search_pattern},
};

use handle_errors::Error;

const MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Store {
    pub connection: PgPool,
}

fn category_from_row(row: PgRow) -> Category {
    Category {
        id: CategoryId(row.get("id")),
        kind: row.get("type"),
    }
}

fn question_from_row(row: PgRow) -> Question {
    Question {
        id: QuestionId(row.get("id")),
        question: row.get("question"),
        answer: row.get("answer"),
        category: CategoryId(row.get("category")),
        difficulty: row.get("difficulty"),
    }
}

fn query_error(error: sqlx::Error) -> Error {
    event!(Level::ERROR, "{:?}", error);
    Error::DatabaseQueryError(error)
}

// 트랜잭션을 되돌리고 원래 에러를 돌려준다.
async fn rollback(tx: Transaction<'_, Postgres>, error: sqlx::Error) -> Error {
    if let Err(rollback_error) = tx.rollback().await {
        event!(Level::ERROR, "Rollback failed: {:?}", rollback_error);
    }
    query_error(error)
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self, sqlx::Error> {
        let db_pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(db_url)
            .await?;

        Ok(Store {
            connection: db_pool,
        })
    }

    /// A store that only connects when a query first needs it, giving up
    /// after `connect_timeout`.
    pub fn new_lazy(db_url: &str, connect_timeout: Duration) -> Result<Self, sqlx::Error> {
        let db_pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_timeout(connect_timeout)
            .connect_lazy(db_url)?;

        Ok(Store {
            connection: db_pool,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<Category>, Error> {
        sqlx::query("SELECT id, type FROM categories ORDER BY id")
            .map(category_from_row)
            .fetch_all(&self.connection)
            .await
            .map_err(query_error)
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, Error> {
        sqlx::query("SELECT id, type FROM categories WHERE id = $1")
            .bind(id.0)
            .map(category_from_row)
            .fetch_optional(&self.connection)
            .await
            .map_err(query_error)
    }

    #[instrument(skip(self))]
    pub async fn get_category_by_type(&self, kind: &str) -> Result<Option<Category>, Error> {
        sqlx::query("SELECT id, type FROM categories WHERE type = $1 ORDER BY id LIMIT 1")
            .bind(kind)
            .map(category_from_row)
            .fetch_optional(&self.connection)
            .await
            .map_err(query_error)
    }

    /// Looks a category up by id or by exact type, depending on how it was
    /// named. A number that is not an id is retried as a type, since types
    /// such as `1984` are all digits.
    pub async fn find_category(&self, category: &CategoryRef) -> Result<Option<Category>, Error> {
        match category {
            CategoryRef::ById(id) => match self.get_category(*id).await? {
                Some(found) => Ok(Some(found)),
                None => self.get_category_by_type(&id.0.to_string()).await,
            },
            CategoryRef::ByType(kind) => self.get_category_by_type(kind).await,
        }
    }

    #[instrument(skip(self))]
    pub async fn get_questions(&self) -> Result<Vec<Question>, Error> {
        sqlx::query(
            "SELECT id, question, answer, category, difficulty
            FROM questions ORDER BY id",
        )
        .map(question_from_row)
        .fetch_all(&self.connection)
        .await
        .map_err(query_error)
    }

    #[instrument(skip(self))]
    pub async fn get_questions_by_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<Question>, Error> {
        sqlx::query(
            "SELECT id, question, answer, category, difficulty
            FROM questions WHERE category = $1 ORDER BY id",
        )
        .bind(category.0)
        .map(question_from_row)
        .fetch_all(&self.connection)
        .await
        .map_err(query_error)
    }

    #[instrument(skip(self))]
    pub async fn search_questions(&self, term: &str) -> Result<Vec<Question>, Error> {
        sqlx::query(
            "SELECT id, question, answer, category, difficulty
            FROM questions WHERE question ILIKE $1 ORDER BY id",
        )
        .bind(search_pattern(term))
        .map(question_from_row)
        .fetch_all(&self.connection)
        .await
        .map_err(query_error)
    }

    #[instrument(skip(self))]
    pub async fn add_question(&self, new_question: NewQuestion) -> Result<Question, Error> {
        let mut tx = self.connection.begin().await.map_err(query_error)?;

        let inserted = sqlx::query(
            "INSERT INTO questions (question, answer, category, difficulty)
            VALUES ($1, $2, $3, $4)
            RETURNING id, question, answer, category, difficulty",
        )
        .bind(new_question.question)
        .bind(new_question.answer)
        .bind(new_question.category.0)
        .bind(new_question.difficulty)
        .map(question_from_row)
        .fetch_one(&mut tx)
        .await;

        match inserted {
            Ok(question) => {
                tx.commit().await.map_err(query_error)?;
                Ok(question)
            }
            Err(e) => Err(rollback(tx, e).await),
        }
    }

    /// Deletes a question, returning whether a row was removed.
    #[instrument(skip(self))]
    pub async fn delete_question(&self, id: QuestionId) -> Result<bool, Error> {
        let mut tx = self.connection.begin().await.map_err(query_error)?;

        let deleted = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id.0)
            .execute(&mut tx)
            .await;

        match deleted {
            Ok(result) if result.rows_affected() == 0 => {
                tx.rollback().await.map_err(query_error)?;
                Ok(false)
            }
            Ok(_) => {
                tx.commit().await.map_err(query_error)?;
                Ok(true)
            }
            Err(e) => Err(rollback(tx, e).await),
        }
    }
}
