use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite, SqliteConnection,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::{
    domain::{Question, QuestionGroups, QuestionId, ResponseId},
    protocol::StructuredAnswer,
};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone)]
pub struct StoredResponse {
    pub response_id: ResponseId,
    pub answers: Vec<StructuredAnswer>,
    pub created_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn count_questions(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Inserts `question` at the end of `group_name`, creating the group after
    /// all existing groups if needed.
    pub async fn insert_question(&self, group_name: &str, question: &Question) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        let group_id = ensure_group(&mut conn, group_name).await?;
        let next_order: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM questions WHERE group_id = ?",
        )
        .bind(group_id)
        .fetch_one(&mut *conn)
        .await?;
        insert_question_row(&mut conn, group_id, question, next_order).await
    }

    /// Stores every group and question in one transaction, preserving the
    /// iteration order of `groups`.
    pub async fn import_groups(&self, groups: &QuestionGroups) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for (group_name, questions) in groups.iter() {
            let group_id = ensure_group(&mut tx, group_name).await?;
            for (order, question) in questions.iter().enumerate() {
                insert_question_row(&mut tx, group_id, question, order as i64).await?;
                inserted += 1;
            }
        }
        tx.commit().await.context("failed to commit question import")?;
        Ok(inserted)
    }

    pub async fn list_question_groups(&self) -> Result<QuestionGroups> {
        let rows = sqlx::query(
            "SELECT g.name, q.id, q.question, q.options_json, q.kind, q.imagekey
             FROM questions q
             INNER JOIN question_groups g ON g.id = q.group_id
             ORDER BY g.position, q.sort_order, q.id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut groups = QuestionGroups::new();
        for row in rows {
            let group_name: String = row.get(0);
            groups.push(group_name, question_from_row(&row, 1)?);
        }
        Ok(groups)
    }

    pub async fn question(&self, question_id: &QuestionId) -> Result<Option<Question>> {
        let row = sqlx::query(
            "SELECT id, question, options_json, kind, imagekey FROM questions WHERE id = ?",
        )
        .bind(question_id.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| question_from_row(&row, 0)).transpose()
    }

    pub async fn insert_response(&self, answers: &[StructuredAnswer]) -> Result<ResponseId> {
        if answers.is_empty() {
            return Err(anyhow!("a response needs at least one answer"));
        }

        let mut tx = self.pool.begin().await?;
        let rec = sqlx::query("INSERT INTO responses (created_at) VALUES (?) RETURNING id")
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;
        let response_id = ResponseId(rec.get::<i64, _>(0));

        for (position, answer) in answers.iter().enumerate() {
            sqlx::query(
                "INSERT INTO response_answers (response_id, position, question_id, question, selected_option)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(response_id.0)
            .bind(position as i64)
            .bind(answer.question_id.as_str())
            .bind(&answer.question)
            .bind(&answer.selected_option)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to store answer for '{}'", answer.question_id))?;
        }

        tx.commit().await.context("failed to commit response")?;
        Ok(response_id)
    }

    pub async fn response(&self, response_id: ResponseId) -> Result<Option<StoredResponse>> {
        let Some(header) = sqlx::query("SELECT created_at FROM responses WHERE id = ?")
            .bind(response_id.0)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };
        let created_at: DateTime<Utc> = header.try_get(0)?;

        let rows = sqlx::query(
            "SELECT question_id, question, selected_option
             FROM response_answers
             WHERE response_id = ?
             ORDER BY position",
        )
        .bind(response_id.0)
        .fetch_all(&self.pool)
        .await?;

        let answers = rows
            .into_iter()
            .map(|r| StructuredAnswer {
                question_id: QuestionId(r.get::<String, _>(0)),
                question: r.get::<String, _>(1),
                selected_option: r.get::<String, _>(2),
            })
            .collect();

        Ok(Some(StoredResponse {
            response_id,
            answers,
            created_at,
        }))
    }
}

async fn ensure_group(conn: &mut SqliteConnection, name: &str) -> Result<i64> {
    let rec = sqlx::query(
        "INSERT INTO question_groups (name, position)
         VALUES (?, (SELECT COALESCE(MAX(position) + 1, 0) FROM question_groups))
         ON CONFLICT(name) DO UPDATE SET name=excluded.name
         RETURNING id",
    )
    .bind(name)
    .fetch_one(&mut *conn)
    .await
    .with_context(|| format!("failed to ensure question group '{name}'"))?;
    Ok(rec.get::<i64, _>(0))
}

async fn insert_question_row(
    conn: &mut SqliteConnection,
    group_id: i64,
    question: &Question,
    sort_order: i64,
) -> Result<()> {
    let options_json = serde_json::to_string(&question.options)?;
    sqlx::query(
        "INSERT INTO questions (id, group_id, question, options_json, kind, imagekey, sort_order)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(question.id.as_str())
    .bind(group_id)
    .bind(&question.question)
    .bind(options_json)
    .bind(question.kind.as_deref())
    .bind(question.image_key())
    .bind(sort_order)
    .execute(&mut *conn)
    .await
    .with_context(|| format!("failed to insert question '{}'", question.id))?;
    Ok(())
}

fn question_from_row(row: &SqliteRow, offset: usize) -> Result<Question> {
    let id: String = row.get(offset);
    let options_json: String = row.get(offset + 2);
    let options: Vec<String> = serde_json::from_str(&options_json)
        .with_context(|| format!("corrupt options for question '{id}'"))?;
    Ok(Question {
        id: QuestionId(id),
        question: row.get(offset + 1),
        options,
        kind: row.get(offset + 3),
        imagekey: row.get(offset + 4),
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
