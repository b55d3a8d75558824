//! Repository for the `cursos` table.

use cursos_core::types::DbId;
use sqlx::PgPool;

use crate::models::curso::{CreateCurso, Curso, CursoRow, UpdateCurso};

/// Course columns plus the review aggregates, selected from a relation aliased `c`.
const PROJECTION: &str = "SELECT c.id, c.titulo, c.url, c.criacao, c.atualizacao, c.ativo,
        ARRAY(SELECT a.id FROM avaliacoes a WHERE a.curso_id = c.id ORDER BY a.id) AS avaliacoes,
        (SELECT AVG(a.avaliacao) FROM avaliacoes a WHERE a.curso_id = c.id) AS media_bruta";

/// Provides CRUD operations for courses.
pub struct CursoRepo;

impl CursoRepo {
    /// Insert a new course, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCurso) -> Result<Curso, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                INSERT INTO cursos (titulo, url, ativo)
                VALUES ($1, $2, COALESCE($3, TRUE))
                RETURNING *
             )
             {PROJECTION} FROM c"
        );
        sqlx::query_as::<_, CursoRow>(&query)
            .bind(&input.titulo)
            .bind(&input.url)
            .bind(input.ativo)
            .fetch_one(pool)
            .await
            .map(Curso::from)
    }

    /// Total number of courses.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM cursos")
            .fetch_one(pool)
            .await
    }

    /// List courses by ascending id.
    ///
    /// A `None` limit returns every row from `offset` on.
    pub async fn list(
        pool: &PgPool,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<Curso>, sqlx::Error> {
        let query = format!("{PROJECTION} FROM cursos c ORDER BY c.id LIMIT $1 OFFSET $2");
        let rows = sqlx::query_as::<_, CursoRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Curso::from).collect())
    }

    /// Find a course by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Curso>, sqlx::Error> {
        let query = format!("{PROJECTION} FROM cursos c WHERE c.id = $1");
        let row = sqlx::query_as::<_, CursoRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Curso::from))
    }

    /// Whether a course with `id` exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM cursos WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Update a course. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCurso,
    ) -> Result<Option<Curso>, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                UPDATE cursos SET
                    titulo = COALESCE($2, titulo),
                    url = COALESCE($3, url),
                    ativo = COALESCE($4, ativo)
                WHERE id = $1
                RETURNING *
             )
             {PROJECTION} FROM c"
        );
        let row = sqlx::query_as::<_, CursoRow>(&query)
            .bind(id)
            .bind(&input.titulo)
            .bind(&input.url)
            .bind(input.ativo)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Curso::from))
    }

    /// Delete a course and, through the foreign key, its reviews.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cursos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
