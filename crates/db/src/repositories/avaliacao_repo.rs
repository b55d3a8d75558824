//! Repository for the `avaliacoes` table.
//!
//! Every read and write takes a [`ReviewScope`]. A nested scope adds the
//! parent predicate to the same query, so a review that belongs to another
//! course is simply not found.

use cursos_core::scope::ReviewScope;
use cursos_core::types::DbId;
use sqlx::PgPool;

use crate::models::avaliacao::{Avaliacao, CreateAvaliacao, UpdateAvaliacao};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, curso_id, nome, email, comentario, avaliacao, criacao, atualizacao, ativo";

/// Predicate restricting rows to a [`ReviewScope`] bound at parameter `$param`.
///
/// A `NULL` parent matches every row.
fn scope_filter(param: usize) -> String {
    format!("(${param}::BIGINT IS NULL OR curso_id = ${param})")
}

/// Provides scoped CRUD operations for reviews.
pub struct AvaliacaoRepo;

impl AvaliacaoRepo {
    /// Insert a review for `curso_id`, returning the created row.
    ///
    /// `input.curso` is not consulted; the caller resolves the parent.
    pub async fn create(
        pool: &PgPool,
        curso_id: DbId,
        input: &CreateAvaliacao,
    ) -> Result<Avaliacao, sqlx::Error> {
        let query = format!(
            "INSERT INTO avaliacoes (curso_id, nome, email, comentario, avaliacao, ativo)
             VALUES ($1, $2, $3, COALESCE($4, ''), $5, COALESCE($6, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Avaliacao>(&query)
            .bind(curso_id)
            .bind(&input.nome)
            .bind(&input.email)
            .bind(&input.comentario)
            .bind(input.avaliacao)
            .bind(input.ativo)
            .fetch_one(pool)
            .await
    }

    /// Number of reviews visible through `scope`.
    pub async fn count(pool: &PgPool, scope: ReviewScope) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM avaliacoes WHERE {}", scope_filter(1));
        sqlx::query_scalar(&query)
            .bind(scope.parent())
            .fetch_one(pool)
            .await
    }

    /// List reviews visible through `scope` by ascending id.
    ///
    /// A `None` limit returns every row from `offset` on.
    pub async fn list(
        pool: &PgPool,
        scope: ReviewScope,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<Avaliacao>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM avaliacoes WHERE {} ORDER BY id LIMIT $2 OFFSET $3",
            scope_filter(1)
        );
        sqlx::query_as::<_, Avaliacao>(&query)
            .bind(scope.parent())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find one review by id within `scope`.
    pub async fn find(
        pool: &PgPool,
        scope: ReviewScope,
        id: DbId,
    ) -> Result<Option<Avaliacao>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM avaliacoes WHERE id = $1 AND {}",
            scope_filter(2)
        );
        sqlx::query_as::<_, Avaliacao>(&query)
            .bind(id)
            .bind(scope.parent())
            .fetch_optional(pool)
            .await
    }

    /// Update a review within `scope`. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no review with `id` is visible through `scope`.
    pub async fn update(
        pool: &PgPool,
        scope: ReviewScope,
        id: DbId,
        input: &UpdateAvaliacao,
    ) -> Result<Option<Avaliacao>, sqlx::Error> {
        let query = format!(
            "UPDATE avaliacoes SET
                curso_id = COALESCE($3, curso_id),
                nome = COALESCE($4, nome),
                email = COALESCE($5, email),
                comentario = COALESCE($6, comentario),
                avaliacao = COALESCE($7, avaliacao),
                ativo = COALESCE($8, ativo)
             WHERE id = $1 AND {}
             RETURNING {COLUMNS}",
            scope_filter(2)
        );
        sqlx::query_as::<_, Avaliacao>(&query)
            .bind(id)
            .bind(scope.parent())
            .bind(input.curso)
            .bind(&input.nome)
            .bind(&input.email)
            .bind(&input.comentario)
            .bind(input.avaliacao)
            .bind(input.ativo)
            .fetch_optional(pool)
            .await
    }

    /// Delete a review within `scope`. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, scope: ReviewScope, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM avaliacoes WHERE id = $1 AND {}", scope_filter(2));
        let result = sqlx::query(&query)
            .bind(id)
            .bind(scope.parent())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_filter_binds_the_same_parameter_twice() {
        assert_eq!(
            scope_filter(2),
            "($2::BIGINT IS NULL OR curso_id = $2)"
        );
    }
}
