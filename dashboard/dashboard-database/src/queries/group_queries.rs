use sqlx::SqlitePool;

#[derive(Clone)]
pub struct GroupQueries {
    pool: SqlitePool,
}

impl GroupQueries {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve a built-in role to the concrete group name it is assigned to.
    /// Built-in groups are created by the schema so a `None` here means the
    /// database is mis-seeded.
    pub async fn built_in_group_name(&self, built_in_role: &str) -> anyhow::Result<Option<String>> {
        let mut conn = self.pool.acquire().await?;

        let name = sqlx::query_scalar::<_, String>(
            r#"
            SELECT name
            FROM groups
            WHERE built_in_role = ?1
            "#,
        )
        .bind(built_in_role)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(name)
    }
}
