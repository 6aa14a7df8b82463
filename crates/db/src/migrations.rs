use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::run_pending;
    use crate::connect_with_settings;

    const MANAGED_SCHEMA_OBJECTS: &[&str] = &[
        "dim_parlamentario",
        "parlamentario_mandatos",
        "dim_partidos",
        "militancia_historial",
        "dim_comisiones",
        "comision_membresias",
        "bills",
        "bill_authors",
        "sesiones_votacion",
        "votos_parlamentario",
        "idx_mandatos_mp_uid",
        "idx_militancia_mp_uid",
        "idx_militancia_partido_id",
        "idx_membresias_mp_uid",
        "idx_bill_authors_mp_uid",
        "idx_bills_fecha_ingreso",
        "idx_votos_mp_uid",
        "idx_sesiones_fecha",
    ];

    #[tokio::test]
    async fn migrations_create_every_baseline_object() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        for object in MANAGED_SCHEMA_OBJECTS {
            let count = sqlx::query(
                "SELECT COUNT(*) AS count FROM sqlite_master WHERE name = ? AND type IN ('table', 'index')",
            )
            .bind(object)
            .fetch_one(&pool)
            .await
            .expect("query sqlite_master")
            .get::<i64, _>("count");

            assert_eq!(count, 1, "missing schema object `{object}`");
        }

        pool.close().await;
    }

    #[tokio::test]
    async fn migrations_are_reentrant() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("first run");
        run_pending(&pool).await.expect("second run");
        pool.close().await;
    }
}
