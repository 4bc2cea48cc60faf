//! Schema bootstrap sanity checks.

use ausverity_db::health_check;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_passes(pool: PgPool) {
    health_check(&pool).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn all_workflow_tables_exist(pool: PgPool) {
    for table in [
        "users",
        "lawyer_profiles",
        "firm_profiles",
        "pending_changes",
        "firm_invitations",
        "relationship_history",
        "audit_logs",
        "reviews",
    ] {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
             )",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(exists, "missing table: {table}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_unique_indexes_exist(pool: PgPool) {
    for index in ["uq_pending_changes_open", "uq_firm_invitations_open"] {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM pg_indexes
                WHERE schemaname = 'public' AND indexname = $1
             )",
        )
        .bind(index)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(exists, "missing index: {index}");
    }
}
