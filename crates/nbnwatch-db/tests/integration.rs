//! Offline unit tests for nbnwatch-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::path::PathBuf;

use nbnwatch_db::{PlanRow, PoolConfig, ProviderRow, UpdateRunRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = nbnwatch_core::AppConfig {
        database_url: "postgres://example".to_string(),
        log_level: "info".to_string(),
        providers_path: PathBuf::from("./config/providers.yaml"),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        fetch_timeout_secs: 30,
        fetch_forbidden_retries: 3,
        fetch_backoff_base_ms: 500,
        updater_batch_size: 30,
        updater_max_concurrent: 8,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`ProviderRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn provider_row_has_expected_fields() {
    use chrono::Utc;

    let row = ProviderRow {
        id: 1_i64,
        slug: "aussie-broadband".to_string(),
        name: "Aussie Broadband".to_string(),
        url: "https://www.aussiebroadband.com.au/internet/nbn-plans/".to_string(),
        is_active: true,
        last_fetch_at: None,
        last_content_hash: None,
        last_error: None,
        needs_review: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.id, 1);
    assert!(row.is_active);
    assert!(row.last_fetch_at.is_none(), "seeded providers start stale");
    assert!(!row.needs_review);
}

#[test]
fn plan_row_has_expected_fields() {
    use chrono::Utc;

    let row = PlanRow {
        id: 10_i64,
        provider_id: 1_i64,
        name: "Family Everyday".to_string(),
        speed_tier: Some(100),
        upload_mbps: Some(20),
        intro_price_cents: Some(7900),
        ongoing_price_cents: Some(9900),
        intro_duration_days: Some(180),
        min_term_months: None,
        setup_fee_cents: None,
        modem_cost_cents: None,
        conditions: None,
        source_url: Some("https://www.aussiebroadband.com.au".to_string()),
        technology: "standard".to_string(),
        plan_type: "residential".to_string(),
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    // Stored TEXT discriminators round-trip through the core enums.
    assert_eq!(
        row.technology.parse::<nbnwatch_core::TechnologyType>().unwrap(),
        nbnwatch_core::TechnologyType::Standard
    );
    assert_eq!(
        row.plan_type.parse::<nbnwatch_core::PlanType>().unwrap(),
        nbnwatch_core::PlanType::Residential
    );
    assert_eq!(row.speed_tier, Some(100));
}

#[test]
fn update_run_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = UpdateRunRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        status: "running".to_string(),
        started_at: Utc::now(),
        finished_at: None,
        notes: None,
    };

    assert_eq!(row.status, "running");
    assert!(row.finished_at.is_none());
    assert!(row.notes.is_none());
}
