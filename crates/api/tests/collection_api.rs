//! HTTP-level integration tests for the `/userdex` collection surface.
//!
//! Covers the asymmetric write policy (stored rows are always caught,
//! uncaught means row absence), delete idempotence, authentication
//! requirements, and per-user isolation.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_json_auth, expect_json, get, get_auth, put_json_auth};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Auth requirements
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unauthenticated_requests_get_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/userdex").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(app, "/api/search?q=pika").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_principal_header_gets_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = axum::http::Request::builder()
        .uri("/api/userdex")
        .header("x-ms-client-principal", "!!not-base64!!")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// The canonical catch/uncatch scenario
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn catch_then_uncatch_round_trip(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    // Mark #25 caught with shiny and notes.
    let response = put_json_auth(
        app.clone(),
        "/api/userdex",
        "ash",
        serde_json::json!({ "pokemonId": 25, "caught": true, "shiny": true, "notes": "Victory Road" }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["action"], "caught");
    assert_eq!(json["success"], true);

    // GET returns exactly one entry with the stored fields.
    let json = body_json(get_auth(app.clone(), "/api/userdex", "ash").await).await;
    assert_eq!(json["userId"], "ash");
    assert_eq!(json["count"], 1);
    assert_eq!(json["pokemon"][0]["pokemonId"], 25);
    assert_eq!(json["pokemon"][0]["caught"], true);
    assert_eq!(json["pokemon"][0]["shiny"], true);
    assert_eq!(json["pokemon"][0]["notes"], "Victory Road");

    // PUT caught=false deletes the entry.
    let response = put_json_auth(
        app.clone(),
        "/api/userdex",
        "ash",
        serde_json::json!({ "pokemonId": 25, "caught": false }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["action"], "uncaught");

    // GET returns zero entries.
    let json = body_json(get_auth(app, "/api/userdex", "ash").await).await;
    assert_eq!(json["count"], 0);

    // And no caught=false row was left behind in storage.
    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM collection_entries WHERE user_id = 'ash'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(rows, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn uncatching_an_absent_entry_is_a_noop(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = put_json_auth(
        app,
        "/api/userdex",
        "ash",
        serde_json::json!({ "pokemonId": 150, "caught": false }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["action"], "none");

    // Crucially, no "not caught" row was created.
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM collection_entries")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn updating_an_existing_entry_reports_updated(pool: PgPool) {
    let app = common::build_test_app(pool);

    put_json_auth(
        app.clone(),
        "/api/userdex",
        "ash",
        serde_json::json!({ "pokemonId": 1, "caught": true }),
    )
    .await;

    let response = put_json_auth(
        app.clone(),
        "/api/userdex",
        "ash",
        serde_json::json!({ "pokemonId": 1, "notes": "Pallet Town" }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["action"], "updated");

    // Fields not present in the update are preserved.
    let json = body_json(get_auth(app, "/api/userdex", "ash").await).await;
    assert_eq!(json["pokemon"][0]["notes"], "Pallet Town");
    assert_eq!(json["pokemon"][0]["caught"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn put_without_pokemon_id_is_400(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app.clone(),
        "/api/userdex",
        "ash",
        serde_json::json!({ "caught": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app,
        "/api/userdex",
        "ash",
        serde_json::json!({ "pokemonId": -3, "caught": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Delete idempotence
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_is_idempotent(pool: PgPool) {
    let app = common::build_test_app(pool);

    put_json_auth(
        app.clone(),
        "/api/userdex",
        "ash",
        serde_json::json!({ "pokemonId": 7, "caught": true }),
    )
    .await;

    // First delete removes the row.
    let response = delete_json_auth(
        app.clone(),
        "/api/userdex",
        "ash",
        serde_json::json!({ "pokemonId": 7 }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["action"], "uncaught");

    // Repeated deletes of the absent entry still return 200.
    for _ in 0..2 {
        let response = delete_json_auth(
            app.clone(),
            "/api/userdex",
            "ash",
            serde_json::json!({ "pokemonId": 7 }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

// ---------------------------------------------------------------------------
// Per-user isolation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn collections_are_isolated_per_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    put_json_auth(
        app.clone(),
        "/api/userdex",
        "ash",
        serde_json::json!({ "pokemonId": 25, "caught": true }),
    )
    .await;
    put_json_auth(
        app.clone(),
        "/api/userdex",
        "misty",
        serde_json::json!({ "pokemonId": 120, "caught": true }),
    )
    .await;

    let json = body_json(get_auth(app.clone(), "/api/userdex", "ash").await).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["pokemon"][0]["pokemonId"], 25);

    let json = body_json(get_auth(app, "/api/userdex", "misty").await).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["pokemon"][0]["pokemonId"], 120);
}
