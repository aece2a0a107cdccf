//! HTTP-level integration tests for the `/search` surface (local path).

mod common;

use axum::http::StatusCode;
use common::{body_json, expect_json, get_auth, put_json_auth};
use dexvault_core::catalog::SpeciesEntry;
use dexvault_db::repositories::CatalogRepo;
use sqlx::PgPool;

/// Seed a small catalog so candidate building has a universe to join.
async fn seed_catalog(pool: &PgPool) {
    let species = [
        (25, "pikachu", vec!["electric"], "kanto"),
        (26, "raichu", vec!["electric"], "kanto"),
        (6, "charizard", vec!["fire", "flying"], "kanto"),
        (152, "chikorita", vec!["grass"], "johto"),
    ]
    .into_iter()
    .map(|(id, name, types, region)| SpeciesEntry {
        id,
        name: name.to_string(),
        types: types.into_iter().map(str::to_string).collect(),
        sprite: dexvault_core::catalog::sprite_url(id),
        sprite_shiny: dexvault_core::catalog::sprite_shiny_url(id),
        region: Some(region.to_string()),
    })
    .collect::<Vec<_>>();

    CatalogRepo::upsert_many(pool, &species).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_query_returns_all_candidates(pool: PgPool) {
    seed_catalog(&pool).await;
    let app = common::build_test_app(pool);

    let json = body_json(get_auth(app, "/api/search", "ash").await).await;
    assert_eq!(json["usedAI"], false);
    assert_eq!(json["count"], 4);
    // Unowned species are synthesized caught=false.
    assert!(json["results"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["caught"] == false));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn query_matching_nothing_is_empty(pool: PgPool) {
    seed_catalog(&pool).await;
    let app = common::build_test_app(pool);

    let json = body_json(get_auth(app, "/api/search?q=zubat", "ash").await).await;
    assert_eq!(json["count"], 0);
    assert_eq!(json["results"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn name_prefix_ranks_above_field_match(pool: PgPool) {
    seed_catalog(&pool).await;
    let app = common::build_test_app(pool.clone());

    // "pika" appears in raichu's notes, but pikachu's name wins.
    put_json_auth(
        app.clone(),
        "/api/userdex",
        "ash",
        serde_json::json!({ "pokemonId": 26, "caught": true, "notes": "traded for a pika doll" }),
    )
    .await;

    let json = body_json(get_auth(app, "/api/search?q=pika", "ash").await).await;
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["pokemonId"], 25);
    assert_eq!(results[1]["pokemonId"], 26);
    assert!(results[0]["similarity"].as_f64() > results[1]["similarity"].as_f64());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn caught_filter_uses_the_owned_overlay(pool: PgPool) {
    seed_catalog(&pool).await;
    let app = common::build_test_app(pool);

    put_json_auth(
        app.clone(),
        "/api/userdex",
        "ash",
        serde_json::json!({ "pokemonId": 25, "caught": true, "shiny": true }),
    )
    .await;

    let json = body_json(get_auth(app.clone(), "/api/search?caught=true", "ash").await).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0]["pokemonId"], 25);
    assert_eq!(json["results"][0]["shiny"], true);

    let json = body_json(get_auth(app.clone(), "/api/search?caught=false", "ash").await).await;
    assert_eq!(json["count"], 3);

    // Another user's overlay is empty: everything is uncaught for them.
    let json = body_json(get_auth(app, "/api/search?caught=true", "misty").await).await;
    assert_eq!(json["count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn region_filter_and_top_k_are_applied(pool: PgPool) {
    seed_catalog(&pool).await;
    let app = common::build_test_app(pool);

    let json = body_json(get_auth(app.clone(), "/api/search?region=kanto", "ash").await).await;
    assert_eq!(json["count"], 3);

    let json = body_json(get_auth(app.clone(), "/api/search?topK=2", "ash").await).await;
    assert_eq!(json["count"], 2);

    let response = get_auth(app, "/api/search?region=orre", "ash").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_requires_authentication(pool: PgPool) {
    seed_catalog(&pool).await;
    let app = common::build_test_app(pool);

    let response = common::get(app, "/api/search?q=pika").await;
    let json = expect_json(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}
