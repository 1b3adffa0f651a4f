//! # Minimal Application Layer Integration Test
//!
//! Lightweight end-to-end coverage for `StatsCube` and `DeleteCube`,
//! complementing the longer create → absorb → export → genkey → import
//! chain in `application_services_integration_test.rs`.

use std::sync::Arc;
use std::time::Duration;

use cube::application::commands::{CreateCubeCommand, DeleteCubeCommand, StatsCubeCommand};
use cube::application::use_cases::{CreateCubeUseCase, DeleteCubeUseCase, StatsCubeUseCase};
use cube::infrastructure::adapters::{FilesystemCubeStore, RandomIdGenerator, SystemClock};
use cube::infrastructure::repositories::{schema, SqliteCubeRepository, SqliteStatsRepository};
use cube_bootstrap::shutdown::ShutdownCoordinator;
use cube_domain::value_objects::{EmbeddingConfig, OwnerId, TenantId};
use tempfile::TempDir;

/// S7: a freshly created Cube allows stats (default grant) but has nothing
/// accumulated yet.
#[tokio::test]
async fn test_stats_on_fresh_cube_is_empty_but_allowed() {
    let pool = schema::initialize_database("sqlite::memory:").await.expect("schema init");
    let storage = TempDir::new().expect("temp storage root");
    let tenant = TenantId::new("apx-min", "vdr-min");
    let owner = OwnerId::new(1);

    let cube_repository = Arc::new(SqliteCubeRepository::new(pool.clone()));
    let stats_repository = Arc::new(SqliteStatsRepository::new(pool));
    let cube_store = Arc::new(FilesystemCubeStore::new(storage.path()));
    let id_generator = Arc::new(RandomIdGenerator::new());
    let clock = Arc::new(SystemClock::new());
    let cancellation = ShutdownCoordinator::new(Duration::from_secs(10)).token();

    let create_cube = CreateCubeUseCase::new(cube_repository.clone(), cube_store, id_generator, clock, cancellation);
    let stats_cube = StatsCubeUseCase::new(cube_repository, stats_repository);

    let created = create_cube
        .execute(CreateCubeCommand {
            tenant: tenant.clone(),
            owner_id: owner,
            name: "stats-smoke".to_string(),
            description: None,
            embedding_config: EmbeddingConfig::empty(),
        })
        .await
        .expect("create cube");

    let stats = stats_cube.execute(StatsCubeCommand { tenant, cube_id: created.cube.id }).await.expect("read stats");

    assert!(stats.usage.is_empty());
    assert!(stats.contributors.is_empty());
}

/// Only the owning identity may delete a Cube; a different owner's request
/// must be rejected and must leave the row intact.
#[tokio::test]
async fn test_delete_rejects_non_owner() {
    let pool = schema::initialize_database("sqlite::memory:").await.expect("schema init");
    let storage = TempDir::new().expect("temp storage root");
    let tenant = TenantId::new("apx-min", "vdr-min");
    let owner = OwnerId::new(1);
    let intruder = OwnerId::new(2);

    let cube_repository = Arc::new(SqliteCubeRepository::new(pool.clone()));
    let cube_store = Arc::new(FilesystemCubeStore::new(storage.path()));
    let id_generator = Arc::new(RandomIdGenerator::new());
    let clock = Arc::new(SystemClock::new());
    let cancellation = ShutdownCoordinator::new(Duration::from_secs(10)).token();

    let create_cube = CreateCubeUseCase::new(cube_repository.clone(), cube_store.clone(), id_generator, clock.clone(), cancellation.clone());
    let delete_cube = DeleteCubeUseCase::new(cube_repository, cube_store, clock, cancellation);

    let created = create_cube
        .execute(CreateCubeCommand {
            tenant: tenant.clone(),
            owner_id: owner,
            name: "delete-smoke".to_string(),
            description: None,
            embedding_config: EmbeddingConfig::empty(),
        })
        .await
        .expect("create cube");

    let result = delete_cube
        .execute(DeleteCubeCommand {
            tenant,
            requesting_owner: intruder,
            cube_id: created.cube.id,
        })
        .await;

    assert!(result.is_err());
}
