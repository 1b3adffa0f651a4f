// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Services Integration Tests
//!
//! End-to-end tests wiring the real sqlite repositories, the filesystem
//! cube store, and the RSA/AES crypto adapter behind the application use
//! cases — no mocks. Exercises create → absorb → export → genkey → import
//! as a single chain against a throwaway database and storage root.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use cube::application::commands::{AbsorbCubeCommand, CreateCubeCommand, ExportCubeCommand, GenKeyCubeCommand, ImportCubeCommand};
use cube::application::use_cases::{AbsorbCubeUseCase, CreateCubeUseCase, ExportCubeUseCase, GenKeyCubeUseCase, ImportCubeUseCase};
use cube::infrastructure::adapters::{Base64JsonKeyTokenCodec, FilesystemCubeStore, RandomIdGenerator, RsaAesCryptoEngine, SqliteOwnerDirectory, SystemClock, TarEnvelopeCodec};
use cube::infrastructure::repositories::{schema, SqliteCubeRepository, SqliteExportRepository, SqliteLineageRepository, SqliteStatsRepository};
use cube_bootstrap::shutdown::ShutdownCoordinator;
use cube_domain::value_objects::{EmbeddingConfig, LimitValue, OwnerId, Permissions, TenantId};
use tempfile::TempDir;

struct Harness {
    _storage: TempDir,
    create_cube: CreateCubeUseCase,
    absorb_cube: AbsorbCubeUseCase,
    export_cube: ExportCubeUseCase,
    genkey_cube: GenKeyCubeUseCase,
    import_cube: ImportCubeUseCase,
    tenant: TenantId,
    owner: OwnerId,
}

async fn build_harness() -> Harness {
    let pool = schema::initialize_database("sqlite::memory:").await.expect("schema init");
    let storage = TempDir::new().expect("temp storage root");

    let cube_repository = Arc::new(SqliteCubeRepository::new(pool.clone()));
    let export_repository = Arc::new(SqliteExportRepository::new(pool.clone()));
    let lineage_repository = Arc::new(SqliteLineageRepository::new(pool.clone()));
    let stats_repository = Arc::new(SqliteStatsRepository::new(pool.clone()));
    let owner_directory = Arc::new(SqliteOwnerDirectory::new(pool));

    let cube_store = Arc::new(FilesystemCubeStore::new(storage.path()));
    let crypto = Arc::new(RsaAesCryptoEngine::new());
    let envelope_codec = Arc::new(TarEnvelopeCodec::new());
    let key_token_codec = Arc::new(Base64JsonKeyTokenCodec::new());
    let id_generator = Arc::new(RandomIdGenerator::new());
    let clock = Arc::new(SystemClock::new());
    let cancellation = ShutdownCoordinator::new(Duration::from_secs(10)).token();

    Harness {
        _storage: storage,
        create_cube: CreateCubeUseCase::new(cube_repository.clone(), cube_store.clone(), id_generator.clone(), clock.clone(), cancellation.clone()),
        absorb_cube: AbsorbCubeUseCase::new(cube_repository.clone(), cube_store.clone(), clock.clone(), cancellation.clone()),
        export_cube: ExportCubeUseCase::new(
            cube_repository.clone(),
            export_repository.clone(),
            lineage_repository,
            stats_repository,
            cube_store.clone(),
            owner_directory,
            crypto.clone(),
            envelope_codec.clone(),
            id_generator.clone(),
            clock.clone(),
            cancellation.clone(),
        ),
        genkey_cube: GenKeyCubeUseCase::new(cube_repository.clone(), export_repository.clone(), crypto.clone(), envelope_codec.clone(), key_token_codec.clone(), clock.clone(), cancellation.clone()),
        import_cube: ImportCubeUseCase::new(cube_repository, cube_store, crypto, envelope_codec, key_token_codec, id_generator, clock, cancellation),
        tenant: TenantId::new("apx-it", "vdr-it"),
        owner: OwnerId::new(1),
    }
}

/// S1/S3/S4: create, absorb, export, mint a licensing token scoped tighter
/// than the source grant, then import it into a fresh Cube that carries
/// lineage and usage forward.
#[tokio::test]
async fn test_full_create_absorb_export_genkey_import_chain() {
    let h = build_harness().await;

    let created = h
        .create_cube
        .execute(CreateCubeCommand {
            tenant: h.tenant.clone(),
            owner_id: h.owner,
            name: "chain-test".to_string(),
            description: None,
            embedding_config: EmbeddingConfig::empty(),
        })
        .await
        .expect("create cube");
    assert!(created.cube.permissions.export_limit.is_unlimited());

    let absorbed = h
        .absorb_cube
        .execute(AbsorbCubeCommand {
            tenant: h.tenant.clone(),
            cube_id: created.cube.id,
            content: b"hello cube".to_vec(),
            memory_group: "default".to_string(),
            model_name: "test-model".to_string(),
            action_type: "absorb".to_string(),
            contributor_owner_id: h.owner,
        })
        .await
        .expect("absorb cube");
    assert_eq!(absorbed.usage.count, 1);

    let exported = h.export_cube.execute(ExportCubeCommand { tenant: h.tenant.clone(), cube_id: created.cube.id }).await.expect("export cube");
    assert!(!exported.envelope_bytes.is_empty());

    let requested_permissions = Permissions {
        export_limit: LimitValue::Forbidden,
        rekey_limit: LimitValue::Forbidden,
        genkey_limit: LimitValue::Forbidden,
        absorb_limit: LimitValue::Remaining(5),
        memify_limit: LimitValue::Forbidden,
        query_limit: LimitValue::Unlimited,
        allow_stats: true,
        memify_config_limit: Default::default(),
        query_type_limit: Default::default(),
    };

    let genkey_result = h
        .genkey_cube
        .execute(GenKeyCubeCommand {
            tenant: h.tenant.clone(),
            requesting_owner: h.owner,
            envelope_bytes: exported.envelope_bytes.clone(),
            requested_permissions,
            requested_expire_at: Some(Utc::now() + chrono::Duration::days(30)),
        })
        .await
        .expect("genkey cube");
    assert!(genkey_result.token.contains('.'));

    let imported = h
        .import_cube
        .execute(ImportCubeCommand {
            tenant: h.tenant.clone(),
            owner_id: OwnerId::new(2),
            envelope_bytes: exported.envelope_bytes,
            token: genkey_result.token,
        })
        .await
        .expect("import cube");

    assert_eq!(imported.cube.permissions.export_limit, LimitValue::Forbidden);
    assert_eq!(imported.cube.permissions.absorb_limit, LimitValue::Remaining(5));
    assert!(imported.cube.source_export_id.is_some());
}

/// I4/P4: a Cube imported with a restricted grant can never mint a token
/// that exceeds its own (already-narrowed) permissions — the inheritance
/// check must hold recursively across generations, not just against the
/// original root Cube.
#[tokio::test]
async fn test_genkey_rejects_permissions_exceeding_inherited_grant() {
    let h = build_harness().await;

    let root = h
        .create_cube
        .execute(CreateCubeCommand {
            tenant: h.tenant.clone(),
            owner_id: h.owner,
            name: "root".to_string(),
            description: None,
            embedding_config: EmbeddingConfig::empty(),
        })
        .await
        .expect("create root cube");

    let root_export = h.export_cube.execute(ExportCubeCommand { tenant: h.tenant.clone(), cube_id: root.cube.id }).await.expect("export root");

    // Mint a token that forbids export on the downstream Cube entirely.
    let narrow_permissions = Permissions {
        export_limit: LimitValue::Forbidden,
        rekey_limit: LimitValue::Unlimited,
        genkey_limit: LimitValue::Unlimited,
        absorb_limit: LimitValue::Unlimited,
        memify_limit: LimitValue::Unlimited,
        query_limit: LimitValue::Unlimited,
        allow_stats: true,
        memify_config_limit: Default::default(),
        query_type_limit: Default::default(),
    };
    let narrow_token = h
        .genkey_cube
        .execute(GenKeyCubeCommand {
            tenant: h.tenant.clone(),
            requesting_owner: h.owner,
            envelope_bytes: root_export.envelope_bytes.clone(),
            requested_permissions: narrow_permissions,
            requested_expire_at: None,
        })
        .await
        .expect("mint narrow token");

    let child = h
        .import_cube
        .execute(ImportCubeCommand {
            tenant: h.tenant.clone(),
            owner_id: OwnerId::new(2),
            envelope_bytes: root_export.envelope_bytes,
            token: narrow_token.token,
        })
        .await
        .expect("import child cube");
    assert_eq!(child.cube.permissions.export_limit, LimitValue::Forbidden);

    // The child cube's own export_limit is Forbidden, so exporting it at
    // all must fail before any grandchild token could even be requested.
    let child_export = h.export_cube.execute(ExportCubeCommand { tenant: h.tenant.clone(), cube_id: child.cube.id }).await;
    assert!(child_export.is_err());
}
