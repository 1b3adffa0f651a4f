// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Architecture Compliance Tests
//!
//! Compile-time and run-time checks that the Clean Architecture / DDD
//! layering holds: `cube_domain` defines the ports, `cube::infrastructure`
//! implements them behind `dyn Trait`, and `cube::application` use cases
//! are constructible from nothing but those trait objects — never a
//! concrete adapter type.

use std::sync::Arc;
use std::time::Duration;

use cube::infrastructure::adapters::{Base64JsonKeyTokenCodec, FilesystemCubeStore, RandomIdGenerator, RsaAesCryptoEngine, SqliteOwnerDirectory, SystemClock, TarEnvelopeCodec};
use cube_bootstrap::shutdown::ShutdownCoordinator;
use cube::infrastructure::repositories::{schema, SqliteCubeRepository, SqliteExportRepository, SqliteLineageRepository, SqliteStatsRepository};
use cube_domain::repositories::{CubeRepository, ExportRepository, LineageRepository, StatsRepository};
use cube_domain::services::{Clock, CryptoEngine, CubeStoreAdapter, EnvelopeCodec, IdGenerator, KeyTokenCodec, OwnerDirectory};

/// Every infrastructure adapter type must satisfy its domain port. This is
/// a pure type-check: it only needs to compile to prove the dependency
/// points the right way (infrastructure → domain, never the reverse).
fn assert_adapters_satisfy_ports() {
    fn assert_crypto_engine<T: CryptoEngine>() {}
    fn assert_clock<T: Clock>() {}
    fn assert_id_generator<T: IdGenerator>() {}
    fn assert_envelope_codec<T: EnvelopeCodec>() {}
    fn assert_key_token_codec<T: KeyTokenCodec>() {}
    fn assert_cube_store_adapter<T: CubeStoreAdapter>() {}

    assert_crypto_engine::<RsaAesCryptoEngine>();
    assert_clock::<SystemClock>();
    assert_id_generator::<RandomIdGenerator>();
    assert_envelope_codec::<TarEnvelopeCodec>();
    assert_key_token_codec::<Base64JsonKeyTokenCodec>();
    assert_cube_store_adapter::<FilesystemCubeStore>();
}

/// Use cases are built entirely from `Arc<dyn Port>` — constructing one
/// with the real sqlite/filesystem/crypto adapters behind trait objects
/// demonstrates the application layer never names a concrete
/// infrastructure type in its own signatures.
#[tokio::test]
async fn test_use_cases_depend_only_on_domain_ports() {
    assert_adapters_satisfy_ports();

    let pool = schema::initialize_database("sqlite::memory:").await.expect("schema init");
    let storage = tempfile::TempDir::new().expect("temp storage root");

    let cube_repository: Arc<dyn CubeRepository> = Arc::new(SqliteCubeRepository::new(pool.clone()));
    let export_repository: Arc<dyn ExportRepository> = Arc::new(SqliteExportRepository::new(pool.clone()));
    let lineage_repository: Arc<dyn LineageRepository> = Arc::new(SqliteLineageRepository::new(pool.clone()));
    let stats_repository: Arc<dyn StatsRepository> = Arc::new(SqliteStatsRepository::new(pool.clone()));
    let owner_directory: Arc<dyn OwnerDirectory> = Arc::new(SqliteOwnerDirectory::new(pool));
    let cube_store: Arc<dyn CubeStoreAdapter> = Arc::new(FilesystemCubeStore::new(storage.path()));
    let crypto: Arc<dyn CryptoEngine> = Arc::new(RsaAesCryptoEngine::new());
    let envelope_codec: Arc<dyn EnvelopeCodec> = Arc::new(TarEnvelopeCodec::new());
    let key_token_codec: Arc<dyn KeyTokenCodec> = Arc::new(Base64JsonKeyTokenCodec::new());
    let id_generator: Arc<dyn IdGenerator> = Arc::new(RandomIdGenerator::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let cancellation = ShutdownCoordinator::new(Duration::from_secs(10)).token();

    let _export_cube = cube::application::use_cases::ExportCubeUseCase::new(
        cube_repository.clone(),
        export_repository.clone(),
        lineage_repository,
        stats_repository,
        cube_store,
        owner_directory,
        crypto.clone(),
        envelope_codec.clone(),
        id_generator,
        clock.clone(),
        cancellation.clone(),
    );
    let _genkey_cube = cube::application::use_cases::GenKeyCubeUseCase::new(cube_repository, export_repository, crypto, envelope_codec, key_token_codec, clock, cancellation);
}

/// `cube::presentation::Application::dispatch` is the sole place a
/// `cube_bootstrap::cli::ValidatedCommand` reaches the application layer.
/// Naming the function as a value proves the signature compiles against
/// both crates without either depending back on the other's internals.
#[test]
fn test_presentation_is_the_sole_cli_boundary() {
    let _dispatch = cube::presentation::Application::dispatch;
}
