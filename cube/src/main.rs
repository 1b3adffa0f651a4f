// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # `cube` binary entry point
//!
//! Bootstraps the process (CLI parsing/validation, tracing, signal
//! handling), loads the layered [`cube::infrastructure::config::CubeConfig`],
//! wires the sqlite repositories and infrastructure adapters behind the
//! `cube_domain::services`/`repositories` ports, builds the eight use cases
//! into a [`cube::presentation::Application`], and dispatches the one
//! validated command this invocation carries.
//!
//! A signal received mid-command does not abort an in-flight transaction
//! (§5): it only flips the [`cube_bootstrap::shutdown::CancellationToken`]
//! handed to every use case at construction time, which each one checks
//! immediately before its transactional step and before any call into the
//! inner store — never inside the transaction itself.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cube::infrastructure::adapters::{Base64JsonKeyTokenCodec, FilesystemCubeStore, RandomIdGenerator, RsaAesCryptoEngine, SqliteOwnerDirectory, SystemClock, TarEnvelopeCodec};
use cube::infrastructure::config::CubeConfig;
use cube::infrastructure::repositories::{schema, SqliteCubeRepository, SqliteExportRepository, SqliteLineageRepository, SqliteStatsRepository};
use cube::infrastructure::logging::init_tracing;
use cube::presentation::{Application, BoundaryCode};
use cube::CubeError;
use cube_bootstrap::cli::ValidatedCli;
use cube_bootstrap::shutdown::ShutdownCoordinator;
use cube_bootstrap::signals::create_signal_handler;
use cube_bootstrap::{bootstrap_cli, config::LogLevel};
use cube_domain::value_objects::{OwnerId, TenantId};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = match bootstrap_cli() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            return std::process::ExitCode::from(64); // EX_USAGE
        }
    };

    init_tracing(if cli.verbose { LogLevel::Debug } else { LogLevel::Info });

    let result = run(cli).await;
    match &result {
        Ok(message) => println!("{message}"),
        Err(e) => {
            let code = BoundaryCode::classify(e);
            tracing::error!(category = e.category(), boundary = ?code, "{}", e);
            eprintln!("error: {e}");
        }
    }
    cube_bootstrap::result_to_exit_code(result.map(|_| ()))
}

async fn run(cli: ValidatedCli) -> Result<String, CubeError> {
    let config = CubeConfig::load(cli.config.as_deref())?;
    let database_url = cli.database_url.clone().unwrap_or_else(|| config.database_url.clone());

    let pool = schema::initialize_database(&database_url).await.map_err(|e| CubeError::Database(e.to_string()))?;

    let cube_repository = Arc::new(SqliteCubeRepository::new(pool.clone()));
    let export_repository = Arc::new(SqliteExportRepository::new(pool.clone()));
    let lineage_repository = Arc::new(SqliteLineageRepository::new(pool.clone()));
    let stats_repository = Arc::new(SqliteStatsRepository::new(pool.clone()));
    let owner_directory = Arc::new(SqliteOwnerDirectory::new(pool.clone()));

    let cube_store = Arc::new(FilesystemCubeStore::new(PathBuf::from(&config.storage_root)));
    let crypto = Arc::new(RsaAesCryptoEngine::new());
    let envelope_codec = Arc::new(TarEnvelopeCodec::new());
    let key_token_codec = Arc::new(Base64JsonKeyTokenCodec::new());
    let id_generator = Arc::new(RandomIdGenerator::new());
    let clock = Arc::new(SystemClock::new());

    let shutdown = ShutdownCoordinator::new(Duration::from_secs(10));
    let cancellation = shutdown.token();
    let signal_handler = create_signal_handler();
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        signal_handler
            .wait_for_signal(Box::new(move || {
                shutdown_for_signal.initiate_shutdown();
            }))
            .await;
    });

    let app = Application {
        tenant: TenantId::new(config.default_apx_id.clone(), config.default_vdr_id.clone()),
        owner_id: OwnerId::new(config.default_owner_id),
        create_cube: cube::application::use_cases::CreateCubeUseCase::new(cube_repository.clone(), cube_store.clone(), id_generator.clone(), clock.clone(), cancellation.clone()),
        absorb_cube: cube::application::use_cases::AbsorbCubeUseCase::new(cube_repository.clone(), cube_store.clone(), clock.clone(), cancellation.clone()),
        export_cube: cube::application::use_cases::ExportCubeUseCase::new(
            cube_repository.clone(),
            export_repository.clone(),
            lineage_repository.clone(),
            stats_repository.clone(),
            cube_store.clone(),
            owner_directory.clone(),
            crypto.clone(),
            envelope_codec.clone(),
            id_generator.clone(),
            clock.clone(),
            cancellation.clone(),
        ),
        genkey_cube: cube::application::use_cases::GenKeyCubeUseCase::new(cube_repository.clone(), export_repository.clone(), crypto.clone(), envelope_codec.clone(), key_token_codec.clone(), clock.clone(), cancellation.clone()),
        import_cube: cube::application::use_cases::ImportCubeUseCase::new(
            cube_repository.clone(),
            cube_store.clone(),
            crypto.clone(),
            envelope_codec.clone(),
            key_token_codec.clone(),
            id_generator.clone(),
            clock.clone(),
            cancellation.clone(),
        ),
        rekey_cube: cube::application::use_cases::ReKeyCubeUseCase::new(cube_repository.clone(), export_repository.clone(), crypto.clone(), key_token_codec.clone(), clock.clone(), cancellation.clone()),
        stats_cube: cube::application::use_cases::StatsCubeUseCase::new(cube_repository.clone(), stats_repository.clone()),
        delete_cube: cube::application::use_cases::DeleteCubeUseCase::new(cube_repository, cube_store, clock, cancellation.clone()),
    };

    if cancellation.is_cancelled() {
        return Err(CubeError::Cancelled);
    }

    app.dispatch(cli.command).await
}
