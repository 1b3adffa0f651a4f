// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # EnvelopeCodec — the two-layer archive format port (§4.3, §6)
//!
//! The domain defines the archive's data shape and the codec contract; the
//! concrete `tar`-backed implementation lives in
//! `cube::infrastructure::adapters::envelope`, since archive building is
//! infrastructure I/O, not domain logic.

use crate::entities::{ContributorStat, LineageEntry, UsageStat};
use crate::error::CubeError;
use crate::value_objects::{EmbeddingConfig, ExportId};

/// The five required entries of the outer archive (§4.3), already
/// extracted/decoded by a parse, or already assembled ready for writing by a
/// build.
#[derive(Debug, Clone)]
pub struct OuterEnvelope {
    pub encrypted_data: Vec<u8>,
    pub signature: Vec<u8>,
    pub public_key_pem: String,
    pub encrypted_aes_key: Vec<u8>,
    pub export_id: ExportId,
}

/// The inner archive, decrypted and parsed (or ready to be encrypted and
/// written). `embedding_config.json` is required on import — its absence is
/// a parse-time `Malformed` error (§4.6).
#[derive(Debug, Clone)]
pub struct InnerArchive {
    /// Raw bytes of the Cube's single-file store, as found under `db/`.
    pub db_bytes: Vec<u8>,
    /// `metadata.json`, ordered `generation` ascending.
    pub lineage: Vec<LineageEntry>,
    pub usage_stats: Vec<UsageStat>,
    pub contributor_stats: Vec<ContributorStat>,
    pub embedding_config: EmbeddingConfig,
}

pub trait EnvelopeCodec: Send + Sync {
    /// Builds the outer archive's raw bytes from its five entries.
    fn build_outer(&self, outer: &OuterEnvelope) -> Result<Vec<u8>, CubeError>;

    /// Parses the outer archive, failing with [`CubeError::Malformed`] if any
    /// of the five required entries is missing. Does not trust
    /// `export_id.txt` beyond parsing it as the value later compared for
    /// equality by the caller.
    fn parse_outer(&self, bytes: &[u8]) -> Result<OuterEnvelope, CubeError>;

    /// Builds the inner archive's raw bytes (to be AES-GCM sealed by the
    /// caller) from its entries.
    fn build_inner(&self, inner: &InnerArchive) -> Result<Vec<u8>, CubeError>;

    /// Parses a decrypted inner archive. Silently skips any entry under
    /// `db/` whose remaining path still contains a separator after the
    /// prefix is stripped (§4.6 whitespace/path-safety rule); fails with
    /// [`CubeError::Malformed`] if `embedding_config.json` is absent.
    fn parse_inner(&self, bytes: &[u8]) -> Result<InnerArchive, CubeError>;
}
