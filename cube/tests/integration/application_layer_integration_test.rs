//! # Application Layer Integration Tests
//!
//! Integration tests for the application layer commands of the Cube
//! subsystem. These verify command construction and the layering between
//! `application` and `cube_domain` value objects.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test application_layer_integration_test
//! ```

use chrono::Utc;
use cube::application::commands::{AbsorbCubeCommand, CreateCubeCommand, ExportCubeCommand, GenKeyCubeCommand};
use cube_domain::value_objects::{CubeId, EmbeddingConfig, LimitValue, OwnerId, Permissions, TenantId};

fn tenant() -> TenantId {
    TenantId::new("apx-test", "vdr-test")
}

/// Commands are plain data assembled by `cube::presentation`; this verifies
/// they store exactly what they were built with.
#[test]
fn test_create_cube_command_carries_fields() {
    let command = CreateCubeCommand {
        tenant: tenant(),
        owner_id: OwnerId::new(1),
        name: "research-notes".to_string(),
        description: Some("scratch space".to_string()),
        embedding_config: EmbeddingConfig::empty(),
    };

    assert_eq!(command.name, "research-notes");
    assert_eq!(command.description.as_deref(), Some("scratch space"));
    assert_eq!(command.owner_id, OwnerId::new(1));
}

#[test]
fn test_absorb_cube_command_carries_fields() {
    let command = AbsorbCubeCommand {
        tenant: tenant(),
        cube_id: CubeId::from_db(7),
        content: b"some bytes".to_vec(),
        memory_group: "group-a".to_string(),
        model_name: "embedder-v1".to_string(),
        action_type: "absorb".to_string(),
        contributor_owner_id: OwnerId::new(2),
    };

    assert_eq!(command.content, b"some bytes");
    assert_eq!(command.memory_group, "group-a");
    assert_eq!(command.cube_id, CubeId::from_db(7));
}

#[test]
fn test_export_cube_command_carries_fields() {
    let command = ExportCubeCommand { tenant: tenant(), cube_id: CubeId::from_db(3) };
    assert_eq!(command.cube_id, CubeId::from_db(3));
}

/// A GenKey command's requested permissions must never exceed what the
/// tri-state algebra can represent (forbidden / remaining / unlimited).
#[test]
fn test_genkey_cube_command_tri_state_permissions() {
    let permissions = Permissions {
        export_limit: LimitValue::Forbidden,
        rekey_limit: LimitValue::Remaining(3),
        genkey_limit: LimitValue::Unlimited,
        absorb_limit: LimitValue::Remaining(10),
        memify_limit: LimitValue::Forbidden,
        query_limit: LimitValue::Unlimited,
        allow_stats: true,
        memify_config_limit: Default::default(),
        query_type_limit: Default::default(),
    };

    let command = GenKeyCubeCommand {
        tenant: tenant(),
        requesting_owner: OwnerId::new(1),
        envelope_bytes: vec![0u8; 4],
        requested_permissions: permissions,
        requested_expire_at: Some(Utc::now()),
    };

    assert_eq!(command.requested_permissions.export_limit, LimitValue::Forbidden);
    assert_eq!(command.requested_permissions.genkey_limit, LimitValue::Unlimited);
    assert!(command.requested_expire_at.is_some());
}

/// Validates that the application layer depends only on `cube_domain`
/// abstractions (ports, value objects) and not on any concrete
/// infrastructure type, satisfied by this file compiling without pulling in
/// `cube::infrastructure::adapters`.
#[tokio::test]
async fn test_application_layer_structure() {
    let command = CreateCubeCommand {
        tenant: tenant(),
        owner_id: OwnerId::new(9),
        name: "structure-check".to_string(),
        description: None,
        embedding_config: EmbeddingConfig::empty(),
    };
    assert_eq!(command.name, "structure-check");
}
