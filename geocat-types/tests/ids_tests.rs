use geocat_types::{CatalogId, IdGenerator, InfoType, UuidIdGenerator};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;
use std::str::FromStr;

// ── CatalogId ─────────────────────────────────────────────────────

#[test]
fn generated_id_is_prefixed_by_type_name() {
    let id = CatalogId::generate("WorkspaceInfo");
    assert!(id.as_str().starts_with("WorkspaceInfo."));
    assert_eq!(id.prefix(), Some("WorkspaceInfo"));
}

#[test]
fn generated_ids_are_unique() {
    let ids: HashSet<CatalogId> = (0..100).map(|_| CatalogId::generate("StoreInfo")).collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn parse_preserves_foreign_ids_verbatim() {
    let id = CatalogId::parse("ws-0001").unwrap();
    assert_eq!(id.as_str(), "ws-0001");
    assert_eq!(id.prefix(), None);
}

#[test]
fn parse_rejects_empty() {
    assert!(CatalogId::parse("").is_err());
    assert!(CatalogId::parse("   ").is_err());
}

#[test]
fn from_str_matches_parse() {
    let a = CatalogId::from_str("LayerInfo.abc").unwrap();
    let b = CatalogId::parse("LayerInfo.abc").unwrap();
    assert_eq!(a, b);
}

#[test]
fn display_is_the_raw_token() {
    let id = CatalogId::parse("StyleInfo.x").unwrap();
    assert_eq!(id.to_string(), "StyleInfo.x");
}

#[test]
fn serde_is_transparent() {
    let id = CatalogId::parse("NamespaceInfo.1").unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"NamespaceInfo.1\"");
    let back: CatalogId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn converts_into_json_string() {
    let id = CatalogId::parse("MapInfo.7").unwrap();
    let value: serde_json::Value = (&id).into();
    assert_eq!(value, serde_json::json!("MapInfo.7"));
}

#[test]
fn uuid_generator_uses_prefix() {
    let id = UuidIdGenerator.generate("LayerGroupInfo");
    assert_eq!(id.prefix(), Some("LayerGroupInfo"));
}

// ── InfoType ──────────────────────────────────────────────────────

#[test]
fn type_names_round_trip_through_from_str() {
    for t in InfoType::ALL {
        assert_eq!(InfoType::from_str(t.type_name()).unwrap(), t);
    }
}

#[test]
fn unknown_type_name_is_rejected() {
    assert!(InfoType::from_str("ServiceInfo").is_err());
}

#[test]
fn all_is_in_dependency_order() {
    assert_eq!(InfoType::ALL[0], InfoType::Workspace);
    assert_eq!(InfoType::ALL[7], InfoType::Map);
    let store = InfoType::ALL.iter().position(|t| *t == InfoType::Store).unwrap();
    let resource = InfoType::ALL.iter().position(|t| *t == InfoType::Resource).unwrap();
    assert!(store < resource);
}

proptest! {
    #[test]
    fn any_non_blank_token_parses_verbatim(s in "[A-Za-z0-9._-]{1,40}") {
        let id = CatalogId::parse(&s).unwrap();
        prop_assert_eq!(id.as_str(), s.as_str());
    }
}
