//! Serialization checks for the `repair_category` record shape.

use category_store::{name_key, RepairCategory};

#[test]
fn test_repair_category_serialization_omits_missing_id() {
    let record = RepairCategory::new("Cambio de batería", 45);

    let json = serde_json::to_value(&record).expect("Failed to serialize");
    assert!(json.get("id").is_none());
    assert_eq!(json["name"], "Cambio de batería");
    assert_eq!(json["name_key"], "cambio de batería");
    assert_eq!(json["avg_minutes"], 45);
    assert!(json.get("created_at").is_some());
}

#[test]
fn test_name_key_is_the_only_normalization() {
    assert_eq!(name_key("Cambio De Batería"), "cambio de batería");
    assert_eq!(name_key("cambio_aceite"), "cambio_aceite");
}
