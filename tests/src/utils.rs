use std::path::PathBuf;

use schemalink_schema::{registry::SchemaRegistry, value::Instance};

pub(crate) fn get_test_data_path() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::current_dir().unwrap());
    manifest_dir.join("test_data")
}

pub(crate) fn template_path(name: &str) -> PathBuf {
    get_test_data_path().join("templates").join(name)
}

/// Registry holding `libSrc`, `libA` and `libB` from `test_data/schemas`.
pub(crate) fn registry() -> SchemaRegistry {
    schemalink::load_registry(&[get_test_data_path().join("schemas")]).unwrap()
}

/// The `Measurement` fixture from `test_data/instances/measurement.json`.
pub(crate) fn measurement(registry: &SchemaRegistry) -> Instance {
    let path = get_test_data_path().join("instances").join("measurement.json");
    schemalink::load_instance(registry, "libSrc.Measurement", &path).unwrap()
}

/// Decodes inline JSON as a `libSrc.Measurement`.
pub(crate) fn measurement_from(registry: &SchemaRegistry, json: &serde_json::Value) -> Instance {
    let schema = registry.resolve("libSrc", "Measurement").unwrap();
    schemalink_schema::document::decode_instance(registry, &schema, json).unwrap()
}
