/// End to end conversions through `schemalink::convert_data_model`
#[cfg(test)]
mod end_to_end_tests {
    use crate::utils::{measurement, measurement_from, registry, template_path};
    use rustc_hash::FxHashSet;
    use schemalink::{convert_data_model, destinations_to_json};
    use schemalink_schema::value::{Instance, Value};

    fn collect_keys(value: &serde_json::Value, keys: &mut FxHashSet<String>) {
        match value {
            serde_json::Value::Object(object) => {
                for (key, nested) in object {
                    keys.insert(key.clone());
                    collect_keys(nested, keys);
                }
            }
            serde_json::Value::Array(items) => items.iter().for_each(|item| collect_keys(item, keys)),
            _ => {}
        }
    }

    #[test]
    fn test_annotated_temperature_becomes_sample_temp() {
        let registry = registry();
        let instance = measurement_from(&registry, &serde_json::json!({"temperature": 25.0}));
        let destinations = convert_data_model(&registry, &instance, "A", None).unwrap();

        assert_eq!(destinations.len(), 1);
        assert_eq!(destinations[0].class_name(), "Sample");
        assert_eq!(destinations[0].get("temp"), Some(&Value::Float(25.0)));
    }

    #[test]
    fn test_missing_template_equals_no_template() -> anyhow::Result<()> {
        let registry = registry();
        let instance = measurement(&registry);
        let without = convert_data_model(&registry, &instance, "A", None)?;
        let missing = convert_data_model(&registry, &instance, "A", Some(&template_path("absent.toml")))?;
        assert_eq!(destinations_to_json(&without), destinations_to_json(&missing));
        Ok(())
    }

    #[test]
    fn test_full_fixture_conversion() -> anyhow::Result<()> {
        let registry = registry();
        let instance = measurement(&registry);
        let destinations = convert_data_model(&registry, &instance, "A", Some(&template_path("glass_metal.yaml")))?;
        assert_eq!(
            destinations_to_json(&destinations),
            serde_json::json!({
                "Sample": {
                    "temp": 25.0,
                    "mass": 1.5,
                    "label": "G-1",
                    "components": [
                        {"name": "M-1", "weight": 2.0},
                        {"name": "G-2", "weight": 3.0},
                        {"name": "M-2", "weight": 4.0}
                    ]
                },
                "Vessel": {}
            })
        );
        Ok(())
    }

    #[test]
    fn test_unmapped_attributes_are_absent_from_output() {
        let registry = registry();
        let instance = measurement(&registry);
        let destinations =
            convert_data_model(&registry, &instance, "A", Some(&template_path("glass_metal.yaml"))).unwrap();
        let mut keys = FxHashSet::default();
        collect_keys(&destinations_to_json(&destinations), &mut keys);
        assert!(!keys.contains("operator"));
        assert!(!keys.contains("kind"));
    }

    #[test]
    fn test_ambiguity_error_reaches_the_caller() {
        let registry = registry();
        let instance = measurement_from(&registry, &serde_json::json!({"sample": {"kind": "glass"}}));
        let err = convert_data_model(&registry, &instance, "A", Some(&template_path("ambiguous.yaml"))).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("at `sample` matches for 2 targets"), "got: {message}");
    }

    #[test]
    fn test_destinations_are_regular_instances() {
        let registry = registry();
        let instance = measurement_from(&registry, &serde_json::json!({"temperature": 25.0}));
        let destinations = convert_data_model(&registry, &instance, "A", None).unwrap();
        let expected = Instance::new(registry.resolve("libA", "Sample").unwrap()).with("temp", 25.0);
        assert_eq!(destinations, vec![expected]);
    }
}
