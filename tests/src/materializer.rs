/// Tests for turning filled guide trees into destination instances
#[cfg(test)]
mod materializer_tests {
    use crate::utils::{measurement, registry, template_path};
    use schemalink_linker::{LinkerBuilder, template::LinkTemplate};
    use schemalink_schema::value::Value;

    #[test]
    fn test_nested_sequence_materializes_in_source_order() {
        let registry = registry();
        let instance = measurement(&registry);
        let template = LinkTemplate::load(&template_path("glass_metal.yaml")).unwrap();
        let mut linker = LinkerBuilder::new(&registry, "A")
            .with_template(template)
            .resolve_roots(instance.schema())
            .unwrap();
        linker.convert(&instance).unwrap();
        let destinations = linker.materialize();

        assert_eq!(
            destinations.iter().map(|d| d.class_name()).collect::<Vec<_>>(),
            vec!["Sample", "Vessel"]
        );
        let sample = &destinations[0];
        assert_eq!(sample.get("temp"), Some(&Value::Float(25.0)));
        let components = sample.get("components").unwrap().as_object_list().unwrap();
        assert_eq!(components.len(), 3);
        assert!(components.iter().all(|c| c.class_name() == "Component"));
        assert_eq!(components[2].get("name"), Some(&Value::from("M-2")));
        assert_eq!(components[2].get("weight"), Some(&Value::Float(4.0)));
    }

    #[test]
    fn test_roots_without_data_materialize_empty() {
        let registry = registry();
        let instance = measurement(&registry);
        let template = LinkTemplate::load(&template_path("glass_metal.yaml")).unwrap();
        let mut linker = LinkerBuilder::new(&registry, "A")
            .with_template(template)
            .resolve_roots(instance.schema())
            .unwrap();
        linker.convert(&instance).unwrap();
        let destinations = linker.materialize();

        // the only sample is glass, so nothing reaches Vessel
        let vessel = &destinations[1];
        assert!(vessel.is_empty());
        assert_eq!(serde_json::to_value(vessel).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_repeated_conversion_accumulates_into_the_same_roots() {
        let registry = registry();
        let first = crate::utils::measurement_from(&registry, &serde_json::json!({"temperature": 1.0}));
        let second = crate::utils::measurement_from(&registry, &serde_json::json!({"sample": {"mass": 2.5}}));
        let mut linker = LinkerBuilder::new(&registry, "A").resolve_roots(first.schema()).unwrap();
        linker.convert(&first).unwrap();
        linker.convert(&second).unwrap();
        let destinations = linker.materialize();

        assert_eq!(destinations.len(), 1);
        assert_eq!(destinations[0].get("temp"), Some(&Value::Float(1.0)));
        assert_eq!(destinations[0].get("mass"), Some(&Value::Float(2.5)));
    }
}
