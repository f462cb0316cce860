/// Tests for tree conversion
///
/// These tests verify that the converter:
/// 1. Prefers template targets over annotations
/// 2. Writes one entry per sequence element at indices `0..n-1`
/// 3. Selects rule targets per object and rejects ambiguous matches
/// 4. Leaves unmapped attributes out of every tree
#[cfg(test)]
mod converter_tests {
    use crate::utils::{measurement, measurement_from, registry, template_path};
    use schemalink_guide_tree::nodes::WriteKey;
    use schemalink_linker::{LinkerBuilder, errors::LinkError, roots::Roots, template::LinkTemplate};
    use schemalink_schema::{registry::SchemaRegistry, value::Instance};

    fn convert(registry: &SchemaRegistry, instance: &Instance, option: &str, template: &str) -> Result<Roots, LinkError> {
        let template = LinkTemplate::load(&template_path(template))?;
        let mut linker = LinkerBuilder::new(registry, option)
            .with_template(template)
            .resolve_roots(instance.schema())?;
        linker.convert(instance)?;
        Ok(linker.roots().clone())
    }

    fn keys(roots: &Roots, root: &str, path: &str) -> Vec<WriteKey> {
        let tree = &roots[root];
        let id = tree.find_attribute(path).unwrap();
        tree.attribute(id).unwrap().values.keys().cloned().collect()
    }

    #[test]
    fn test_template_override_beats_annotation() {
        let registry = registry();
        let instance = measurement_from(&registry, &serde_json::json!({"sample": {"kind": "glass", "mass": 1.5}}));
        let roots = convert(&registry, &instance, "A", "override.toml").unwrap();

        assert_eq!(keys(&roots, "Vessel", "mass"), vec![WriteKey::Index(0)]);
        assert!(keys(&roots, "Sample", "mass").is_empty());
    }

    #[test]
    fn test_sequence_multiplicity() {
        let registry = registry();
        let instance = measurement(&registry);
        let roots = convert(&registry, &instance, "A", "glass_metal.yaml").unwrap();

        let expected = vec![WriteKey::Index(0), WriteKey::Index(1), WriteKey::Index(2)];
        assert_eq!(keys(&roots, "Sample", "components.name"), expected);
        assert_eq!(keys(&roots, "Sample", "components.weight"), expected);

        let tree = &roots["Sample"];
        let names = &tree.attribute(tree.find_attribute("components.name").unwrap()).unwrap().values;
        let in_order: Vec<String> = names.values().map(ToString::to_string).collect();
        assert_eq!(in_order, vec!["M-1", "G-2", "M-2"]);
    }

    #[test]
    fn test_glass_selects_first_rule_exclusively() {
        let registry = registry();
        let instance = measurement_from(&registry, &serde_json::json!({"sample": {"kind": "glass", "label": "G-1"}}));
        let roots = convert(&registry, &instance, "A", "glass_metal.yaml").unwrap();

        assert_eq!(keys(&roots, "Sample", "label"), vec![WriteKey::Index(0)]);
        assert!(keys(&roots, "Vessel", "label").is_empty());
    }

    #[test]
    fn test_metal_selects_second_rule() {
        let registry = registry();
        let instance = measurement_from(&registry, &serde_json::json!({"sample": {"kind": "metal", "label": "M-9"}}));
        let roots = convert(&registry, &instance, "A", "glass_metal.yaml").unwrap();

        assert!(keys(&roots, "Sample", "label").is_empty());
        assert_eq!(keys(&roots, "Vessel", "label"), vec![WriteKey::Index(0)]);
    }

    #[test]
    fn test_no_matching_rule_falls_back_to_annotations() {
        let registry = registry();
        let instance = measurement_from(
            &registry,
            &serde_json::json!({"sample": {"kind": "ceramic", "label": "C-1", "mass": 0.5}}),
        );
        let roots = convert(&registry, &instance, "A", "glass_metal.yaml").unwrap();

        assert!(keys(&roots, "Sample", "label").is_empty());
        assert!(keys(&roots, "Vessel", "label").is_empty());
        assert_eq!(keys(&roots, "Sample", "mass"), vec![WriteKey::composite("sample", 0)]);
    }

    #[test]
    fn test_ambiguous_rules_report_path_and_count() {
        let registry = registry();
        let instance = measurement_from(&registry, &serde_json::json!({"sample": {"kind": "glass"}}));
        let err = convert(&registry, &instance, "A", "ambiguous.yaml").unwrap_err();

        let message = err.to_string();
        assert!(matches!(err, LinkError::AmbiguousMapping { matches: 2, .. }));
        assert!(message.contains("`sample`"), "got: {message}");
        assert!(message.contains('2'), "got: {message}");
    }

    #[test]
    fn test_unmapped_attributes_are_never_written() {
        let registry = registry();
        let instance = measurement(&registry);
        let roots = convert(&registry, &instance, "A", "glass_metal.yaml").unwrap();

        // `operator` and every `kind` have neither a template target nor an
        // annotation for option A; `label` under `sample` goes to Sample only
        for tree in roots.values() {
            for attribute in tree.attribute_nodes() {
                for value in attribute.values.values() {
                    let text = value.to_string();
                    assert_ne!(text, "jdoe");
                    assert_ne!(text, "glass");
                    assert_ne!(text, "metal");
                }
            }
        }
    }

    #[test]
    fn test_option_selects_annotation_set() {
        let registry = registry();
        let instance = measurement_from(&registry, &serde_json::json!({"temperature": 30.0}));
        let roots = convert(&registry, &instance, "B", "does_not_exist.yaml").unwrap();

        assert_eq!(roots.keys().collect::<Vec<_>>(), vec!["Vessel"]);
        assert_eq!(keys(&roots, "Vessel", "temp"), vec![WriteKey::composite("", 0)]);
    }
}
