/// Tests for link template loading and template authoring
#[cfg(test)]
mod template_tests {
    use crate::utils::{registry, template_path};
    use schemalink::{
        authoring::{PLACEHOLDER_TARGET, SkeletonEntry},
        generate_template, write_template,
    };
    use schemalink_linker::{
        errors::LinkError,
        template::{LinkTemplate, TemplateEntry},
    };
    use schemalink_schema::format::DocumentFormat;

    #[test]
    fn test_fixture_templates_load() {
        let template = LinkTemplate::load(&template_path("glass_metal.yaml")).unwrap();
        assert_eq!(template.model(), Some("libSrc.Measurement"));
        assert_eq!(template.sources().len(), 2);
        assert!(matches!(template.entry("sample"), Some(TemplateEntry::Rules(rules)) if rules.len() == 2));
        assert!(matches!(template.entry("specimens"), Some(TemplateEntry::Targets(t)) if t.len() == 2));

        let toml = LinkTemplate::load(&template_path("override.toml")).unwrap();
        assert_eq!(
            toml.target_paths().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["libB.Vessel.mass"]
        );
    }

    #[test]
    fn test_missing_template_is_empty() {
        let template = LinkTemplate::load(&template_path("does_not_exist.yaml")).unwrap();
        assert!(template.is_empty());
        assert_eq!(template.target_paths().count(), 0);
    }

    #[test]
    fn test_malformed_rules_are_skipped() {
        let text = r#"
sample:
  - attribute: kind
    pattern: "^glass$"
  - "not a rule"
  - attribute: kind
    pattern: "^metal$"
    targets:
      label: libB.Vessel.label
"#;
        let template = LinkTemplate::parse(text, DocumentFormat::Yaml).unwrap();
        let Some(TemplateEntry::Rules(rules)) = template.entry("sample") else {
            panic!("expected rules at `sample`");
        };
        assert_eq!(rules.len(), 1);
        assert!(rules[0].matches("metal"));
    }

    #[test]
    fn test_placeholder_targets_do_not_load() {
        let text = "sample:\n  kind: Enter target\n";
        assert!(matches!(
            LinkTemplate::parse(text, DocumentFormat::Yaml),
            Err(LinkError::InvalidTargetPath { .. })
        ));
    }

    #[test]
    fn test_generated_templates_cover_every_nested_class_path() {
        let registry = registry();
        let schema = registry.resolve_qualified("libSrc.Measurement").unwrap();

        for simple in [true, false] {
            let document = generate_template(&registry, &schema, simple).unwrap();
            assert_eq!(
                document.entries.keys().collect::<Vec<_>>(),
                vec!["Measurement", "sample", "specimens"],
                "simple = {simple}"
            );
            for (path, entry) in document.entries.iter().skip(1) {
                let targets = match (entry, simple) {
                    (SkeletonEntry::Targets(targets), true) => targets,
                    (SkeletonEntry::Rules(rules), false) => &rules[0].targets,
                    _ => panic!("unexpected entry shape at `{path}`"),
                };
                assert_eq!(targets.keys().collect::<Vec<_>>(), vec!["kind", "mass", "label"]);
                assert!(targets.values().all(|t| t == PLACEHOLDER_TARGET));
            }
        }
    }

    #[test]
    fn test_root_entry_lists_non_container_attributes() {
        let registry = registry();
        let schema = registry.resolve_qualified("libSrc.Measurement").unwrap();
        let document = generate_template(&registry, &schema, true).unwrap();
        let SkeletonEntry::Targets(root) = &document.entries["Measurement"] else {
            panic!("root entry is a flat map");
        };
        assert_eq!(root.keys().collect::<Vec<_>>(), vec!["temperature", "operator", "sample"]);
    }

    #[test]
    fn test_written_rule_template_reads_back_as_rules() {
        let registry = registry();
        let schema = registry.resolve_qualified("libSrc.Measurement").unwrap();
        let mut document = generate_template(&registry, &schema, false).unwrap();
        document.entries.shift_remove("Measurement");
        for entry in document.entries.values_mut() {
            if let SkeletonEntry::Rules(rules) = entry {
                rules[0].attribute = "kind".to_string();
                for target in rules[0].targets.values_mut() {
                    *target = "libA.Sample.label".to_string();
                }
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        write_template(&document, &path).unwrap();
        let template = LinkTemplate::load(&path).unwrap();
        let Some(TemplateEntry::Rules(rules)) = template.entry("specimens") else {
            panic!("expected rules at `specimens`");
        };
        assert_eq!(rules[0].attribute, "kind");
        assert!(rules[0].matches("anything"));
        assert_eq!(template.sources().get("LibName").map(String::as_str), Some("URL to the library"));
    }
}
