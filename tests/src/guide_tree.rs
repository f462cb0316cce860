/// Tests for guide tree construction
///
/// These tests verify that the builder:
/// 1. Mirrors every declared field, including those of nested schemas
/// 2. Terminates on direct and multi-hop recursive schemas
/// 3. Expands every union alternative and propagates container kinds
#[cfg(test)]
mod guide_tree_tests {
    use crate::utils::registry;
    use schemalink_guide_tree::{builder::GuideTreeBuilder, errors::TreeError};
    use schemalink_schema::{
        descriptor::{ContainerKind, FieldDescriptor, SchemaDescriptor, TypeRef},
        registry::{SchemaModule, SchemaRegistry},
    };

    fn cyclic_registry() -> SchemaRegistry {
        let module = SchemaModule::new("loop")
            .with_schema(
                SchemaDescriptor::new("A", "loop")
                    .with_field(FieldDescriptor::new("label", TypeRef::string()))
                    .with_field(FieldDescriptor::new("b", TypeRef::schema("B"))),
            )
            .with_schema(SchemaDescriptor::new("B", "loop").with_field(FieldDescriptor::new("c", TypeRef::schema("C"))))
            .with_schema(
                SchemaDescriptor::new("C", "loop")
                    .with_field(FieldDescriptor::new("a", TypeRef::schema("A")).sequence())
                    .with_field(FieldDescriptor::new("value", TypeRef::integer())),
            );
        SchemaRegistry::new().with_provider(module)
    }

    #[test]
    fn test_node_count_is_bounded_by_reachable_fields() {
        let registry = registry();
        let measurement = registry.resolve("libSrc", "Measurement").unwrap();
        let tree = GuideTreeBuilder::build_tree(&registry, &measurement, ContainerKind::None).unwrap();

        // 4 fields of Measurement, 3 fields of Specimen under `sample` and
        // 3 more under `specimens`
        assert_eq!(tree.attribute_nodes().count(), 10);
        assert_eq!(tree.class_nodes().count(), 3);
        assert_eq!(tree.len(), 13);
    }

    #[test]
    fn test_multi_hop_cycle_terminates() {
        let registry = cyclic_registry();
        let a = registry.resolve("loop", "A").unwrap();
        let tree = GuideTreeBuilder::build_tree(&registry, &a, ContainerKind::None).unwrap();

        // A.label, A.b -> B.c -> C.a (not expanded), C.value
        assert_eq!(tree.class_nodes().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["A", "B", "C"]);
        let back_edge = tree.find_attribute("b.c.a").unwrap();
        assert_eq!(tree.classes_of(back_edge).count(), 0);
        assert!(tree.find_attribute("b.c.value").is_ok());
    }

    #[test]
    fn test_cycle_entered_below_the_root_terminates() {
        let registry = cyclic_registry();
        let b = registry.resolve("loop", "B").unwrap();
        let tree = GuideTreeBuilder::build_tree(&registry, &b, ContainerKind::None).unwrap();
        // B -> C -> A -> (B not expanded again)
        assert!(tree.find_attribute("c.a.label").is_ok());
        let b_again = tree.find_attribute("c.a.b").unwrap();
        assert_eq!(tree.classes_of(b_again).count(), 0);
    }

    #[test]
    fn test_sequence_container_is_propagated_to_nested_class() {
        let registry = registry();
        let measurement = registry.resolve("libSrc", "Measurement").unwrap();
        let tree = GuideTreeBuilder::build_tree(&registry, &measurement, ContainerKind::None).unwrap();

        let specimens = tree.find_attribute("specimens").unwrap();
        let class = tree.classes_of(specimens).next().unwrap();
        assert_eq!(class.name, "Specimen");
        assert_eq!(class.module_tag, "libSrc");
        assert_eq!(class.container, ContainerKind::Sequence);

        let sample = tree.find_attribute("sample").unwrap();
        assert_eq!(tree.classes_of(sample).next().unwrap().container, ContainerKind::None);
        assert_eq!(tree.attribute_path(tree.find_attribute("specimens.mass").unwrap()), "specimens.mass");
    }

    #[test]
    fn test_union_alternatives_share_a_path() {
        let module = SchemaModule::new("u")
            .with_schema(
                SchemaDescriptor::new("Holder", "u").with_field(FieldDescriptor::union(
                    "part",
                    vec![TypeRef::schema("Bolt"), TypeRef::schema("Nut"), TypeRef::string()],
                )),
            )
            .with_schema(SchemaDescriptor::new("Bolt", "u").with_field(FieldDescriptor::new("name", TypeRef::string())))
            .with_schema(SchemaDescriptor::new("Nut", "u").with_field(FieldDescriptor::new("name", TypeRef::string())));
        let registry = SchemaRegistry::new().with_provider(module);
        let holder = registry.resolve("u", "Holder").unwrap();
        let tree = GuideTreeBuilder::build_tree(&registry, &holder, ContainerKind::None).unwrap();

        let part = tree.find_attribute("part").unwrap();
        assert_eq!(tree.classes_of(part).map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["Bolt", "Nut"]);
        let err = tree.find_attribute("part.name").unwrap_err();
        assert!(matches!(err, TreeError::AmbiguousPath { count: 2, .. }));
    }
}
