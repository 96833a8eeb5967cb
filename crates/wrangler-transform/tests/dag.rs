use std::collections::BTreeMap;

use proptest::prelude::{ProptestConfig, any, proptest};

use wrangler_model::{Transformation, TransformationType};
use wrangler_transform::{DagError, TransformationDag, TransformationDagBuilder};

fn transformation(id: &str, columns: &[&str]) -> Transformation {
    Transformation::new(
        id,
        TransformationType::Normalize,
        columns.iter().map(|c| (*c).to_string()).collect(),
        BTreeMap::new(),
        true,
        format!("normalize {columns:?}"),
    )
}

#[test]
fn sort_respects_explicit_dependencies() {
    let mut dag = TransformationDag::new();
    dag.add_transformation(transformation("c", &["x"]));
    dag.add_transformation(transformation("a", &["x"]));
    dag.add_transformation(transformation("b", &["x"]));
    dag.add_dependency("c", "b").unwrap();
    dag.add_dependency("b", "a").unwrap();

    let order: Vec<String> = dag
        .topological_sort()
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(order, vec!["a", "b", "c"]);
}

#[test]
fn cycle_is_rejected() {
    let mut dag = TransformationDag::new();
    dag.add_transformation(transformation("a", &["x"]));
    dag.add_transformation(transformation("b", &["x"]));
    dag.add_dependency("a", "b").unwrap();
    dag.add_dependency("b", "a").unwrap();

    assert_eq!(dag.topological_sort(), Err(DagError::CircularDependency));
    assert!(!dag.validate());
}

#[test]
fn self_cycle_is_rejected() {
    let mut dag = TransformationDag::new();
    dag.add_transformation(transformation("a", &["x"]));
    dag.add_dependency("a", "a").unwrap();
    assert_eq!(dag.topological_sort(), Err(DagError::CircularDependency));
}

#[test]
fn unknown_nodes_are_rejected() {
    let mut dag = TransformationDag::new();
    dag.add_transformation(transformation("a", &["x"]));
    assert_eq!(
        dag.add_dependency("a", "ghost"),
        Err(DagError::UnknownNode("ghost".to_string()))
    );
    assert_eq!(
        dag.add_dependency("ghost", "a"),
        Err(DagError::UnknownNode("ghost".to_string()))
    );
}

#[test]
fn auto_dependencies_follow_column_ownership() {
    let transformations = vec![
        transformation("fill-x", &["x"]),
        transformation("normalize-x", &["x"]),
        transformation("encode-y", &["y"]),
    ];
    let mut dag = TransformationDagBuilder::new()
        .add_transformations(&transformations)
        .auto_build_dependencies(&transformations)
        .build();

    assert!(dag.dependencies_of("normalize-x").contains("fill-x"));
    assert!(dag.dependencies_of("encode-y").is_empty());
    assert_eq!(dag.dependents_of("fill-x").len(), 1);

    let order: Vec<String> = dag
        .topological_sort()
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    let fill_pos = order.iter().position(|id| id == "fill-x").unwrap();
    let normalize_pos = order.iter().position(|id| id == "normalize-x").unwrap();
    assert!(fill_pos < normalize_pos);
}

#[test]
fn cached_order_is_invalidated_on_mutation() {
    let mut dag = TransformationDag::new();
    dag.add_transformation(transformation("a", &["x"]));
    dag.add_transformation(transformation("b", &["x"]));
    assert_eq!(dag.topological_sort().unwrap().len(), 2);

    dag.add_transformation(transformation("c", &["x"]));
    dag.add_dependency("a", "c").unwrap();
    let order: Vec<String> = dag
        .topological_sort()
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(order.len(), 3);
    let c_pos = order.iter().position(|id| id == "c").unwrap();
    let a_pos = order.iter().position(|id| id == "a").unwrap();
    assert!(c_pos < a_pos);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// For any acyclic dependency set (edges only from later to earlier
    /// nodes), the sorted order places every dependency before its dependent.
    #[test]
    fn sort_respects_every_edge(edge_bits in proptest::collection::vec(any::<bool>(), 45)) {
        const NODES: usize = 10;
        let mut dag = TransformationDag::new();
        let ids: Vec<String> = (0..NODES).map(|i| format!("t{i}")).collect();
        for id in &ids {
            dag.add_transformation(transformation(id, &["x"]));
        }

        // Enumerate the pairs (i, j) with j < i; a set bit adds edge i -> j.
        let mut edges = Vec::new();
        let mut bit = 0usize;
        for i in 1..NODES {
            for j in 0..i {
                if edge_bits[bit] {
                    dag.add_dependency(&ids[i], &ids[j]).unwrap();
                    edges.push((i, j));
                }
                bit += 1;
            }
        }

        let order: Vec<String> = dag
            .topological_sort()
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        let position: std::collections::BTreeMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(pos, id)| (id.as_str(), pos))
            .collect();

        for (dependent, dependency) in edges {
            let dep_pos = position[ids[dependency].as_str()];
            let node_pos = position[ids[dependent].as_str()];
            assert!(dep_pos < node_pos, "{} must precede {}", ids[dependency], ids[dependent]);
        }
    }
}
