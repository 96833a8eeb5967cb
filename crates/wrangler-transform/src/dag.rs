//! Dependency graph over transformations that touch the same columns.
//!
//! Edges point from a dependent transformation to the transformation it
//! depends on ("A depends on B"). Ordering uses Kahn's algorithm with
//! deterministic tie-breaking (nodes are stored in insertion order and the
//! ready queue is FIFO), and the computed order is cached until the graph is
//! mutated again.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use thiserror::Error;

use wrangler_model::Transformation;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DagError {
    #[error("transformation '{0}' not found in DAG")]
    UnknownNode(String),

    #[error("circular dependency detected in transformation DAG")]
    CircularDependency,
}

/// Directed acyclic graph of transformation dependencies.
#[derive(Debug, Clone, Default)]
pub struct TransformationDag {
    nodes: BTreeMap<String, Transformation>,
    /// Insertion order of node ids; drives deterministic sorting.
    order: Vec<String>,
    /// node id -> ids it depends on.
    dependencies: BTreeMap<String, BTreeSet<String>>,
    cached_order: Option<Vec<String>>,
}

impl TransformationDag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transformation(&mut self, transformation: Transformation) {
        let id = transformation.id.clone();
        if !self.nodes.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.nodes.insert(id.clone(), transformation);
        self.dependencies.entry(id).or_default();
        self.cached_order = None;
    }

    /// Record that `id` depends on `depends_on`.
    pub fn add_dependency(&mut self, id: &str, depends_on: &str) -> Result<(), DagError> {
        if !self.nodes.contains_key(id) {
            return Err(DagError::UnknownNode(id.to_string()));
        }
        if !self.nodes.contains_key(depends_on) {
            return Err(DagError::UnknownNode(depends_on.to_string()));
        }
        self.dependencies
            .entry(id.to_string())
            .or_default()
            .insert(depends_on.to_string());
        self.cached_order = None;
        Ok(())
    }

    /// Topological execution order via Kahn's algorithm.
    ///
    /// Dependencies always appear before their dependents. Fails when the
    /// graph contains a cycle.
    pub fn topological_sort(&mut self) -> Result<Vec<Transformation>, DagError> {
        if let Some(order) = &self.cached_order {
            return Ok(order
                .iter()
                .filter_map(|id| self.nodes.get(id).cloned())
                .collect());
        }

        let mut in_degree: BTreeMap<&str, usize> = self
            .order
            .iter()
            .map(|id| (id.as_str(), 0usize))
            .collect();
        for (id, deps) in &self.dependencies {
            let count = deps.iter().filter(|dep| in_degree.contains_key(dep.as_str())).count();
            if let Some(slot) = in_degree.get_mut(id.as_str()) {
                *slot = count;
            }
        }

        let mut queue: VecDeque<&str> = self
            .order
            .iter()
            .map(String::as_str)
            .filter(|id| in_degree.get(id).copied() == Some(0))
            .collect();
        let mut sorted: Vec<String> = Vec::with_capacity(self.nodes.len());

        while let Some(current) = queue.pop_front() {
            sorted.push(current.to_string());
            // Unlock nodes whose dependencies are now all satisfied.
            for id in &self.order {
                if let Some(deps) = self.dependencies.get(id)
                    && deps.contains(current)
                {
                    if let Some(degree) = in_degree.get_mut(id.as_str()) {
                        *degree -= 1;
                        if *degree == 0 {
                            queue.push_back(id.as_str());
                        }
                    }
                }
            }
        }

        if sorted.len() != self.nodes.len() {
            return Err(DagError::CircularDependency);
        }

        let transformations = sorted
            .iter()
            .filter_map(|id| self.nodes.get(id).cloned())
            .collect();
        self.cached_order = Some(sorted);
        Ok(transformations)
    }

    pub fn dependencies_of(&self, id: &str) -> BTreeSet<String> {
        self.dependencies.get(id).cloned().unwrap_or_default()
    }

    pub fn dependents_of(&self, id: &str) -> BTreeSet<String> {
        self.dependencies
            .iter()
            .filter(|(_, deps)| deps.contains(id))
            .map(|(node, _)| node.clone())
            .collect()
    }

    /// True when the graph is acyclic.
    pub fn validate(&mut self) -> bool {
        self.topological_sort().is_ok()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }
}

/// Builder for assembling a [`TransformationDag`].
#[derive(Debug, Default)]
pub struct TransformationDagBuilder {
    dag: TransformationDag,
}

impl TransformationDagBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transformation(mut self, transformation: Transformation) -> Self {
        self.dag.add_transformation(transformation);
        self
    }

    pub fn add_transformations(mut self, transformations: &[Transformation]) -> Self {
        for transformation in transformations {
            self.dag.add_transformation(transformation.clone());
        }
        self
    }

    /// Add explicit dependencies: id -> ids it depends on.
    pub fn with_dependencies(
        mut self,
        dependencies: &BTreeMap<String, Vec<String>>,
    ) -> Result<Self, DagError> {
        for (id, depends_on) in dependencies {
            for dep in depends_on {
                self.dag.add_dependency(id, dep)?;
            }
        }
        Ok(self)
    }

    /// Derive dependencies from column usage: each target column is owned by
    /// the most recently added transformation touching it, and a later
    /// transformation targeting the same column depends on the earlier one.
    pub fn auto_build_dependencies(mut self, transformations: &[Transformation]) -> Self {
        let mut column_owners: BTreeMap<&str, &str> = BTreeMap::new();
        for transformation in transformations {
            for column in &transformation.target_columns {
                if let Some(owner) = column_owners.get(column.as_str())
                    && self.dag.contains(owner)
                    && self.dag.contains(&transformation.id)
                {
                    // Both endpoints exist by construction.
                    let _ = self.dag.add_dependency(&transformation.id, owner);
                }
                column_owners.insert(column.as_str(), transformation.id.as_str());
            }
        }
        self
    }

    pub fn build(self) -> TransformationDag {
        self.dag
    }
}
