use std::collections::{BTreeMap, BTreeSet};

use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap, visit::Dfs};

use super::{error::GenerateError, model::NamedType};

/// Named types keyed by emission name.
///
/// Iteration is always name-sorted, which is what keeps generated output
/// stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeGraph {
  types: BTreeMap<String, NamedType>,
}

impl TypeGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a type, rejecting a second type that claims the same name from a
  /// different document location. Registering the same key twice keeps the
  /// first definition.
  pub fn register(&mut self, named: NamedType) -> Result<(), GenerateError> {
    if let Some(existing) = self.types.get(&named.name) {
      if existing.key == named.key {
        return Ok(());
      }
      return Err(GenerateError::TypeNameCollision {
        name: named.name,
        existing: existing.key.clone(),
        incoming: named.key,
      });
    }
    self.types.insert(named.name.clone(), named);
    Ok(())
  }

  /// Returns the key that currently owns `name`, if any.
  pub fn owner_of(&self, name: &str) -> Option<&str> {
    self.types.get(name).map(|named| named.key.as_str())
  }

  #[cfg(test)]
  pub fn get(&self, name: &str) -> Option<&NamedType> {
    self.types.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.types.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.types.len()
  }

  pub fn is_empty(&self) -> bool {
    self.types.is_empty()
  }

  /// Types in name order.
  pub fn iter(&self) -> impl Iterator<Item = &NamedType> {
    self.types.values()
  }

  fn dependency_graph(&self) -> DiGraphMap<&str, ()> {
    let mut graph = DiGraphMap::new();
    for (name, named) in &self.types {
      graph.add_node(name.as_str());
      for dep in named.dependencies() {
        if self.types.contains_key(dep) {
          graph.add_edge(name.as_str(), dep, ());
        }
      }
    }
    graph
  }

  /// Keeps only the types transitively reachable from `roots`.
  ///
  /// Roots that name no type are skipped silently so that partially
  /// specified documents still generate.
  #[must_use]
  pub fn reachable_from<'a>(&self, roots: impl IntoIterator<Item = &'a str>) -> Self {
    let graph = self.dependency_graph();
    let mut keep = BTreeSet::new();

    for root in roots {
      if !graph.contains_node(root) {
        continue;
      }
      let mut dfs = Dfs::new(&graph, root);
      while let Some(node) = dfs.next(&graph) {
        keep.insert(node.to_string());
      }
    }

    Self {
      types: self
        .types
        .iter()
        .filter(|(name, _)| keep.contains(*name))
        .map(|(name, named)| (name.clone(), named.clone()))
        .collect(),
    }
  }

  /// Groups of mutually dependent types, each sorted, in name order.
  pub fn cycles(&self) -> Vec<Vec<String>> {
    let graph = self.dependency_graph();
    let mut cycles: Vec<Vec<String>> = kosaraju_scc(&graph)
      .into_iter()
      .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
      .map(|scc| {
        let mut members: Vec<String> = scc.into_iter().map(String::from).collect();
        members.sort();
        members
      })
      .collect();
    cycles.sort();
    cycles
  }
}

/// Answers whether a reference from one type to another closes a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleIndex {
  component_of: BTreeMap<String, usize>,
}

impl CycleIndex {
  pub fn new(cycles: &[Vec<String>]) -> Self {
    let component_of = cycles
      .iter()
      .enumerate()
      .flat_map(|(index, members)| members.iter().map(move |name| (name.clone(), index)))
      .collect();
    Self { component_of }
  }

  /// True when `from` and `to` belong to the same strongly connected component.
  pub fn is_recursive(&self, from: &str, to: &str) -> bool {
    match (self.component_of.get(from), self.component_of.get(to)) {
      (Some(a), Some(b)) => a == b,
      _ => false,
    }
  }
}
