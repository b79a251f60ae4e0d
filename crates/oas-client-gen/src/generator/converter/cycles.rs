use std::collections::BTreeMap;

use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap};

use crate::generator::ast::{ModelDef, RecordDef};

/// Boxes every record field that stores, inline, a record from its own reference cycle.
///
/// Only inline edges count: `Vec` already puts its elements on the heap.
pub(crate) fn box_recursive_fields(models: &mut [ModelDef]) {
  let component_of = cyclic_components(models.iter().filter_map(ModelDef::as_record));

  for model in models {
    let ModelDef::Record(record) = model else {
      continue;
    };
    let Some(component) = component_of.get(&record.name).copied() else {
      continue;
    };

    for field in &mut record.fields {
      let same_cycle = field
        .rust_type
        .inline_name()
        .is_some_and(|name| component_of.get(name) == Some(&component));
      if same_cycle {
        field.rust_type = field.rust_type.clone().with_boxed();
      }
    }
  }
}

/// Maps each record that sits on a cycle of inline references to its component index.
fn cyclic_components<'a>(records: impl Iterator<Item = &'a RecordDef>) -> BTreeMap<String, usize> {
  let mut graph = DiGraphMap::<&str, ()>::new();
  for record in records {
    graph.add_node(record.name.as_str());
    for name in record.fields.iter().filter_map(|field| field.rust_type.inline_name()) {
      graph.add_edge(record.name.as_str(), name, ());
    }
  }

  kosaraju_scc(&graph)
    .into_iter()
    .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
    .enumerate()
    .flat_map(|(index, scc)| scc.into_iter().map(move |name| (name.to_string(), index)))
    .collect()
}
