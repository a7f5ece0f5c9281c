//! Property tests for the dependency closure over random graphs.

use std::collections::HashSet;

use mtools_resolver::{Component, DependencyGraph, MainModule};
use mtools_sandbox::LibraryConventions;
use proptest::prelude::*;

/// Builds a graph of `size` components where component `i` may depend on any
/// component (cycles included) and on a few undeclared names.
fn build_graph(size: usize, edges: &[(usize, usize)], ghosts: &[usize]) -> DependencyGraph {
    let conventions = LibraryConventions::default();
    let mut graph = DependencyGraph::new(MainModule::default());

    for index in 0..size {
        let mut requires: Vec<String> = edges
            .iter()
            .filter(|(from, _)| *from == index)
            .map(|(_, to)| format!("material.components.c{to}"))
            .collect();
        if ghosts.contains(&index) {
            requires.push("material.components.ghost".to_string());
        }
        requires.push("ngAria".to_string());

        graph.insert(Component::from_registration(
            &format!("material.components.c{index}"),
            &requires,
            &conventions,
        ));
    }
    graph
}

/// Component indices reachable from `roots`, in preorder with dependencies
/// visited in declaration order.
fn reachable(size: usize, edges: &[(usize, usize)], roots: &[usize]) -> Vec<String> {
    fn visit(index: usize, size: usize, edges: &[(usize, usize)], seen: &mut Vec<usize>) {
        if index >= size || seen.contains(&index) {
            return;
        }
        seen.push(index);
        for (_, to) in edges.iter().filter(|(from, _)| *from == index) {
            visit(*to, size, edges, seen);
        }
    }

    let mut seen = Vec::new();
    for root in roots {
        visit(*root, size, edges, &mut seen);
    }
    seen.iter().map(|index| format!("c{index}")).collect()
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>, Vec<usize>)> {
    (1usize..12).prop_flat_map(|size| {
        (
            Just(size),
            prop::collection::vec((0..size, 0..size), 0..30),
            prop::collection::vec(0..size, 0..3),
        )
    })
}

proptest! {
    #[test]
    fn closure_contains_every_dependency(
        (size, edges, ghosts) in graph_strategy(),
        picks in prop::collection::vec(0usize..12, 0..4),
    ) {
        let graph = build_graph(size, &edges, &ghosts);
        let requested: Vec<String> = picks.iter().map(|pick| format!("c{pick}")).collect();
        let resolved = graph.resolve(&requested);

        let included: HashSet<&str> = resolved.flat().iter().map(String::as_str).collect();
        for name in resolved.flat() {
            let dependencies = resolved.dependencies_of(name).unwrap();
            for dependency in dependencies {
                prop_assert!(included.contains(dependency.as_str()));
            }
        }
        prop_assert!(!included.contains("ghost"));

        let expected: HashSet<String> = reachable(size, &edges, &picks).into_iter().collect();
        let included: HashSet<String> = included.into_iter().map(str::to_string).collect();
        prop_assert_eq!(included, expected);
    }

    #[test]
    fn closure_has_no_duplicates(
        (size, edges, ghosts) in graph_strategy(),
        picks in prop::collection::vec(0usize..12, 0..6),
    ) {
        let graph = build_graph(size, &edges, &ghosts);
        let requested: Vec<String> = picks.iter().map(|pick| format!("c{pick}")).collect();
        let resolved = graph.resolve(&requested);

        let flat: HashSet<&String> = resolved.flat().iter().collect();
        prop_assert_eq!(flat.len(), resolved.flat().len());

        let main: HashSet<&String> = resolved.main_module().dependencies.iter().collect();
        prop_assert_eq!(main.len(), resolved.main_module().dependencies.len());
        prop_assert_eq!(resolved.main_module().dependencies.len(), resolved.flat().len());
    }

    #[test]
    fn empty_request_walks_all_in_registration_order((size, edges, ghosts) in graph_strategy()) {
        let graph = build_graph(size, &edges, &ghosts);
        let resolved = graph.resolve::<String>(&[]);

        let roots: Vec<usize> = (0..size).collect();
        let expected = reachable(size, &edges, &roots);
        prop_assert_eq!(expected.len(), size);
        prop_assert_eq!(resolved.flat(), expected.as_slice());
    }

    #[test]
    fn requested_closure_is_a_preorder(
        (size, edges, ghosts) in graph_strategy(),
        picks in prop::collection::vec(0usize..12, 0..4),
    ) {
        let graph = build_graph(size, &edges, &ghosts);
        let requested: Vec<String> = picks.iter().map(|pick| format!("c{pick}")).collect();
        let resolved = graph.resolve(&requested);

        let expected = reachable(size, &edges, &picks);
        prop_assert_eq!(resolved.flat(), expected.as_slice());
    }

    #[test]
    fn requested_known_names_come_first(
        (size, edges, ghosts) in graph_strategy(),
        pick in 0usize..12,
    ) {
        let graph = build_graph(size, &edges, &ghosts);
        let name = format!("c{pick}");
        let resolved = graph.resolve(&[name.clone()]);

        if pick < size {
            prop_assert_eq!(resolved.flat().first(), Some(&name));
        } else {
            prop_assert!(resolved.flat().is_empty());
        }
    }
}
