mod common;

use pagodapath_lib::{build_graph, build_graph_with, haversine_km, GraphOptions};

use common::fixture_atlas;

#[test]
fn fixture_graph_links_every_pagoda() {
    let atlas = fixture_atlas();
    let graph = build_graph(&atlas);

    assert_eq!(graph.node_count(), atlas.len());
    // The Bagan core sites all sit within ~8 km of each other, so the
    // default 10 km threshold yields no isolated nodes.
    for &id in atlas.points.keys() {
        assert!(
            !graph.neighbours(id).is_empty(),
            "{:?} should have neighbours",
            atlas.point_name(id)
        );
    }
}

#[test]
fn edges_respect_threshold_and_carry_geodesic_weights() {
    let atlas = fixture_atlas();
    let options = GraphOptions { threshold_km: 3.0 };
    let graph = build_graph_with(&atlas, &options);

    for &id in atlas.points.keys() {
        let position = atlas.position(id).unwrap();
        for edge in graph.neighbours(id) {
            let expected = haversine_km(position, atlas.position(edge.target).unwrap());
            assert!(edge.distance <= 3.0);
            assert_eq!(edge.distance, expected);
        }
    }
}

#[test]
fn every_edge_has_a_mirror() {
    let atlas = fixture_atlas();
    let graph = build_graph_with(&atlas, &GraphOptions { threshold_km: 3.0 });

    for &id in atlas.points.keys() {
        for edge in graph.neighbours(id) {
            let mirror = graph
                .neighbours(edge.target)
                .iter()
                .find(|back| back.target == id)
                .expect("undirected edge has a mirror");
            assert_eq!(mirror.distance, edge.distance);
        }
    }
}

#[test]
fn tighter_threshold_never_adds_edges() {
    let atlas = fixture_atlas();
    let loose = build_graph_with(&atlas, &GraphOptions { threshold_km: 10.0 });
    let tight = build_graph_with(&atlas, &GraphOptions { threshold_km: 2.0 });

    assert!(tight.edge_count() <= loose.edge_count());
    for &id in atlas.points.keys() {
        for edge in tight.neighbours(id) {
            assert!(
                loose.neighbours(id).iter().any(|e| e.target == edge.target),
                "tight edge must exist in the loose graph"
            );
        }
    }
}
