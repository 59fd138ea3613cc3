//! Topological invariants of meshes built by stitching polygons.
//!
//! Every mesh here is checked for twin symmetry, closed polygon cycles and a
//! consistent boundary, whatever the order in which its polygons were added.

use conslaw2d::io::{self, ReaderOptions};
use conslaw2d::prelude::*;
use nalgebra::Point2;

/// `nx x ny` grid on the unit square mixing quads and split quads.
fn mixed_grid(nx: usize, ny: usize) -> (Vec<Point2<f64>>, Vec<Vec<usize>>) {
    let mut positions = Vec::new();
    for j in 0..=ny {
        for i in 0..=nx {
            positions.push(Point2::new(i as f64 / nx as f64, j as f64 / ny as f64));
        }
    }

    let mut polygons = Vec::new();
    for j in 0..ny {
        for i in 0..nx {
            let v00 = j * (nx + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + nx + 1;
            let v11 = v01 + 1;
            if (i + j) % 2 == 0 {
                polygons.push(vec![v00, v10, v11, v01]);
            } else {
                polygons.push(vec![v00, v10, v11]);
                polygons.push(vec![v00, v11, v01]);
            }
        }
    }
    (positions, polygons)
}

/// Deterministic shuffle so the insertion order is far from the natural one.
fn scrambled<T: Clone>(items: &[T]) -> Vec<T> {
    let n = items.len();
    let mut order: Vec<usize> = (0..n).collect();
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    for i in (1..n).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let j = (state % (i as u64 + 1)) as usize;
        order.swap(i, j);
    }
    order.into_iter().map(|i| items[i].clone()).collect()
}

fn assert_invariants(mesh: &PolygonalMesh) {
    assert!(mesh.is_valid());

    for he in mesh.halfedge_ids() {
        if let Some(t) = mesh.twin(he) {
            assert_eq!(mesh.twin(t), Some(he));
            assert_eq!(mesh.origin(t), mesh.dest(he));
            assert_eq!(mesh.dest(t), mesh.origin(he));
            assert_ne!(mesh.left_polygon(t), mesh.left_polygon(he));
        } else {
            assert!(mesh.right_polygon(he).is_err());
        }
    }

    for p in mesh.polygon_ids() {
        let start = mesh.polygon(p).halfedge();
        let mut he = start;
        for _ in 0..mesh.polygon_sides(p) {
            assert_eq!(mesh.left_polygon(he), p);
            he = mesh.next(he);
        }
        assert_eq!(he, start);
        assert_eq!(mesh.polygon_halfedges(p).into_iter().count(), mesh.polygon_sides(p));
    }
}

#[test]
fn test_grid_invariants_any_order() {
    let (positions, polygons) = mixed_grid(6, 5);
    let natural: PolygonalMesh = build_from_polygons(&positions, &polygons).unwrap();
    let shuffled: PolygonalMesh = build_from_polygons(&positions, &scrambled(&polygons)).unwrap();

    for mesh in [&natural, &shuffled] {
        assert_invariants(mesh);
        assert!(!mesh.is_triangular());
        assert_eq!(mesh.boundary_halfedge_ids().count(), 2 * (6 + 5));
        assert!((mesh.total_area() - 1.0).abs() < 1e-12);
        assert_eq!(mesh.stats().num_degenerate_vertices, 0);
    }
    assert_eq!(natural.num_halfedges(), shuffled.num_halfedges());
}

#[test]
fn test_polygon_vertices_reproduce_input() {
    let (positions, polygons) = mixed_grid(5, 3);
    let order = scrambled(&polygons);
    let mesh: PolygonalMesh = build_from_polygons(&positions, &order).unwrap();

    for (p, input) in mesh.polygon_ids().zip(&order) {
        let ids: Vec<usize> = mesh.polygon_vertex_ids(p).iter().map(|v| v.index()).collect();
        assert_eq!(ids.len(), input.len());

        // Same cycle, possibly starting elsewhere
        let shift = input.iter().position(|&v| v == ids[0]).unwrap();
        let rotated: Vec<usize> = input[shift..].iter().chain(&input[..shift]).copied().collect();
        assert_eq!(ids, rotated);
    }
}

#[test]
fn test_interior_vertices_are_closed_fans() {
    let (positions, polygons) = mixed_grid(4, 4);
    let mesh: PolygonalMesh = build_from_polygons(&positions, &scrambled(&polygons)).unwrap();

    for v in mesh.vertex_ids() {
        let p = mesh.position(v);
        let on_border = p.x == 0.0 || p.x == 1.0 || p.y == 0.0 || p.y == 1.0;
        assert_eq!(mesh.is_boundary_vertex(v), on_border, "vertex {:?}", v);

        let polygons = mesh.vertex_polygons(v).unwrap().into_iter().count();
        let neighbours = mesh.vertex_vertices(v).unwrap().into_iter().count();
        if on_border {
            assert_eq!(neighbours, polygons + 1);
        } else {
            assert_eq!(neighbours, polygons);
        }
    }
}

#[test]
fn test_squares_touching_at_a_corner() {
    let mut mesh: PolygonalMesh = PolygonalMesh::new();
    let ids: Vec<_> = [
        (0.0, 0.0),
        (1.0, 0.0),
        (1.0, 1.0),
        (0.0, 1.0),
        (2.0, 1.0),
        (2.0, 2.0),
        (1.0, 2.0),
    ]
    .iter()
    .map(|&(x, y)| mesh.add_vertex(x, y).unwrap())
    .collect();

    mesh.add_polygon(&[ids[0], ids[1], ids[2], ids[3]]).unwrap();
    mesh.add_polygon(&[ids[2], ids[4], ids[5], ids[6]]).unwrap();

    assert_invariants(&mesh);
    let corner = ids[2];
    assert!(mesh.vertex(corner).is_degenerate());
    assert_eq!(mesh.stats().num_degenerate_vertices, 1);

    let mut neighbours: Vec<_> = mesh.vertex_vertices(corner).unwrap().into_iter().collect();
    neighbours.sort();
    assert_eq!(neighbours, vec![ids[1], ids[3], ids[4], ids[6]]);
    assert_eq!(mesh.vertex_polygons(corner).unwrap().into_iter().count(), 2);
    assert!(mesh.polygon_polygons(PolygonId::new(0)).is_err());

    // Filling the gap on one side joins the two fans
    let bridge = mesh.add_vertex(2.0, 0.0).unwrap();
    mesh.add_polygon(&[ids[1], bridge, ids[4], ids[2]]).unwrap();
    assert_invariants(&mesh);
    assert!(!mesh.vertex(corner).is_degenerate());
    assert_eq!(mesh.vertex_polygons(corner).unwrap().into_iter().count(), 3);
}

#[test]
fn test_msh_round_trip_keeps_topology() {
    let (positions, polygons) = mixed_grid(3, 2);
    let mut mesh: PolygonalMesh = build_from_polygons(&positions, &polygons).unwrap();
    for (k, he) in mesh.boundary_halfedge_ids().collect::<Vec<_>>().into_iter().enumerate() {
        mesh.set_halfedge_tag(he, 10 + k % 3);
    }
    for p in mesh.polygon_ids().collect::<Vec<_>>() {
        mesh.set_polygon_tag(p, p.index() % 2);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.msh");
    io::save(&mesh, &path).unwrap();

    let options = ReaderOptions::new().with_strict_boundary_edges(true);
    let again: PolygonalMesh = io::load_with(&path, &options).unwrap();

    assert_invariants(&again);
    assert_eq!(again.num_vertices(), mesh.num_vertices());
    assert_eq!(again.num_polygons(), mesh.num_polygons());
    assert_eq!(again.num_halfedges(), mesh.num_halfedges());

    for p in mesh.polygon_ids() {
        assert_eq!(again.polygon(p).tag(), mesh.polygon(p).tag());
        assert!((again.polygon_area(p) - mesh.polygon_area(p)).abs() < 1e-12);
    }
    let tags = |m: &PolygonalMesh| {
        let mut t: Vec<_> = m
            .boundary_halfedge_ids()
            .map(|he| (m.origin(he), m.dest(he), m.halfedge(he).tag()))
            .collect();
        t.sort();
        t
    };
    assert_eq!(tags(&again), tags(&mesh));
}
