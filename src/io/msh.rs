//! Sectioned text mesh format (`.msh`).
//!
//! A file is made of four sections, each introduced by a marker line:
//!
//! ```text
//! # DATA
//! <num vertices> <num polygons> <num boundary edges>
//! # POINTS
//! <x> <y>                              (one per vertex)
//! # ELEMENTS
//! <sides> <v0> <v1> ... <tag>          (one per polygon)
//! # EDGES
//! <v1> <v2> <tag>                      (one per boundary edge)
//! ```
//!
//! Markers are found by substring search, so anything else on a marker line (or any
//! line before it) is ignored. Values are whitespace separated and may be split across
//! lines freely. Vertex ids are zero-based.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::{FromStr, Lines, SplitWhitespace};

use crate::error::{MeshError, Result};
use crate::mesh::{Circulator, MeshIndex, PolygonalMesh, VertexId};

const DATA: &str = "# DATA";
const POINTS: &str = "# POINTS";
const ELEMENTS: &str = "# ELEMENTS";
const EDGES: &str = "# EDGES";

/// Options controlling how a mesh file is read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReaderOptions {
    /// Fail when an `# EDGES` entry matches no half-edge, instead of logging a
    /// warning and skipping it.
    pub strict_boundary_edges: bool,
}

impl ReaderOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict boundary edge matching.
    pub fn with_strict_boundary_edges(mut self, strict: bool) -> Self {
        self.strict_boundary_edges = strict;
        self
    }
}

/// Read a mesh from a `.msh` file.
pub fn read<P: AsRef<Path>, I: MeshIndex>(
    path: P,
    options: &ReaderOptions,
) -> Result<PolygonalMesh<I>> {
    let file = File::open(path.as_ref())?;
    read_from(BufReader::new(file), options)
}

/// Read a mesh from any reader.
pub fn read_from<R: Read, I: MeshIndex>(
    mut reader: R,
    options: &ReaderOptions,
) -> Result<PolygonalMesh<I>> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse(&content, options)
}

/// Parse a mesh from the text of a `.msh` file.
pub fn parse<I: MeshIndex>(content: &str, options: &ReaderOptions) -> Result<PolygonalMesh<I>> {
    let mut scanner = Scanner::new(content);

    scanner.seek(DATA)?;
    let num_vertices: usize = scanner.value("vertex count")?;
    let num_polygons: usize = scanner.value("polygon count")?;
    let num_edges: usize = scanner.value("edge count")?;

    // Header counts are untrusted; a vertex takes at least four bytes of text and a
    // polygon at least ten
    let mut mesh = PolygonalMesh::with_capacity(
        num_vertices.min(content.len() / 4),
        num_polygons.min(content.len() / 10),
    );

    scanner.seek(POINTS)?;
    for _ in 0..num_vertices {
        let x: f64 = scanner.value("x coordinate")?;
        let y: f64 = scanner.value("y coordinate")?;
        mesh.add_vertex(x, y)?;
    }

    scanner.seek(ELEMENTS)?;
    let mut ids: Vec<VertexId<I>> = Vec::with_capacity(4);
    for pi in 0..num_polygons {
        let sides: usize = scanner.value("side count")?;
        ids.clear();
        for _ in 0..sides {
            let vi: usize = scanner.value("vertex id")?;
            if vi >= num_vertices {
                return Err(MeshError::IndexOutOfRange {
                    polygon: pi,
                    vertex: vi,
                    len: num_vertices,
                });
            }
            ids.push(VertexId::new(vi));
        }
        let tag: usize = scanner.value("polygon tag")?;
        let p = mesh.add_polygon(&ids)?;
        mesh.set_polygon_tag(p, tag);
    }

    scanner.seek(EDGES)?;
    let mut unmatched = 0usize;
    for _ in 0..num_edges {
        let v1: usize = scanner.value("edge vertex")?;
        let v2: usize = scanner.value("edge vertex")?;
        let tag: usize = scanner.value("edge tag")?;
        for vi in [v1, v2] {
            if vi >= num_vertices {
                return Err(MeshError::parse(
                    scanner.line,
                    format!("edge vertex {} out of range ({} vertices)", vi, num_vertices),
                ));
            }
        }

        match mesh.find_halfedge(VertexId::new(v1), VertexId::new(v2)) {
            Some(he) => mesh.set_halfedge_tag(he, tag),
            None if options.strict_boundary_edges => {
                return Err(MeshError::UnmatchedBoundaryEdge { from: v1, to: v2 });
            }
            None => {
                log::warn!("boundary edge ({}, {}) matches no half-edge, skipped", v1, v2);
                unmatched += 1;
            }
        }
    }

    log::info!(
        "read mesh: {} vertices, {} polygons, {} boundary edges ({} unmatched), triangular: {}",
        mesh.num_vertices(),
        mesh.num_polygons(),
        num_edges,
        unmatched,
        mesh.is_triangular()
    );

    Ok(mesh)
}

/// Write a mesh to a `.msh` file.
pub fn write<P: AsRef<Path>, I: MeshIndex>(mesh: &PolygonalMesh<I>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_to(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh to any writer.
///
/// Polygons are written starting from their anchor vertex and every boundary
/// half-edge is listed under `# EDGES` with its tag.
pub fn write_to<W: Write, I: MeshIndex>(mesh: &PolygonalMesh<I>, writer: &mut W) -> Result<()> {
    let boundary: Vec<_> = mesh.boundary_halfedge_ids().collect();

    writeln!(writer, "{}", DATA)?;
    writeln!(
        writer,
        "{} {} {}",
        mesh.num_vertices(),
        mesh.num_polygons(),
        boundary.len()
    )?;

    writeln!(writer, "{}", POINTS)?;
    for (_, v) in mesh.vertices() {
        writeln!(writer, "{} {}", v.x(), v.y())?;
    }

    writeln!(writer, "{}", ELEMENTS)?;
    for (pid, p) in mesh.polygons() {
        write!(writer, "{}", p.sides())?;
        let mut circ = mesh.polygon_vertices(pid);
        loop {
            write!(writer, " {}", circ.current())?;
            circ.advance();
            if circ.at_start() {
                break;
            }
        }
        writeln!(writer, " {}", p.tag())?;
    }

    writeln!(writer, "{}", EDGES)?;
    for he in boundary {
        writeln!(
            writer,
            "{} {} {}",
            mesh.origin(he),
            mesh.dest(he),
            mesh.halfedge(he).tag()
        )?;
    }

    Ok(())
}

/// Whitespace tokenizer that can skip ahead to section markers.
struct Scanner<'a> {
    lines: std::iter::Enumerate<Lines<'a>>,
    tokens: SplitWhitespace<'a>,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines().enumerate(),
            tokens: "".split_whitespace(),
            line: 0,
        }
    }

    /// Skip to the first line after the next line containing `marker`.
    fn seek(&mut self, marker: &'static str) -> Result<()> {
        self.tokens = "".split_whitespace();
        for (i, line) in self.lines.by_ref() {
            if line.contains(marker) {
                self.line = i + 1;
                log::debug!("found section '{}' at line {}", marker, self.line);
                return Ok(());
            }
        }
        Err(MeshError::MissingSection { section: marker })
    }

    fn token(&mut self) -> Option<&'a str> {
        loop {
            if let Some(t) = self.tokens.next() {
                return Some(t);
            }
            let (i, line) = self.lines.next()?;
            self.line = i + 1;
            self.tokens = line.split_whitespace();
        }
    }

    fn value<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self.token().ok_or_else(|| {
            MeshError::parse(self.line, format!("expected {}, found end of file", what))
        })?;
        token
            .parse()
            .map_err(|_| MeshError::parse(self.line, format!("invalid {} '{}'", what, token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::NamedTempFile;

    /// Unit square split into two triangles, tagged edges on all four sides.
    const SQUARE: &str = "\
header comment
# DATA
4 2 4
# POINTS
0 0
1 0
1 1
0 1
# ELEMENTS
3 0 1 2 5
3 0 2 3
   6
# EDGES
0 1 10
2 1 11
2 3 12
3 0 13
";

    #[test]
    fn test_parse_square() {
        let mesh: PolygonalMesh = parse(SQUARE, &ReaderOptions::default()).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_polygons(), 2);
        assert!(mesh.is_triangular());
        assert_eq!(mesh.boundary_halfedge_ids().count(), 4);
        assert_relative_eq!(mesh.total_area(), 1.0);

        let tags: Vec<usize> = mesh.polygons().map(|(_, p)| p.tag()).collect();
        assert_eq!(tags, vec![5, 6]);

        let mut edge_tags: Vec<usize> = mesh
            .boundary_halfedge_ids()
            .map(|he| mesh.halfedge(he).tag())
            .collect();
        edge_tags.sort_unstable();
        assert_eq!(edge_tags, vec![10, 11, 12, 13]);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_missing_section() {
        let text = "# DATA\n1 0 0\n# POINTS\n0 0\n";
        let err = parse::<u32>(text, &ReaderOptions::default()).unwrap_err();
        assert!(matches!(err, MeshError::MissingSection { section: "# ELEMENTS" }));
    }

    #[test]
    fn test_bad_number() {
        let text = "# DATA\n2 0 0\n# POINTS\n0 0\n1 oops\n";
        let err = parse::<u32>(text, &ReaderOptions::default()).unwrap_err();
        match err {
            MeshError::Parse { line, message } => {
                assert_eq!(line, 5);
                assert!(message.contains("oops"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_vertex_out_of_range() {
        let text = "# DATA\n3 1 0\n# POINTS\n0 0\n1 0\n0 1\n# ELEMENTS\n3 0 1 3 0\n# EDGES\n";
        let err = parse::<u32>(text, &ReaderOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange { polygon: 0, vertex: 3, len: 3 }
        ));
    }

    #[test]
    fn test_huge_header_counts() {
        let text = "# DATA\n1000000000000000 1 0\n# POINTS\n0 0\n";
        let err = parse::<u32>(text, &ReaderOptions::default()).unwrap_err();
        match err {
            MeshError::Parse { line, message } => {
                assert_eq!(line, 4);
                assert!(message.contains("end of file"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_edge_vertex_out_of_range() {
        let text = "# DATA\n3 1 1\n# POINTS\n0 0\n1 0\n0 1\n# ELEMENTS\n3 0 1 2 0\n# EDGES\n0 7 1\n";
        let err = parse::<u32>(text, &ReaderOptions::default()).unwrap_err();
        match err {
            MeshError::Parse { line, message } => {
                assert_eq!(line, 10);
                assert!(message.contains("edge vertex 7 out of range"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_too_many_vertices_for_index_type() {
        let mut text = String::from("# DATA\n65537 0 0\n# POINTS\n");
        for k in 0..65_537 {
            text.push_str(&format!("{} 0\n", k));
        }
        text.push_str("# ELEMENTS\n# EDGES\n");

        let err = parse::<u16>(&text, &ReaderOptions::default()).unwrap_err();
        assert!(matches!(err, MeshError::CapacityExceeded { entity: "vertices", .. }));

        let mesh: PolygonalMesh = parse(&text, &ReaderOptions::default()).unwrap();
        assert_eq!(mesh.num_vertices(), 65_537);
    }

    #[test]
    fn test_unmatched_edge_lenient_and_strict() {
        let text = "# DATA\n4 1 1\n# POINTS\n0 0\n1 0\n0 1\n5 5\n# ELEMENTS\n3 0 1 2 0\n# EDGES\n0 3 1\n";

        let mesh: PolygonalMesh = parse(text, &ReaderOptions::default()).unwrap();
        assert!(mesh.halfedges().all(|(_, he)| he.tag() == 0));

        let strict = ReaderOptions::new().with_strict_boundary_edges(true);
        let err = parse::<u32>(text, &strict).unwrap_err();
        assert!(matches!(err, MeshError::UnmatchedBoundaryEdge { from: 0, to: 3 }));
    }

    #[test]
    fn test_file_round_trip() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SQUARE.as_bytes()).unwrap();

        let mesh: PolygonalMesh = read(file.path(), &ReaderOptions::default()).unwrap();

        let out = NamedTempFile::new().unwrap();
        write(&mesh, out.path()).unwrap();
        let strict = ReaderOptions::new().with_strict_boundary_edges(true);
        let again: PolygonalMesh = read(out.path(), &strict).unwrap();

        assert_eq!(again.num_vertices(), mesh.num_vertices());
        assert_eq!(again.num_polygons(), mesh.num_polygons());
        assert_eq!(again.boundary_halfedge_ids().count(), 4);
        for p in mesh.polygon_ids() {
            assert_eq!(again.polygon(p).tag(), mesh.polygon(p).tag());
            assert_relative_eq!(again.polygon_area(p), mesh.polygon_area(p));
        }
        let mut tags: Vec<usize> = again
            .boundary_halfedge_ids()
            .map(|he| again.halfedge(he).tag())
            .collect();
        tags.sort_unstable();
        assert_eq!(tags, vec![10, 11, 12, 13]);
    }
}
