//! Solution output in gnuplot-friendly text.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use nalgebra::Point2;

use super::FiniteVolume;
use crate::error::{MeshError, Result};
use crate::flux::NumericalFlux;
use crate::mesh::{Circulator, MeshIndex, PolygonId, VertexId};
use crate::model::{ConservationLaw, StateVector};

/// Layout of a solution frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameFormat {
    /// One flat-shaded triangle per cell with the cell's primitive state.
    #[default]
    Cells,
    /// Triangles with the primitive state averaged at each vertex.
    Interpolated,
    /// First primitive component averaged at each vertex, one value per line.
    VertexValues,
}

impl<'m, M, F, I> FiniteVolume<'m, M, F, I>
where
    M: ConservationLaw,
    F: NumericalFlux<M>,
    I: MeshIndex,
{
    /// Primitive state at a vertex, averaged over the polygons around it.
    ///
    /// Fails with [`MeshError::IsolatedVertex`] if no polygon uses the vertex.
    pub fn vertex_average(&self, v: VertexId<I>) -> Result<M::State> {
        let mut sum = M::State::zeros();
        let mut count = 0usize;
        for p in self.mesh.vertex_polygons(v)? {
            sum += self.primitive(p);
            count += 1;
        }
        Ok(sum * (1.0 / count as f64))
    }

    /// Write the current solution to `writer`.
    ///
    /// The triangle layouts emit each triangle as a gnuplot surface patch: two
    /// rows of two points (the last vertex repeated) followed by two blank lines.
    /// They need a triangular mesh and fail with [`MeshError::InvalidParameter`]
    /// otherwise.
    pub fn write_frame<W: Write>(&self, writer: &mut W, format: FrameFormat) -> Result<()> {
        match format {
            FrameFormat::Cells => {
                self.require_triangles(format)?;
                for p in self.mesh.polygon_ids() {
                    let w = self.primitive(p);
                    let corners = self.triangle(p);
                    write_triangle(writer, &corners.map(|x| (x, w)))?;
                }
            }
            FrameFormat::Interpolated => {
                self.require_triangles(format)?;
                let averages = self
                    .mesh
                    .vertex_ids()
                    .map(|v| self.vertex_average(v))
                    .collect::<Result<Vec<_>>>()?;
                for p in self.mesh.polygon_ids() {
                    let mut circ = self.mesh.polygon_vertices(p);
                    let mut corners = [(Point2::origin(), M::State::zeros()); 3];
                    for corner in &mut corners {
                        let v = circ.current();
                        *corner = (*self.mesh.position(v), averages[v.index()]);
                        circ.advance();
                    }
                    write_triangle(writer, &corners)?;
                }
            }
            FrameFormat::VertexValues => {
                for v in self.mesh.vertex_ids() {
                    writeln!(writer, "{}", self.vertex_average(v)?[0])?;
                }
            }
        }
        Ok(())
    }

    /// Write the current solution to `dir/solutionNNNN.dat` and return the path.
    pub fn save_frame<P: AsRef<Path>>(
        &self,
        dir: P,
        id: usize,
        format: FrameFormat,
    ) -> Result<PathBuf> {
        fs::create_dir_all(dir.as_ref())?;
        let path = dir.as_ref().join(format!("solution{:04}.dat", id));
        let mut writer = BufWriter::new(File::create(&path)?);
        self.write_frame(&mut writer, format)?;
        writer.flush()?;
        log::debug!("wrote frame {} to {}", id, path.display());
        Ok(path)
    }

    fn require_triangles(&self, format: FrameFormat) -> Result<()> {
        if self.mesh.is_triangular() {
            Ok(())
        } else {
            Err(MeshError::invalid_param(
                "format",
                format!("{:?}", format),
                "triangle output needs a triangular mesh",
            ))
        }
    }

    fn triangle(&self, p: PolygonId<I>) -> [Point2<f64>; 3] {
        let mut circ = self.mesh.polygon_vertices(p);
        let mut corners = [Point2::origin(); 3];
        for corner in &mut corners {
            *corner = *self.mesh.position(circ.current());
            circ.advance();
        }
        corners
    }
}

fn write_point<W: Write, S: StateVector>(writer: &mut W, x: &Point2<f64>, w: &S) -> Result<()> {
    write!(writer, "{} {}", x.x, x.y)?;
    for value in w.as_slice() {
        write!(writer, " {}", value)?;
    }
    writeln!(writer)?;
    Ok(())
}

fn write_triangle<W: Write, S: StateVector>(
    writer: &mut W,
    corners: &[(Point2<f64>, S); 3],
) -> Result<()> {
    let [(x1, w1), (x2, w2), (x3, w3)] = corners;
    write_point(writer, x1, w1)?;
    write_point(writer, x2, w2)?;
    writeln!(writer)?;
    write_point(writer, x3, w3)?;
    write_point(writer, x3, w3)?;
    writeln!(writer)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flux::LaxFriedrichs;
    use crate::mesh::{build_from_polygons, PolygonalMesh};
    use crate::model::ShallowWater;
    use nalgebra::Vector3;

    fn two_triangles() -> PolygonalMesh {
        let positions = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        build_from_polygons(&positions, &[[0usize, 1, 2], [0, 2, 3]]).unwrap()
    }

    fn render(mesh: &PolygonalMesh, format: FrameFormat) -> Result<String> {
        let mut solver = FiniteVolume::new(ShallowWater::default(), LaxFriedrichs, mesh, |_, x, _| {
            Vector3::new(if x > 0.5 { 2.0 } else { 1.0 }, 0.0, 0.0)
        });
        solver.init();
        let mut out = Vec::new();
        solver.write_frame(&mut out, format)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_cells_layout() {
        let text = render(&two_triangles(), FrameFormat::Cells).unwrap();
        // The first triangle starts at the shared edge 2 -> 0
        let expected = "1 1 2 0 0\n0 0 2 0 0\n\n1 0 2 0 0\n1 0 2 0 0\n\n\n\
                        0 0 1 0 0\n1 1 1 0 0\n\n0 1 1 0 0\n0 1 1 0 0\n\n\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_vertex_values() {
        let text = render(&two_triangles(), FrameFormat::VertexValues).unwrap();
        let values: Vec<f64> = text.lines().map(|l| l.parse().unwrap()).collect();
        assert_eq!(values, vec![1.5, 2.0, 1.5, 1.0]);
    }

    #[test]
    fn test_interpolated_uses_vertex_averages() {
        let text = render(&two_triangles(), FrameFormat::Interpolated).unwrap();
        let first: Vec<&str> = text.lines().next().unwrap().split(' ').collect();
        assert_eq!(first, vec!["1", "1", "1.5", "0", "0"]);
    }

    #[test]
    fn test_triangle_formats_need_triangles() {
        let positions = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let mesh: PolygonalMesh = build_from_polygons(&positions, &[[0usize, 1, 2, 3]]).unwrap();
        let err = render(&mesh, FrameFormat::Cells).unwrap_err();
        assert!(matches!(err, MeshError::InvalidParameter { name: "format", .. }));
        assert!(render(&mesh, FrameFormat::VertexValues).is_ok());
    }

    #[test]
    fn test_save_frame_name() {
        let dir = tempfile::tempdir().unwrap();
        let mesh = two_triangles();
        let mut solver = FiniteVolume::new(ShallowWater::default(), LaxFriedrichs, &mesh, |_, _, _| {
            Vector3::new(1.0, 0.0, 0.0)
        });
        solver.init();
        let path = solver.save_frame(dir.path(), 7, FrameFormat::Cells).unwrap();
        assert!(path.ends_with("solution0007.dat"));
        assert!(path.exists());
    }
}
