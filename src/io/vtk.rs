//! VTK output for DG solutions.
//!
//! Provides VTU (XML UnstructuredGrid) output for visualization in ParaView
//! and other VTK-compatible tools.
//!
//! # High-Order Visualization
//!
//! A cell of order p has (p+1)² support points. Each support point becomes a
//! VTK point and each cell is split into p² sub-quads, so the nodal values are
//! shown without resampling. Order 0 cells are written as a single quad on the
//! cell vertices carrying the cell value.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::fe::NodalBasis;
use crate::mesh::MeshGeometry;
use crate::solver::Solution;

/// VTK cell type id of a linear quadrilateral.
const VTK_QUAD: u8 = 9;

/// Error type for output operations.
#[derive(Debug, Error)]
pub enum OutputError {
    /// I/O error during file operations.
    #[error("VTK I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Solution does not fit the mesh and basis it is written with.
    #[error("Invalid solution: {0}")]
    InvalidSolution(String),
}

/// Destination for solution snapshots.
pub trait OutputSink {
    /// Write one snapshot of `solution` under the point-data name `field_name`.
    fn write<M: MeshGeometry>(
        &mut self,
        mesh: &M,
        basis: &NodalBasis,
        solution: &Solution,
        field_name: &str,
    ) -> Result<(), OutputError>;
}

/// Writes `{prefix}_{index:04}.vtu` files into a directory.
#[derive(Clone, Debug)]
pub struct VtuSink {
    directory: PathBuf,
    prefix: String,
    next_index: usize,
}

impl VtuSink {
    /// Sink writing into `directory`, which is created on the first write.
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
            next_index: 0,
        }
    }

    /// Number of files written so far.
    pub fn files_written(&self) -> usize {
        self.next_index
    }

    /// Path the next snapshot will be written to.
    pub fn next_path(&self) -> PathBuf {
        series_path(&self.directory, &self.prefix, self.next_index)
    }
}

impl OutputSink for VtuSink {
    fn write<M: MeshGeometry>(
        &mut self,
        mesh: &M,
        basis: &NodalBasis,
        solution: &Solution,
        field_name: &str,
    ) -> Result<(), OutputError> {
        fs::create_dir_all(&self.directory)?;
        let path = self.next_path();
        let file = File::create(&path)?;
        write_vtu(file, mesh, basis, solution, field_name)?;
        debug!(path = %path.display(), "wrote VTU snapshot");
        self.next_index += 1;
        Ok(())
    }
}

/// Path of snapshot `index` in a numbered series.
pub fn series_path(directory: impl AsRef<Path>, prefix: &str, index: usize) -> PathBuf {
    directory
        .as_ref()
        .join(format!("{}_{:04}.vtu", prefix, index))
}

/// Internal mesh representation for VTK output.
struct VtkMesh {
    /// Physical coordinates of all points (x, y).
    points: Vec<(f64, f64)>,
    /// Value of the field at each point.
    values: Vec<f64>,
    /// Sub-cell connectivity (4 point indices per quad).
    cells: Vec<[usize; 4]>,
    /// Original DG cell index for each sub-cell.
    cell_ids: Vec<usize>,
}

/// Build the VTK point set from the DG mesh with sub-cell decomposition.
fn build_vtk_mesh<M: MeshGeometry>(mesh: &M, basis: &NodalBasis, solution: &Solution) -> VtkMesh {
    let n_cells = mesh.n_cells();
    let n_1d = basis.n_1d();

    if n_1d == 1 {
        let mut vtk = VtkMesh {
            points: Vec::with_capacity(4 * n_cells),
            values: Vec::with_capacity(4 * n_cells),
            cells: Vec::with_capacity(n_cells),
            cell_ids: (0..n_cells).collect(),
        };
        for k in 0..n_cells {
            let base = vtk.points.len();
            vtk.points.extend(mesh.cell_vertices(k));
            vtk.values.extend([solution.cell(k)[0]; 4]);
            // Lexicographic vertices to counter-clockwise order
            vtk.cells.push([base, base + 1, base + 3, base + 2]);
        }
        return vtk;
    }

    let n_dofs = basis.dofs_per_cell();
    let n_sub = (n_1d - 1) * (n_1d - 1);
    let mut vtk = VtkMesh {
        points: Vec::with_capacity(n_cells * n_dofs),
        values: Vec::with_capacity(n_cells * n_dofs),
        cells: Vec::with_capacity(n_cells * n_sub),
        cell_ids: Vec::with_capacity(n_cells * n_sub),
    };

    for k in 0..n_cells {
        let base = k * n_dofs;
        for i in 0..n_dofs {
            let (r, s) = basis.support_point(i);
            vtk.points.push(mesh.reference_to_physical(k, r, s));
        }
        vtk.values.extend_from_slice(solution.cell(k));

        // Node layout for n_1d = 3:
        // 6---7---8
        // |   |   |
        // 3---4---5
        // |   |   |
        // 0---1---2
        for j in 0..(n_1d - 1) {
            for i in 0..(n_1d - 1) {
                let v0 = base + j * n_1d + i;
                let v1 = v0 + 1;
                let v2 = base + (j + 1) * n_1d + i + 1;
                let v3 = v2 - 1;
                vtk.cells.push([v0, v1, v2, v3]);
                vtk.cell_ids.push(k);
            }
        }
    }
    vtk
}

/// VTK XML writer helper.
struct VtkWriter<W: Write> {
    writer: BufWriter<W>,
    indent: usize,
}

impl<W: Write> VtkWriter<W> {
    fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            indent: 0,
        }
    }

    fn write_indent(&mut self) -> std::io::Result<()> {
        for _ in 0..self.indent {
            write!(self.writer, "  ")?;
        }
        Ok(())
    }

    fn write_header(&mut self) -> std::io::Result<()> {
        writeln!(self.writer, "<?xml version=\"1.0\"?>")?;
        writeln!(
            self.writer,
            "<VTKFile type=\"UnstructuredGrid\" version=\"0.1\" byte_order=\"LittleEndian\">"
        )?;
        self.indent += 1;
        Ok(())
    }

    fn write_footer(&mut self) -> std::io::Result<()> {
        self.indent -= 1;
        writeln!(self.writer, "</VTKFile>")?;
        self.writer.flush()
    }

    fn start_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> std::io::Result<()> {
        self.write_indent()?;
        write!(self.writer, "<{}", name)?;
        for (key, value) in attrs {
            write!(self.writer, " {}=\"{}\"", key, value)?;
        }
        writeln!(self.writer, ">")?;
        self.indent += 1;
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> std::io::Result<()> {
        self.indent -= 1;
        self.write_indent()?;
        writeln!(self.writer, "</{}>", name)
    }

    /// Write a DataArray body, breaking the line every `per_line` values.
    fn write_values<T: std::fmt::Display>(
        &mut self,
        header: &str,
        data: &[T],
        per_line: usize,
    ) -> std::io::Result<()> {
        self.write_indent()?;
        writeln!(self.writer, "{}", header)?;

        self.indent += 1;
        self.write_indent()?;
        for (i, v) in data.iter().enumerate() {
            write!(self.writer, "{}", v)?;
            if i + 1 < data.len() {
                if (i + 1) % per_line == 0 {
                    writeln!(self.writer)?;
                    self.write_indent()?;
                } else {
                    write!(self.writer, " ")?;
                }
            }
        }
        writeln!(self.writer)?;
        self.indent -= 1;

        self.write_indent()?;
        writeln!(self.writer, "</DataArray>")
    }

    fn write_points(&mut self, points: &[(f64, f64)]) -> std::io::Result<()> {
        self.start_element("Points", &[])?;
        let coords: Vec<String> = points
            .iter()
            .map(|&(x, y)| format!("{:.10e} {:.10e} 0.0", x, y))
            .collect();
        self.write_values(
            "<DataArray type=\"Float64\" NumberOfComponents=\"3\" format=\"ascii\">",
            &coords,
            2,
        )?;
        self.end_element("Points")
    }

    fn write_cells(&mut self, cells: &[[usize; 4]]) -> std::io::Result<()> {
        self.start_element("Cells", &[])?;

        let connectivity: Vec<usize> = cells.iter().flatten().copied().collect();
        self.write_values(
            "<DataArray type=\"Int32\" Name=\"connectivity\" format=\"ascii\">",
            &connectivity,
            20,
        )?;

        // Cumulative vertex count
        let offsets: Vec<usize> = (1..=cells.len()).map(|i| 4 * i).collect();
        self.write_values(
            "<DataArray type=\"Int32\" Name=\"offsets\" format=\"ascii\">",
            &offsets,
            20,
        )?;

        let types = vec![VTK_QUAD; cells.len()];
        self.write_values(
            "<DataArray type=\"UInt8\" Name=\"types\" format=\"ascii\">",
            &types,
            20,
        )?;

        self.end_element("Cells")
    }

    fn write_scalar(&mut self, name: &str, data: &[f64]) -> std::io::Result<()> {
        let formatted: Vec<String> = data.iter().map(|v| format!("{:.10e}", v)).collect();
        let header = format!(
            "<DataArray type=\"Float64\" Name=\"{}\" format=\"ascii\">",
            name
        );
        self.write_values(&header, &formatted, 6)
    }
}

/// Write a single VTU document for `solution` to `writer`.
///
/// Point data holds the field under `field_name`; cell data holds the index
/// of the DG cell each sub-quad belongs to.
pub fn write_vtu<W, M>(
    writer: W,
    mesh: &M,
    basis: &NodalBasis,
    solution: &Solution,
    field_name: &str,
) -> Result<(), OutputError>
where
    W: Write,
    M: MeshGeometry,
{
    if solution.n_cells != mesh.n_cells() || solution.dofs_per_cell != basis.dofs_per_cell() {
        return Err(OutputError::InvalidSolution(format!(
            "solution has {} cells × {} dofs, mesh and basis need {} × {}",
            solution.n_cells,
            solution.dofs_per_cell,
            mesh.n_cells(),
            basis.dofs_per_cell()
        )));
    }

    let vtk_mesh = build_vtk_mesh(mesh, basis, solution);
    let mut writer = VtkWriter::new(writer);

    let n_points = vtk_mesh.points.len().to_string();
    let n_cells = vtk_mesh.cells.len().to_string();

    writer.write_header()?;
    writer.start_element("UnstructuredGrid", &[])?;
    writer.start_element(
        "Piece",
        &[("NumberOfPoints", &n_points), ("NumberOfCells", &n_cells)],
    )?;

    writer.write_points(&vtk_mesh.points)?;
    writer.write_cells(&vtk_mesh.cells)?;

    writer.start_element("PointData", &[("Scalars", field_name)])?;
    writer.write_scalar(field_name, &vtk_mesh.values)?;
    writer.end_element("PointData")?;

    writer.start_element("CellData", &[])?;
    let ids: Vec<f64> = vtk_mesh.cell_ids.iter().map(|&k| k as f64).collect();
    writer.write_scalar("cell_id", &ids)?;
    writer.end_element("CellData")?;

    writer.end_element("Piece")?;
    writer.end_element("UnstructuredGrid")?;
    writer.write_footer()?;
    Ok(())
}
