//! Output of DG solutions.
//!
//! The core solver never touches the filesystem; results leave through an
//! [`OutputSink`]. [`VtuSink`] writes a numbered series of VTK XML
//! unstructured-grid files for ParaView.

mod vtk;

pub use vtk::{OutputError, OutputSink, VtuSink, series_path, write_vtu};
