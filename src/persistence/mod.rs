//! Typed, HDF5-backed persistence of mesh geometry and per-step snapshots.

pub mod records;

use crate::error::{Result, TdglError};
use crate::mesh::dual_mesh::DualMesh;
use crate::mesh::edge_mesh::EdgeMesh;
use crate::mesh::Mesh;
use crate::tdgl::TdglState;
use records::{RunState, RunningBuffers};
use std::path::Path;

/// Handle to an open HDF5 file, following the record layout in
/// SPEC_FULL.md §6.
pub struct DataHandler {
    file: hdf5::File,
}

impl DataHandler {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = hdf5::File::create(path.as_ref())
            .map_err(|e| TdglError::IoFailure(format!("failed to create {:?}: {}", path.as_ref(), e)))?;
        Ok(Self { file })
    }

    pub fn open_read_write(path: impl AsRef<Path>) -> Result<Self> {
        let file = hdf5::File::open_rw(path.as_ref())
            .map_err(|e| TdglError::IoFailure(format!("failed to open {:?}: {}", path.as_ref(), e)))?;
        Ok(Self { file })
    }

    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self> {
        let file = hdf5::File::open(path.as_ref())
            .map_err(|e| TdglError::IoFailure(format!("failed to open {:?}: {}", path.as_ref(), e)))?;
        Ok(Self { file })
    }

    /// `true` when `/mesh` already carries the fully-derived arrays
    /// (dual_mesh, edge_mesh, areas), i.e. the mesh need not be recomputed.
    pub fn is_restorable(&self) -> bool {
        self.file
            .group("mesh")
            .and_then(|g| g.group("edge_mesh"))
            .is_ok()
    }

    pub fn save_mesh(&self, mesh: &Mesh) -> Result<()> {
        if self.file.group("mesh").is_ok() {
            self.file
                .unlink("mesh")
                .map_err(|e| TdglError::IoFailure(format!("failed to replace /mesh: {}", e)))?;
        }
        let group = self
            .file
            .create_group("mesh")
            .map_err(|e| TdglError::IoFailure(format!("failed to create /mesh: {}", e)))?;

        write_f64(&group, "x", &mesh.x)?;
        write_f64(&group, "y", &mesh.y)?;
        write_elements(&group, &mesh.elements)?;
        write_usize(&group, "boundary_indices", &mesh.boundary_indices)?;
        write_f64(&group, "areas", &mesh.areas)?;

        if let Some(vp) = mesh.voltage_points {
            write_usize(&group, "voltage_points", &vp)?;
        }
        if let Some(edge) = mesh.input_edge {
            write_f64(&group, "input_edge", &edge)?;
        }
        if let Some(edge) = mesh.output_edge {
            write_f64(&group, "output_edge", &edge)?;
        }

        let dual = group
            .create_group("dual_mesh")
            .map_err(|e| TdglError::IoFailure(format!("failed to create /mesh/dual_mesh: {}", e)))?;
        write_f64(&dual, "x", &mesh.dual_mesh.x)?;
        write_f64(&dual, "y", &mesh.dual_mesh.y)?;

        let edge_mesh = group
            .create_group("edge_mesh")
            .map_err(|e| TdglError::IoFailure(format!("failed to create /mesh/edge_mesh: {}", e)))?;
        let (eu, ev): (Vec<usize>, Vec<usize>) = mesh.edge_mesh.edges.iter().map(|&(u, v)| (u, v)).unzip();
        write_usize(&edge_mesh, "edges_u", &eu)?;
        write_usize(&edge_mesh, "edges_v", &ev)?;
        write_usize(
            &edge_mesh,
            "boundary_edge_indices",
            &mesh.edge_mesh.boundary_edge_indices,
        )?;
        write_f64(&edge_mesh, "x", &mesh.edge_mesh.x)?;
        write_f64(&edge_mesh, "y", &mesh.edge_mesh.y)?;
        write_f64(&edge_mesh, "edge_lengths", &mesh.edge_mesh.edge_lengths)?;
        write_f64(&edge_mesh, "dual_edge_lengths", &mesh.edge_mesh.dual_edge_lengths)?;

        Ok(())
    }

    /// Load a mesh, recomputing derived arrays from `(x, y, elements)` when
    /// the file only carries the raw triangulation.
    pub fn load_mesh(&self) -> Result<Mesh> {
        let group = self
            .file
            .group("mesh")
            .map_err(|e| TdglError::IoFailure(format!("missing /mesh group: {}", e)))?;

        let x = read_f64(&group, "x")?;
        let y = read_f64(&group, "y")?;
        let elements = read_elements(&group)?;

        if !self.is_restorable() {
            return Mesh::from_triangulation(x, y, elements);
        }

        let boundary_indices = read_usize(&group, "boundary_indices")?;
        let areas = read_f64(&group, "areas")?;
        let dual = group
            .group("dual_mesh")
            .map_err(|e| TdglError::IoFailure(format!("missing /mesh/dual_mesh: {}", e)))?;
        let dual_mesh = DualMesh {
            x: read_f64(&dual, "x")?,
            y: read_f64(&dual, "y")?,
        };

        let edge_group = group
            .group("edge_mesh")
            .map_err(|e| TdglError::IoFailure(format!("missing /mesh/edge_mesh: {}", e)))?;
        let eu = read_usize(&edge_group, "edges_u")?;
        let ev = read_usize(&edge_group, "edges_v")?;
        let edges: Vec<(usize, usize)> = eu.into_iter().zip(ev.into_iter()).collect();
        let directions: Vec<(f64, f64)> = edges.iter().map(|&(u, v)| (x[v] - x[u], y[v] - y[u])).collect();
        let edge_mesh = EdgeMesh {
            edges,
            boundary_edge_indices: read_usize(&edge_group, "boundary_edge_indices")?,
            x: read_f64(&edge_group, "x")?,
            y: read_f64(&edge_group, "y")?,
            directions,
            edge_lengths: read_f64(&edge_group, "edge_lengths")?,
            dual_edge_lengths: read_f64(&edge_group, "dual_edge_lengths")?,
        };

        let voltage_points = read_usize(&group, "voltage_points").ok().and_then(|v| {
            if v.len() == 2 {
                Some([v[0], v[1]])
            } else {
                None
            }
        });
        let input_edge = read_f64(&group, "input_edge").ok().and_then(to_rect);
        let output_edge = read_f64(&group, "output_edge").ok().and_then(to_rect);

        Ok(Mesh {
            x,
            y,
            elements,
            boundary_indices,
            areas,
            dual_mesh,
            edge_mesh,
            voltage_points,
            input_edge,
            output_edge,
        })
    }

    pub fn save_disorder(&self, alpha: &[f64]) -> Result<()> {
        let group = self
            .file
            .create_group("disorder")
            .map_err(|e| TdglError::IoFailure(format!("failed to create /disorder: {}", e)))?;
        write_f64(&group, "alpha", alpha)
    }

    pub fn load_disorder(&self) -> Result<Option<Vec<f64>>> {
        match self.file.group("disorder") {
            Ok(group) => Ok(Some(read_f64(&group, "alpha")?)),
            Err(_) => Ok(None),
        }
    }

    /// Write one snapshot record. `a` is only written once, at step 0.
    pub fn save_time_step(
        &self,
        run_state: &RunState,
        fields: &TdglState,
        a: Option<&[(f64, f64)]>,
        running: &RunningBuffers,
    ) -> Result<()> {
        let path = format!("/data/{}", run_state.step);
        let group = self
            .file
            .create_group(&path)
            .map_err(|e| TdglError::IoFailure(format!("failed to create {}: {}", path, e)))?;

        let psi_re: Vec<f64> = fields.psi.iter().map(|p| p.re).collect();
        let psi_im: Vec<f64> = fields.psi.iter().map(|p| p.im).collect();
        write_f64(&group, "psi_re", &psi_re)?;
        write_f64(&group, "psi_im", &psi_im)?;
        write_f64(&group, "mu", &fields.mu)?;
        write_f64(&group, "supercurrent", &fields.supercurrent)?;
        write_f64(&group, "normal_current", &fields.normal_current)?;

        if let Some(a) = a {
            let ax: Vec<f64> = a.iter().map(|v| v.0).collect();
            let ay: Vec<f64> = a.iter().map(|v| v.1).collect();
            write_f64(&group, "a_x", &ax)?;
            write_f64(&group, "a_y", &ay)?;
        }

        if run_state.step != 0 {
            write_f64(&group, "voltage", &running.voltage)?;
            write_f64(&group, "current", &running.current)?;
        }

        write_attr(&group, "step", run_state.step as f64)?;
        write_attr(&group, "time", run_state.time)?;
        write_attr(&group, "dt", run_state.dt)?;
        write_attr(&group, "current", run_state.current)?;
        write_attr(&group, "flow", run_state.flow)?;
        write_attr(&group, "magnetic_field", run_state.magnetic_field)?;
        write_attr(&group, "u", run_state.complex_time_scale)?;
        write_attr(&group, "gamma", run_state.gamma)?;

        Ok(())
    }

    pub fn close(self) -> Result<()> {
        self.file
            .close()
            .map_err(|e| TdglError::IoFailure(format!("failed to close file: {}", e)))
    }
}

fn to_rect(v: Vec<f64>) -> Option<[f64; 4]> {
    if v.len() == 4 {
        Some([v[0], v[1], v[2], v[3]])
    } else {
        None
    }
}

fn write_f64(group: &hdf5::Group, name: &str, data: &[f64]) -> Result<()> {
    group
        .new_dataset_builder()
        .with_data(data)
        .create(name)
        .map(|_| ())
        .map_err(|e| TdglError::IoFailure(format!("failed to write {}: {}", name, e)))
}

fn write_usize(group: &hdf5::Group, name: &str, data: &[usize]) -> Result<()> {
    let data: Vec<u64> = data.iter().map(|&v| v as u64).collect();
    group
        .new_dataset_builder()
        .with_data(&data)
        .create(name)
        .map(|_| ())
        .map_err(|e| TdglError::IoFailure(format!("failed to write {}: {}", name, e)))
}

fn write_elements(group: &hdf5::Group, elements: &[[usize; 3]]) -> Result<()> {
    let flat: Vec<u64> = elements.iter().flat_map(|t| t.iter().map(|&v| v as u64)).collect();
    group
        .new_dataset_builder()
        .with_data(&flat)
        .shape((elements.len(), 3))
        .create("elements")
        .map(|_| ())
        .map_err(|e| TdglError::IoFailure(format!("failed to write elements: {}", e)))
}

fn write_attr(group: &hdf5::Group, name: &str, value: f64) -> Result<()> {
    group
        .new_attr::<f64>()
        .create(name)
        .and_then(|attr| attr.write_scalar(&value))
        .map_err(|e| TdglError::IoFailure(format!("failed to write attribute {}: {}", name, e)))
}

fn read_f64(group: &hdf5::Group, name: &str) -> Result<Vec<f64>> {
    group
        .dataset(name)
        .and_then(|d| d.read_raw::<f64>())
        .map_err(|e| TdglError::IoFailure(format!("failed to read {}: {}", name, e)))
}

fn read_usize(group: &hdf5::Group, name: &str) -> Result<Vec<usize>> {
    group
        .dataset(name)
        .and_then(|d| d.read_raw::<u64>())
        .map(|v| v.into_iter().map(|x| x as usize).collect())
        .map_err(|e| TdglError::IoFailure(format!("failed to read {}: {}", name, e)))
}

/// Read the `elements` dataset, transposing a column-major `(3, T)` layout
/// (as some external meshing tools write) into this crate's row-major
/// `(T, 3)` form. The layout is taken from the dataset's declared shape,
/// not assumed.
fn read_elements(group: &hdf5::Group) -> Result<Vec<[usize; 3]>> {
    let dataset = group
        .dataset("elements")
        .map_err(|e| TdglError::IoFailure(format!("failed to read elements: {}", e)))?;
    let shape = dataset.shape();
    let flat: Vec<u64> = dataset
        .read_raw::<u64>()
        .map_err(|e| TdglError::IoFailure(format!("failed to read elements: {}", e)))?;
    if flat.len() % 3 != 0 {
        return Err(TdglError::InvalidMesh(
            "elements dataset length is not a multiple of 3".into(),
        ));
    }
    let num_triangles = flat.len() / 3;
    let flat: Vec<usize> = flat.into_iter().map(|v| v as usize).collect();

    let is_column_major = shape.len() == 2 && shape[0] == 3 && shape[1] != 3;
    if is_column_major {
        Ok(Mesh::transpose_elements(&flat, num_triangles))
    } else {
        Ok(flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
    }
}
