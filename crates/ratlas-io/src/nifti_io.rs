//! NIfTI reading and writing for labeled volumes.
//!
//! Labels are stored on disk in whatever numeric type the file declares;
//! on load they are truncated to integers, since one region is one
//! number. The voxel-to-world affine follows the standard NIfTI
//! precedence: sform, then qform, then pixdim scaling.

use std::path::Path;

use anyhow::{bail, Context, Result};
use nalgebra::Matrix4;
use ndarray::{Array3, ArrayD, Axis, Ix3};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use ratlas_core::{Affine, LabelVolume, VoxelGrid};

/// Read a labeled volume and its header.
///
/// Faux-4D images `(x, y, z, 1)` are squeezed down to 3D; a real fourth
/// dimension is an error.
pub fn read_label_volume<P: AsRef<Path>>(path: P) -> Result<(LabelVolume, NiftiHeader)> {
    let path = path.as_ref();
    let obj = ReaderOptions::new()
        .read_file(path)
        .with_context(|| format!("failed to read NIfTI file {}", path.display()))?;
    let header = obj.header().clone();
    let affine = affine_from_header(&header);

    let volume = obj.into_volume();
    let data = volume
        .into_ndarray::<f32>()
        .with_context(|| format!("failed to convert {} to an array", path.display()))?;
    let data = squeeze_to_3d(data, path)?;
    let data = data.mapv(|v| v as i32);

    Ok((LabelVolume::new(data, affine), header))
}

/// Read only the voxel grid of a volume, for use as a reference grid.
pub fn read_reference_grid<P: AsRef<Path>>(path: P) -> Result<VoxelGrid> {
    let path = path.as_ref();
    let obj = ReaderOptions::new()
        .read_file(path)
        .with_context(|| format!("failed to read NIfTI file {}", path.display()))?;
    let header = obj.header();
    if header.dim[0] < 3 {
        bail!(
            "reference {} must be at least 3D, found {} dimension(s)",
            path.display(),
            header.dim[0]
        );
    }
    let shape = [
        header.dim[1] as usize,
        header.dim[2] as usize,
        header.dim[3] as usize,
    ];
    Ok(VoxelGrid::new(shape, affine_from_header(header)))
}

/// Write a labeled volume, carrying over `reference_header` metadata.
///
/// The header's spatial fields are rewritten from the volume's affine so
/// a resampled volume does not ship with its source geometry.
pub fn write_label_volume<P: AsRef<Path>>(
    path: P,
    volume: &LabelVolume,
    reference_header: &NiftiHeader,
) -> Result<()> {
    let path = path.as_ref();
    let mut header = reference_header.clone();
    let m = volume.affine().matrix();
    header.srow_x = [
        m[(0, 0)] as f32,
        m[(0, 1)] as f32,
        m[(0, 2)] as f32,
        m[(0, 3)] as f32,
    ];
    header.srow_y = [
        m[(1, 0)] as f32,
        m[(1, 1)] as f32,
        m[(1, 2)] as f32,
        m[(1, 3)] as f32,
    ];
    header.srow_z = [
        m[(2, 0)] as f32,
        m[(2, 1)] as f32,
        m[(2, 2)] as f32,
        m[(2, 3)] as f32,
    ];
    header.sform_code = 1;
    header.qform_code = 0;
    for axis in 0..3 {
        let norm = (m[(0, axis)].powi(2) + m[(1, axis)].powi(2) + m[(2, axis)].powi(2)).sqrt();
        header.pixdim[axis + 1] = norm as f32;
    }

    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(volume.data())
        .map_err(|e| anyhow::anyhow!("failed to write NIfTI file {}: {}", path.display(), e))?;
    Ok(())
}

fn squeeze_to_3d(mut data: ArrayD<f32>, path: &Path) -> Result<Array3<f32>> {
    while data.ndim() > 3 {
        let last = data.ndim() - 1;
        if data.shape()[last] != 1 {
            bail!(
                "expected a 3D labeled volume, found {} dimensions in {}",
                data.ndim(),
                path.display()
            );
        }
        data = data.remove_axis(Axis(last));
    }
    if data.ndim() != 3 {
        bail!(
            "expected a 3D labeled volume, found {} dimensions in {}",
            data.ndim(),
            path.display()
        );
    }
    data.into_dimensionality::<Ix3>()
        .with_context(|| format!("failed to interpret {} as a 3D volume", path.display()))
}

/// Build the voxel-to-world affine from a NIfTI header.
fn affine_from_header(header: &NiftiHeader) -> Affine {
    if header.sform_code > 0 {
        let x = header.srow_x;
        let y = header.srow_y;
        let z = header.srow_z;
        Affine::from_matrix(Matrix4::new(
            x[0] as f64,
            x[1] as f64,
            x[2] as f64,
            x[3] as f64,
            y[0] as f64,
            y[1] as f64,
            y[2] as f64,
            y[3] as f64,
            z[0] as f64,
            z[1] as f64,
            z[2] as f64,
            z[3] as f64,
            0.0,
            0.0,
            0.0,
            1.0,
        ))
    } else if header.qform_code > 0 {
        qform_affine(header)
    } else {
        // Fallback: pixdim scaling only.
        Affine::scaling([
            header.pixdim[1] as f64,
            header.pixdim[2] as f64,
            header.pixdim[3] as f64,
        ])
    }
}

/// Reconstruct the rotation from the header's quaternion, per the NIfTI
/// standard.
fn qform_affine(header: &NiftiHeader) -> Affine {
    let b = header.quatern_b as f64;
    let c = header.quatern_c as f64;
    let d = header.quatern_d as f64;
    let a = (1.0 - (b * b + c * c + d * d).min(1.0)).sqrt();

    let qfac = if header.pixdim[0] == 0.0 {
        1.0
    } else {
        header.pixdim[0] as f64
    };

    let r11 = a * a + b * b - c * c - d * d;
    let r12 = 2.0 * b * c - 2.0 * a * d;
    let r13 = 2.0 * b * d + 2.0 * a * c;

    let r21 = 2.0 * b * c + 2.0 * a * d;
    let r22 = a * a + c * c - b * b - d * d;
    let r23 = 2.0 * c * d - 2.0 * a * b;

    let r31 = 2.0 * b * d - 2.0 * a * c;
    let r32 = 2.0 * c * d + 2.0 * a * b;
    let r33 = a * a + d * d - c * c - b * b;

    let dx = header.pixdim[1] as f64;
    let dy = header.pixdim[2] as f64;
    let dz = header.pixdim[3] as f64 * qfac;

    Affine::from_matrix(Matrix4::new(
        r11 * dx,
        r12 * dy,
        r13 * dz,
        header.quatern_x as f64,
        r21 * dx,
        r22 * dy,
        r23 * dz,
        header.quatern_y as f64,
        r31 * dx,
        r32 * dy,
        r33 * dz,
        header.quatern_z as f64,
        0.0,
        0.0,
        0.0,
        1.0,
    ))
}
