pub mod lut_io;
pub mod nifti_io;

pub use lut_io::{read_lookup_table, write_lookup_table};
pub use nifti_io::{read_label_volume, read_reference_grid, write_label_volume};
