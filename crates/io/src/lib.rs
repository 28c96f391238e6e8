#![forbid(unsafe_code)]

pub mod las;
pub mod pcd;
pub mod reference;
pub mod writer;

pub use self::las::read_labelled_las;
pub use pcd::{read_labelled_pcd, write_labelled_pcd, write_labelled_pcd_binary};
pub use reference::{read_reference_points, write_reference_points};
pub use writer::{
    read_pair_statistics, write_object_summaries, write_pair_statistics, write_presence,
    write_relations,
};

use spatialrel_core::LabelledCloud;
use std::io;
use std::path::Path;

/// Reads a labelled cloud, choosing the parser from the file extension
/// (`.pcd`, `.las`; anything else is rejected).
pub fn read_labelled_cloud(path: impl AsRef<Path>) -> io::Result<LabelledCloud> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pcd") => read_labelled_pcd(path),
        Some("las") => read_labelled_las(path),
        _ => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("unrecognized point cloud extension: {}", path.display()),
        )),
    }
}
