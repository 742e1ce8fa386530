use std::io::{self, Write};
use std::path::Path;

use stlview::math::Vec3;
use stlview::mesh::StlMesh;
use stlview::stl::{LoadResult, LoadStatus};

fn vec3(v: Vec3) -> String {
    let [x, y, z] = v.to_array();
    format!("({x:.4}, {y:.4}, {z:.4})")
}

/// Writes one file's outcome: the mesh summary, or the status and error string.
pub fn write<W: Write>(out: &mut W, path: &Path, result: &LoadResult<StlMesh>) -> io::Result<()> {
    let mesh = match result {
        Ok(mesh) => mesh,
        Err(e) => return writeln!(out, "{}: {}: {e}", path.display(), e.status()),
    };

    writeln!(out, "{}: {}", path.display(), LoadStatus::Success)?;
    writeln!(out, "  format:        {}", mesh.format_label())?;
    writeln!(out, "  triangles:     {} ({} skipped)", mesh.triangle_count(), mesh.skipped_triangles)?;
    if mesh.is_indexed() {
        writeln!(out, "  vertices:      {} (indexed, {} indices)", mesh.vertex_count(), mesh.indices.len())?;
    } else {
        writeln!(out, "  vertices:      {} (not indexed)", mesh.vertex_count())?;
    }
    let bbox = &mesh.bounding_box;
    writeln!(out, "  min:           {}", vec3(bbox.min))?;
    writeln!(out, "  max:           {}", vec3(bbox.max))?;
    writeln!(out, "  center:        {}", vec3(bbox.center))?;
    writeln!(out, "  size:          {}", vec3(bbox.size))?;
    writeln!(out, "  max dimension: {:.4}", bbox.max_dimension)
}
