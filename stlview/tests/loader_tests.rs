use stlview::math::*;
use stlview::mesh::*;
use stlview::stl::*;

macro_rules! assert_vec3_near {
    ($left:expr, $right:expr, $tol:expr $(,)?) => {{
        let l: Vec3 = $left;
        let r: Vec3 = $right;
        let tol: f32 = $tol;
        if (l.x - r.x).abs() > tol || (l.y - r.y).abs() > tol || (l.z - r.z).abs() > tol {
            panic!("assertion failed: left != right within tol={}\n  left: {:?}\n right: {:?}", tol, l, r);
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    type Record = [f32; 12];

    const UNIT: Record = [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

    fn binary_bytes(declared: u32, records: &[Record]) -> Vec<u8> {
        let mut bytes = vec![0u8; 80];
        bytes.extend_from_slice(&declared.to_le_bytes());
        for record in records {
            for value in record {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
            bytes.extend_from_slice(&[0u8; 2]);
        }
        bytes
    }

    /// A unit cube, 12 facets with outward normals, 8 distinct corners.
    fn cube_ascii(offset: [f32; 3], scale: f32) -> String {
        let p = |x: f32, y: f32, z: f32| [offset[0] + x * scale, offset[1] + y * scale, offset[2] + z * scale];
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([0.0, 0.0, -1.0], [p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)]),
            ([0.0, 0.0, 1.0], [p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)]),
            ([0.0, -1.0, 0.0], [p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)]),
            ([0.0, 1.0, 0.0], [p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)]),
            ([-1.0, 0.0, 0.0], [p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)]),
            ([1.0, 0.0, 0.0], [p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)]),
        ];
        let mut text = String::from("solid cube\n");
        for (n, q) in faces {
            for tri in [[q[0], q[1], q[2]], [q[0], q[2], q[3]]] {
                text += &format!("  facet normal {} {} {}\n    outer loop\n", n[0], n[1], n[2]);
                for v in tri {
                    text += &format!("      vertex {} {} {}\n", v[0], v[1], v[2]);
                }
                text += "    endloop\n  endfacet\n";
            }
        }
        text += "endsolid cube\n";
        text
    }

    fn write(dir: &TempDir, name: &str, bytes: impl AsRef<[u8]>) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn status_of(path: &Path) -> LoadStatus {
        match load(path, &LoadOptions::default()) {
            Ok(_) => LoadStatus::Success,
            Err(e) => e.status(),
        }
    }

    #[test]
    fn zero_byte_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "empty.stl", b"");
        assert_eq!(status_of(&path), LoadStatus::EmptyFile);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        assert_eq!(status_of(&dir.path().join("nope.stl")), LoadStatus::FileNotFound);
    }

    #[test]
    fn directory_cannot_be_opened() {
        let dir = TempDir::new().unwrap();
        let error = load(dir.path(), &LoadOptions::default()).unwrap_err();
        assert_eq!(error.status(), LoadStatus::CannotOpenFile);
    }

    #[rstest]
    #[case::header_only("solid x\nendsolid\n")]
    #[case::header_without_end("solid x\n")]
    #[case::blank_lines("solid part\n\n   \nendsolid part\n")]
    fn ascii_without_facets_is_empty(#[case] text: &str) {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "empty.stl", text);
        assert_eq!(status_of(&path), LoadStatus::EmptyFile);
    }

    #[test]
    fn binary_zero_count_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "zero.stl", binary_bytes(0, &[]));
        assert_eq!(status_of(&path), LoadStatus::EmptyFile);
    }

    #[test]
    fn binary_absurd_count_is_corrupted() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "huge.stl", binary_bytes(100_000_000, &[UNIT]));
        let error = load(&path, &LoadOptions::default()).unwrap_err();
        assert_eq!(error.status(), LoadStatus::CorruptedFile);
        assert!(error.to_string().contains("100000000"));
    }

    #[test]
    fn binary_single_record_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "one.stl", binary_bytes(1, &[UNIT]));
        assert!(is_binary_stl(&path));
        assert_eq!(detect_format(&path), StlFormat::Binary);

        let mesh = load(&path, &LoadOptions::raw()).unwrap();
        assert_eq!(mesh.format, StlFormat::Binary);
        assert_eq!(mesh.format_label(), "Binary STL");
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangles[0].normal, Vec3::UNIT_Z);
        assert_eq!(mesh.vertex_data(), &[0., 0., 0., 0., 0., 1., 1., 0., 0., 0., 0., 1., 0., 1., 0., 0., 0., 1.]);
        assert_eq!(mesh.file_name, PathBuf::from("one.stl"));
    }

    #[test]
    fn binary_size_mismatch_is_invalid() {
        let dir = TempDir::new().unwrap();
        let mut bytes = binary_bytes(2, &[UNIT, UNIT]);
        bytes.push(0);
        let path = write(&dir, "odd.stl", bytes);
        assert!(!is_binary_stl(&path));
        assert_eq!(detect_format(&path), StlFormat::Unknown);
        assert_eq!(status_of(&path), LoadStatus::InvalidFormat);
    }

    #[test]
    fn binary_header_starting_with_solid_is_binary() {
        let dir = TempDir::new().unwrap();
        let mut bytes = binary_bytes(1, &[UNIT]);
        bytes[..11].copy_from_slice(b"solid shiny");
        let path = write(&dir, "exported.stl", bytes);
        assert!(is_ascii_stl(&path));
        assert_eq!(detect_format(&path), StlFormat::Binary);
        assert_eq!(load(&path, &LoadOptions::default()).unwrap().format, StlFormat::Binary);
    }

    #[test]
    fn binary_skips_nan_records() {
        let dir = TempDir::new().unwrap();
        let mut nan = UNIT;
        nan[4] = f32::NAN;
        let path = write(&dir, "nan.stl", binary_bytes(3, &[UNIT, nan, UNIT]));
        let mesh = load(&path, &LoadOptions::raw()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.skipped_triangles, 1);
    }

    #[test]
    fn binary_truncated_record_is_read_error() {
        let dir = TempDir::new().unwrap();
        // on disk the size check rejects it first; the decoder alone reports the short stream
        let mut bytes = binary_bytes(3, &[UNIT, UNIT]);
        bytes.truncate(bytes.len() - 10);
        let path = write(&dir, "cut.stl", &bytes);
        assert_eq!(status_of(&path), LoadStatus::InvalidFormat);
        let error = decode_binary(bytes.as_slice()).unwrap_err();
        assert_eq!(error.status(), LoadStatus::ReadError);
    }

    #[rstest]
    #[case::vertex_outside_loop("solid x\nvertex 0 0 0\nendsolid\n", 2)]
    #[case::facet_in_facet("solid x\nfacet normal 0 0 1\nfacet normal 0 0 1\n", 3)]
    #[case::two_vertices("solid x\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nendloop\n", 6)]
    #[case::bad_coordinate("solid x\n\nfacet normal 0 0 1\n outer loop\n  vertex 0 zero 0\n", 5)]
    fn ascii_grammar_errors_name_the_line(#[case] text: &str, #[case] line: usize) {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.stl", text);
        let error = load(&path, &LoadOptions::default()).unwrap_err();
        assert_eq!(error.status(), LoadStatus::CorruptedFile);
        assert_eq!(error.line(), Some(line));
        assert!(error.to_string().starts_with(&format!("line {line}: ")));
    }

    #[test]
    fn ascii_without_header_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "obj.stl", "v 0 0 0\nv 1 0 0\n");
        assert_eq!(detect_format(&path), StlFormat::Unknown);
        assert_eq!(status_of(&path), LoadStatus::InvalidFormat);
    }

    #[test]
    fn long_text_files_are_invalid() {
        let dir = TempDir::new().unwrap();
        let obj = "# exported mesh\nv 0.000000 0.000000 0.000000\nv 1.000000 0.000000 0.000000\nv 0.000000 1.000000 0.000000\nf 1 2 3\n";
        let path = write(&dir, "mesh.obj", obj);
        assert!(std::fs::metadata(&path).unwrap().len() > 84);
        let error = load(&path, &LoadOptions::default()).unwrap_err();
        assert_eq!(error.status(), LoadStatus::InvalidFormat);

        // the sniffer reads only the first line
        let path = write(&dir, "late.stl", format!("\n{}", cube_ascii([0.0; 3], 1.0)));
        assert_eq!(detect_format(&path), StlFormat::Unknown);
        assert_eq!(status_of(&path), LoadStatus::InvalidFormat);
    }

    #[test]
    fn ascii_with_byte_order_mark_loads() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bom.stl", format!("\u{FEFF}{}", cube_ascii([0.0; 3], 1.0)));
        assert!(is_ascii_stl(&path));
        let mesh = load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(mesh.format, StlFormat::Ascii);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn ascii_cube_welds_to_eight_vertices() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cube.stl", cube_ascii([0.0; 3], 1.0));
        assert!(is_ascii_stl(&path));

        let mesh = load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(mesh.format, StlFormat::Ascii);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.vertex_data().len(), 8 * FLOATS_PER_VERTEX);
    }

    #[test]
    fn ascii_cube_unwelded_is_flat() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cube.stl", cube_ascii([0.0; 3], 1.0));
        let mesh = load(&path, &LoadOptions::default().with_merge_vertices(false)).unwrap();
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.vertex_count(), 36);
        assert_eq!(mesh.vertex_data().len(), 18 * mesh.triangle_count());
    }

    #[test]
    fn welding_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cube.stl", cube_ascii([3.0, -2.0, 7.5], 0.25));
        let mesh = load(&path, &LoadOptions::default()).unwrap();

        let rewelded = weld(&mesh.vertices, DEFAULT_VERTEX_TOLERANCE);
        assert_eq!(rewelded.vertices, mesh.vertices);
        assert_eq!(rewelded.indices, (0..mesh.vertex_count() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn indices_reproduce_corner_positions() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cube.stl", cube_ascii([1.0, 2.0, 3.0], 2.0));
        let mesh = load(&path, &LoadOptions::default()).unwrap();
        let corners = mesh.triangles.iter().flat_map(|t| t.vertices);
        for (corner, &index) in corners.zip(&mesh.indices) {
            assert!((mesh.vertices[index as usize].position - corner).length() <= DEFAULT_VERTEX_TOLERANCE);
        }
    }

    #[test]
    fn centering_puts_box_at_origin() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cube.stl", cube_ascii([10.0, 20.0, 30.0], 4.0));
        let mesh = load(&path, &LoadOptions::default()).unwrap();
        assert_vec3_near!(mesh.bounding_box.center, Vec3::ZERO, 1e-5);
        assert_vec3_near!(mesh.bounding_box.min, Vec3::splat(-2.0), 1e-5);

        let recomputed = BoundingBox::from_points(mesh.vertices.iter().map(|v| v.position));
        assert_vec3_near!(recomputed.center, Vec3::ZERO, 1e-5);
    }

    #[test]
    fn normalization_gives_extent_two() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cube.stl", cube_ascii([-5.0, 0.0, 5.0], 17.0));
        let mesh = load(&path, &LoadOptions::default().with_auto_normalize(true)).unwrap();
        assert!((mesh.bounding_box.max_dimension - 2.0).abs() <= 1e-5);
        assert_vec3_near!(mesh.bounding_box.size, Vec3::splat(2.0), 1e-5);

        let recomputed = BoundingBox::from_points(mesh.vertices.iter().map(|v| v.position));
        assert!((recomputed.max_dimension - 2.0).abs() <= 1e-5);
    }

    #[test]
    fn recomputed_normals_follow_winding() {
        let dir = TempDir::new().unwrap();
        let mut flipped = UNIT;
        flipped[2] = -1.0;
        let path = write(&dir, "flip.stl", binary_bytes(1, &[flipped]));

        let kept = load(&path, &LoadOptions::raw()).unwrap();
        assert_eq!(kept.vertices[0].normal, -Vec3::UNIT_Z);

        let recomputed = load(&path, &LoadOptions::raw().with_recompute_normals(true)).unwrap();
        assert!(recomputed.vertices.iter().all(|v| v.normal == Vec3::UNIT_Z));
    }

    #[test]
    fn loader_is_cleared_by_failed_load() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "cube.stl", cube_ascii([0.0; 3], 1.0));
        let bad = write(&dir, "bad.stl", "solid x\nvertex 0 0 0\n");

        let mut loader = StlLoader::new(LoadOptions::default());
        assert_eq!(loader.load_file(&good), LoadStatus::Success);
        assert_eq!(loader.status(), Some(LoadStatus::Success));
        assert_eq!(loader.triangle_count(), 12);
        assert_eq!(loader.vertex_count(), 8);
        assert_eq!(loader.indices().len(), 36);
        assert_eq!(loader.format_label(), "ASCII STL");
        assert_eq!(loader.file_name(), Some(Path::new("cube.stl")));
        assert!(loader.bounding_box().is_valid());
        assert_eq!(loader.error_string(), "");

        assert_eq!(loader.load_file(&bad), LoadStatus::CorruptedFile);
        assert!(loader.error_string().contains("line 2"));
        assert!(loader.vertex_data().is_empty());
        assert!(loader.indices().is_empty());
        assert!(loader.triangles().is_empty());
        assert_eq!(loader.triangle_count(), 0);
        assert_eq!(loader.format(), StlFormat::Unknown);
        assert!(!loader.bounding_box().is_valid());
        assert_eq!(loader.file_name(), None);

        loader.set_options(LoadOptions::default().with_merge_vertices(false));
        assert_eq!(loader.load_file(&good), LoadStatus::Success);
        assert_eq!(loader.error_string(), "");
        assert_eq!(loader.mesh().map(|m| m.is_indexed()), Some(false));
        assert_eq!(loader.vertex_data().len(), 12 * 18);
        loader.clear();
        assert_eq!(loader.status(), None);
        assert_eq!(loader.vertex_count(), 0);
    }
}
