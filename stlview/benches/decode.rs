use criterion::{Bencher, BenchmarkId, Criterion, criterion_group, criterion_main};
use stlview::stl::*;

const GRID: usize = 100;

/// A GRID x GRID height field, two triangles per cell.
fn height_field() -> Vec<[[f32; 3]; 3]> {
    let z = |x: usize, y: usize| ((x * 7 + y * 13) % 17) as f32 * 0.1;
    let p = |x: usize, y: usize| [x as f32, y as f32, z(x, y)];
    let mut triangles = Vec::with_capacity(GRID * GRID * 2);
    for y in 0..GRID {
        for x in 0..GRID {
            triangles.push([p(x, y), p(x + 1, y), p(x + 1, y + 1)]);
            triangles.push([p(x, y), p(x + 1, y + 1), p(x, y + 1)]);
        }
    }
    triangles
}

fn binary_stl(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
    let mut bytes = vec![0u8; 80];
    bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
    for triangle in triangles {
        bytes.extend_from_slice(&[0u8; 12]);
        for value in triangle.iter().flatten() {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.extend_from_slice(&[0u8; 2]);
    }
    bytes
}

fn ascii_stl(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
    let mut text = String::from("solid field\n");
    for triangle in triangles {
        text += "  facet normal 0 0 0\n    outer loop\n";
        for v in triangle {
            text += &format!("      vertex {} {} {}\n", v[0], v[1], v[2]);
        }
        text += "    endloop\n  endfacet\n";
    }
    text += "endsolid field\n";
    text.into_bytes()
}

fn criterion_benchmark(c: &mut Criterion) {
    let triangles = height_field();
    let binary = binary_stl(&triangles);
    let ascii = ascii_stl(&triangles);

    let mut group = c.benchmark_group("Decode 20K triangles");
    group.bench_with_input(BenchmarkId::new("Binary", triangles.len()), &binary, |bencher: &mut Bencher, bytes| {
        bencher.iter(|| std::hint::black_box(decode_binary(bytes.as_slice())))
    });
    group.bench_with_input(BenchmarkId::new("ASCII", triangles.len()), &ascii, |bencher: &mut Bencher, bytes| {
        bencher.iter(|| std::hint::black_box(decode_ascii(bytes.as_slice())))
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
