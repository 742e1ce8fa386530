//! ASCII STL decoding.
//!
//! ```text
//! solid [name]
//!   facet normal nx ny nz
//!     outer loop
//!       vertex vx vy vz
//!       vertex vx vy vz
//!       vertex vx vy vz
//!     endloop
//!   endfacet
//! endsolid [name]
//! ```
//!
//! Keywords are case-insensitive. Blank lines and `#` comments are skipped, unknown keywords
//! are ignored, and `endsolid` stops parsing. Out-of-order keywords and bad vertex
//! coordinates abort with the offending line number; unreadable normals become zero.

use std::io::BufRead;

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use super::error::{LoadError, LoadResult};
use super::format::starts_with_solid;
use super::triangle::{DecodedTriangles, Triangle};
use crate::math::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    InFacet,
    InLoop,
}

struct Parser {
    state: State,
    normal: Vec3,
    corners: ArrayVec<Vec3, 3>,
    decoded: DecodedTriangles,
}

/// Decodes an ASCII STL from `reader`, positioned at the first byte of the file.
pub fn decode_ascii<R: BufRead>(mut reader: R) -> LoadResult<DecodedTriangles> {
    let mut parser = Parser { state: State::Idle, normal: Vec3::ZERO, corners: ArrayVec::new(), decoded: DecodedTriangles::default() };
    let mut seen_header = false;
    let mut raw = Vec::new();
    let mut line_number = 0usize;

    loop {
        raw.clear();
        let read = reader
            .read_until(b'\n', &mut raw)
            .map_err(|e| LoadError::read(format!("failed to read line {}: {}", line_number + 1, e.kind())))?;
        if read == 0 {
            break;
        }
        line_number += 1;

        let text = String::from_utf8_lossy(&raw);
        let line = text.trim();
        if line.is_empty() {
            continue;
        }
        if !seen_header {
            if !starts_with_solid(line) {
                return Err(LoadError::invalid_format(format!("missing 'solid' header at line {line_number}")));
            }
            seen_header = true;
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else { continue };
        let args: ArrayVec<&str, 4> = tokens.take(4).collect();
        if !parser.line(&keyword.to_lowercase(), &args, line_number)? {
            break;
        }
    }

    if !seen_header {
        return Err(LoadError::invalid_format("missing 'solid' header"));
    }

    let decoded = parser.decoded;
    if decoded.skipped_degenerate > 0 {
        warn!(degenerate = decoded.skipped_degenerate, kept = decoded.triangles.len(), "dropped degenerate facets from ASCII STL");
    }
    if decoded.triangles.is_empty() {
        return Err(LoadError::empty("no valid triangles found in ASCII STL file"));
    }
    debug!(lines = line_number, kept = decoded.triangles.len(), "decoded ASCII STL");
    Ok(decoded)
}

impl Parser {
    /// Applies one keyword line. Returns `false` once `endsolid` is reached.
    fn line(&mut self, keyword: &str, args: &[&str], line: usize) -> LoadResult<bool> {
        match keyword {
            "facet" => {
                if self.state != State::Idle {
                    return Err(LoadError::syntax(line, "unexpected 'facet', previous facet not closed"));
                }
                let components = match args.first() {
                    Some(word) if word.eq_ignore_ascii_case("normal") => &args[1..],
                    _ => args,
                };
                self.normal = Vec3::new(
                    parse_normal_component(components.first()),
                    parse_normal_component(components.get(1)),
                    parse_normal_component(components.get(2)),
                );
                self.corners.clear();
                self.state = State::InFacet;
            }
            "outer" => {
                if self.state != State::InFacet {
                    return Err(LoadError::syntax(line, "unexpected 'outer loop'"));
                }
                if !args.first().is_some_and(|word| word.eq_ignore_ascii_case("loop")) {
                    return Err(LoadError::syntax(line, "expected 'outer loop'"));
                }
                self.state = State::InLoop;
            }
            "vertex" => {
                if self.state != State::InLoop {
                    return Err(LoadError::syntax(line, "vertex outside 'outer loop'"));
                }
                let vertex = Vec3::new(
                    parse_coordinate(args.first(), line)?,
                    parse_coordinate(args.get(1), line)?,
                    parse_coordinate(args.get(2), line)?,
                );
                if self.corners.try_push(vertex).is_err() {
                    return Err(LoadError::syntax(line, "too many vertices in facet"));
                }
            }
            "endloop" => {
                if self.state != State::InLoop {
                    return Err(LoadError::syntax(line, "'endloop' without 'outer loop'"));
                }
                if self.corners.len() != 3 {
                    return Err(LoadError::syntax(line, format!("facet has {} vertices instead of 3", self.corners.len())));
                }
                self.state = State::InFacet;
            }
            "endfacet" => {
                if self.state != State::InFacet {
                    return Err(LoadError::syntax(line, "'endfacet' without matching 'facet'"));
                }
                match self.corners.as_slice() {
                    &[v1, v2, v3] => {
                        if !self.decoded.push_validated(Triangle::new(self.normal, v1, v2, v3)) {
                            debug!(line, "skipping degenerate facet");
                        }
                    }
                    _ => {
                        debug!(line, "skipping facet without a vertex loop");
                        self.decoded.skipped_degenerate += 1;
                    }
                }
                self.state = State::Idle;
            }
            "endsolid" => return Ok(false),
            _ => {}
        }
        Ok(true)
    }
}

/// Normals can be recomputed later, so anything unreadable becomes 0.
fn parse_normal_component(token: Option<&&str>) -> f32 {
    token.and_then(|t| t.parse::<f32>().ok()).filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn parse_coordinate(token: Option<&&str>, line: usize) -> LoadResult<f32> {
    let Some(token) = token else {
        return Err(LoadError::syntax(line, "vertex needs three coordinates"));
    };
    let value: f32 = token
        .parse()
        .map_err(|_| LoadError::syntax(line, format!("invalid vertex coordinate '{token}'")))?;
    if !value.is_finite() {
        return Err(LoadError::syntax(line, format!("non-finite vertex coordinate '{token}'")));
    }
    Ok(value)
}
