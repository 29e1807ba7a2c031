//! Wavefront OBJ support.
//!
//! Reads `v`, `vt`, `vn` and `f` records. Face corners may be written as
//! `p`, `p/t`, `p//n` or `p/t/n`; indices are 1-based, and negative indices
//! count back from the most recent element. Comments, groups, materials and
//! any other directive are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point2, Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_indexed, to_indexed, Corner, HalfEdgeMesh, IndexedMesh, MeshIndex};

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use polyedit::io::obj;
/// use polyedit::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let indexed = parse(BufReader::new(file)).map_err(|e| match e {
        MeshError::Parse { .. } => MeshError::LoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
        other => other,
    })?;

    log::debug!(
        "read {}: {} positions, {} faces",
        path.display(),
        indexed.positions.len(),
        indexed.faces.len()
    );

    build_from_indexed(&indexed)
}

/// Parse OBJ text into an indexed polygon soup.
pub fn parse<R: BufRead>(reader: R) -> Result<IndexedMesh> {
    let mut mesh = IndexedMesh::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let mut parts = line.split_whitespace();

        let Some(tag) = parts.next() else {
            continue;
        };
        let rest: Vec<&str> = parts.collect();

        match tag {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&rest, line_no, "vertex")?;
                mesh.positions.push(Point3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(&rest, line_no, "texture coordinate")?;
                mesh.uvs.push(Point2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&rest, line_no, "normal")?;
                mesh.normals.push(Vector3::new(x, y, z));
            }
            "f" => {
                if rest.len() < 3 {
                    return Err(parse_error(line_no, "face requires at least 3 vertices"));
                }
                let face = rest
                    .iter()
                    .map(|corner| parse_corner(corner, &mesh, line_no))
                    .collect::<Result<Vec<Corner>>>()?;
                mesh.faces.push(face);
            }
            _ => {
                // Comments, groups, smoothing groups, materials
            }
        }
    }

    Ok(mesh)
}

fn parse_error(line: usize, message: impl Into<String>) -> MeshError {
    MeshError::Parse {
        line,
        message: message.into(),
    }
}

/// Parse the first `N` fields as floats; extra fields (like `w`) are ignored.
fn parse_floats<const N: usize>(fields: &[&str], line: usize, what: &str) -> Result<[f64; N]> {
    if fields.len() < N {
        return Err(parse_error(
            line,
            format!("{} requires {} coordinates", what, N),
        ));
    }
    let mut out = [0.0; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field
            .parse()
            .map_err(|_| parse_error(line, format!("invalid {} coordinate '{}'", what, field)))?;
    }
    Ok(out)
}

/// Resolve a 1-based or negative OBJ index against `count` elements.
fn resolve_index(field: &str, count: usize, line: usize, what: &str) -> Result<usize> {
    let raw: i64 = field
        .parse()
        .map_err(|_| parse_error(line, format!("invalid {} index '{}'", what, field)))?;

    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r as usize - 1),
        r => count.checked_sub(r.unsigned_abs() as usize),
    };

    match resolved {
        Some(idx) if idx < count => Ok(idx),
        _ => Err(parse_error(
            line,
            format!("{} index {} out of range (have {})", what, raw, count),
        )),
    }
}

fn parse_corner(corner: &str, mesh: &IndexedMesh, line: usize) -> Result<Corner> {
    let mut fields = corner.split('/');
    let position = resolve_index(
        fields.next().unwrap_or_default(),
        mesh.positions.len(),
        line,
        "vertex",
    )?;
    let uv = match fields.next() {
        Some(f) if !f.is_empty() => Some(resolve_index(f, mesh.uvs.len(), line, "texture")?),
        _ => None,
    };
    let normal = match fields.next() {
        Some(f) if !f.is_empty() => Some(resolve_index(f, mesh.normals.len(), line, "normal")?),
        _ => None,
    };
    Ok(Corner {
        position,
        uv,
        normal,
    })
}

/// Write a mesh as OBJ text: live vertices, then one `f` record per face.
pub fn write<W: Write, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, mut writer: W) -> std::io::Result<()> {
    let indexed = to_indexed(mesh);

    writeln!(writer, "# polyedit OBJ export")?;
    writeln!(
        writer,
        "# Vertices: {}, Faces: {}",
        indexed.positions.len(),
        indexed.faces.len()
    )?;

    for p in &indexed.positions {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    for face in &indexed.faces {
        write!(writer, "f")?;
        for corner in face {
            write!(writer, " {}", corner.position + 1)?;
        }
        writeln!(writer)?;
    }

    writer.flush()
}

/// Save a mesh to an OBJ file.
///
/// Vertices are renumbered densely, so removed elements leave no gaps.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;

    write(mesh, BufWriter::new(file)).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::debug!(
        "wrote {}: {} vertices, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(())
}
