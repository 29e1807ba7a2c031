//! polyedit CLI - mesh editing command-line tool.
//!
//! Usage: polyedit <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Faces are named by their keys, which are assigned 1, 2, 3, ... in the
//! order faces appear in the input file. Vertices are named by their 1-based
//! position in the file, like OBJ face records do.
//!
//! Set `RUST_LOG=debug` to see what each edit does.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use polyedit::algo::{delete, edge, subdivide, triangulate};
use polyedit::io;
use polyedit::mesh::{FaceKey, HalfEdgeId, HalfEdgeMesh, VertexId};
use polyedit::render::{self, RenderOptions, Shading};

#[derive(Parser)]
#[command(name = "polyedit")]
#[command(author, version, about = "Half-edge mesh editing CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Check every structural invariant of a mesh
    Validate {
        /// Input mesh file
        input: PathBuf,
    },

    /// Fan-triangulate faces
    Triangulate {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Only triangulate these faces (default: all)
        #[arg(short, long = "face", value_parser = parse_face_key)]
        faces: Vec<FaceKey>,
    },

    /// Loop-subdivide a mesh
    Subdivide {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Delete faces, repairing the boundary around them
    Delete {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Faces to delete, in order
        #[arg(short, long = "face", required = true, value_parser = parse_face_key)]
        faces: Vec<FaceKey>,
    },

    /// Split an edge at its midpoint
    Split {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// First endpoint (1-based vertex number)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        from: u32,

        /// Second endpoint (1-based vertex number)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        to: u32,
    },

    /// Flip the edge shared by two triangles
    Flip {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// First endpoint (1-based vertex number)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        from: u32,

        /// Second endpoint (1-based vertex number)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        to: u32,
    },

    /// Print the draw list a renderer would receive
    Faces {
        /// Input mesh file
        input: PathBuf,

        /// Which normals to print
        #[arg(short, long, value_enum, default_value = "flat")]
        shading: ShadingArg,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ShadingArg {
    /// One normal per face
    Flat,
    /// Per-vertex normals
    Smooth,
}

impl From<ShadingArg> for Shading {
    fn from(arg: ShadingArg) -> Self {
        match arg {
            ShadingArg::Flat => Shading::Flat,
            ShadingArg::Smooth => Shading::Smooth,
        }
    }
}

fn parse_face_key(s: &str) -> Result<FaceKey, String> {
    let raw: u32 = s.parse().map_err(|e| format!("{}", e))?;
    FaceKey::new(raw).ok_or_else(|| "face keys start at 1".to_string())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Validate { input } => {
            cmd_validate(&input)?;
        }

        Commands::Triangulate {
            input,
            output,
            faces,
        } => {
            cmd_triangulate(&input, &output, &faces)?;
        }

        Commands::Subdivide {
            input,
            output,
            iterations,
            sequential,
        } => {
            cmd_subdivide(&input, &output, iterations, sequential)?;
        }

        Commands::Delete {
            input,
            output,
            faces,
        } => {
            cmd_delete(&input, &output, &faces)?;
        }

        Commands::Split {
            input,
            output,
            from,
            to,
        } => {
            cmd_split(&input, &output, from, to)?;
        }

        Commands::Flip {
            input,
            output,
            from,
            to,
        } => {
            cmd_flip(&input, &output, from, to)?;
        }

        Commands::Faces { input, shading } => {
            cmd_faces(&input, shading.into())?;
        }
    }

    Ok(())
}

fn load(input: &PathBuf) -> Result<HalfEdgeMesh, Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;
    println!(
        "Loaded: {} vertices, {} faces",
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Validate, report and write the edited mesh.
fn finish(
    mesh: &HalfEdgeMesh,
    output: &PathBuf,
    start: Instant,
) -> Result<(), Box<dyn std::error::Error>> {
    let elapsed = start.elapsed();
    let report = mesh.validate();
    if !report.is_ok() {
        return Err(format!(
            "edit left {} broken invariant(s), not saving",
            report.violations.len()
        )
        .into());
    }

    println!(
        "Result: {} vertices, {} faces",
        mesh.num_vertices(),
        mesh.num_faces()
    );
    io::save(mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);
    Ok(())
}

/// Half-edge between two 1-based vertex numbers.
fn edge_between(
    mesh: &HalfEdgeMesh,
    from: u32,
    to: u32,
) -> Result<HalfEdgeId, Box<dyn std::error::Error>> {
    let a = VertexId::new(from as usize - 1);
    let b = VertexId::new(to as usize - 1);
    for (n, v) in [(from, a), (to, b)] {
        if !mesh.contains_vertex(v) {
            return Err(format!("no vertex {}", n).into());
        }
    }
    mesh.find_halfedge(a, b)
        .ok_or_else(|| format!("vertices {} and {} are not connected", from, to).into())
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Edges: {}", mesh.num_edges());
    println!("Half-edges: {}", mesh.num_halfedges());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    if mesh.is_triangle_mesh() {
        println!("Mesh type: Triangle mesh");
    } else {
        let max_sides = mesh
            .face_ids()
            .map(|f| mesh.face_edge_count(f))
            .max()
            .unwrap_or(0);
        println!("Mesh type: Polygon mesh (up to {} sides)", max_sides);
    }

    let boundary_edges = mesh
        .halfedge_ids()
        .filter(|&h| mesh.is_boundary_halfedge(h))
        .count();
    if boundary_edges == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary edges)", boundary_edges);
    }

    let euler = mesh.num_vertices() as i64 - mesh.num_edges() as i64 + mesh.num_faces() as i64;
    println!("Euler characteristic: {}", euler);
    println!("Next face key: {}", mesh.registry().peek_next());

    Ok(())
}

fn cmd_validate(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;
    let report = mesh.validate();

    if report.is_ok() {
        println!("{}: valid", input.display());
        return Ok(());
    }

    for violation in &report.violations {
        println!("  {}", violation);
    }
    Err(format!("{} violation(s) found", report.violations.len()).into())
}

fn cmd_triangulate(
    input: &PathBuf,
    output: &PathBuf,
    faces: &[FaceKey],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = load(input)?;

    let start = Instant::now();
    if faces.is_empty() {
        println!("Triangulating all faces...");
        let added = triangulate::convert_to_triangles(&mut mesh)?;
        println!("Added {} faces", added);
    } else {
        for &key in faces {
            let pieces = triangulate::face_to_triangles(&mut mesh, key)?;
            let keys: Vec<String> = pieces.iter().map(|k| k.to_string()).collect();
            println!("Face {} -> {}", key, keys.join(" "));
        }
    }

    finish(&mesh, output, start)
}

fn cmd_subdivide(
    input: &PathBuf,
    output: &PathBuf,
    iterations: usize,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = load(input)?;

    let options = subdivide::SubdivideOptions::new(iterations).with_parallel(!sequential);
    let mode = if sequential { "sequential" } else { "parallel" };

    let start = Instant::now();
    println!(
        "Applying Loop subdivision ({} iterations, {})...",
        iterations, mode
    );
    subdivide::loop_subdivide(&mut mesh, &options)?;

    finish(&mesh, output, start)
}

fn cmd_delete(
    input: &PathBuf,
    output: &PathBuf,
    faces: &[FaceKey],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = load(input)?;

    let start = Instant::now();
    for &key in faces {
        if delete::delete_face(&mut mesh, key)? {
            println!("Deleted face {}", key);
        } else {
            println!("Kept face {} (deleting it would pinch a vertex)", key);
        }
    }

    finish(&mesh, output, start)
}

fn cmd_split(
    input: &PathBuf,
    output: &PathBuf,
    from: u32,
    to: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = load(input)?;
    let he = edge_between(&mesh, from, to)?;

    let start = Instant::now();
    let mid = edge::split_edge(&mut mesh, he)?;
    let p = mesh.position(mid);
    println!(
        "Split {}-{} at ({:.3}, {:.3}, {:.3})",
        from, to, p.x, p.y, p.z
    );

    finish(&mesh, output, start)
}

fn cmd_flip(
    input: &PathBuf,
    output: &PathBuf,
    from: u32,
    to: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = load(input)?;
    let he = edge_between(&mesh, from, to)?;

    let start = Instant::now();
    edge::flip_edge(&mut mesh, he)?;
    println!(
        "Flipped {}-{} to {}-{}",
        from,
        to,
        mesh.origin(he).index() + 1,
        mesh.vert(he).index() + 1
    );

    finish(&mesh, output, start)
}

fn cmd_faces(input: &PathBuf, shading: Shading) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;

    for face in render::render_faces(&mesh, &RenderOptions::new(shading)) {
        let [r, g, b, a] = face.color;
        println!(
            "{} rgba({}, {}, {}, {}) {} corners",
            face.key,
            r,
            g,
            b,
            a,
            face.positions.len()
        );
        for (p, n) in face.positions.iter().zip(&face.normals) {
            println!(
                "  ({:.3}, {:.3}, {:.3}) n=({:.3}, {:.3}, {:.3})",
                p.x, p.y, p.z, n.x, n.y, n.z
            );
        }
    }

    Ok(())
}
