use super::*;
use std::path::Path;

// binary stl is serialized as follows:
// **little endian encoding**
// 80 bytes header -- must not begin with `solid`
// 4 bytes u32 -- triangle count
// (4 bytes f32: nx, ny, nz, then x, y, z for each of the 3 vertices, 2 bytes u16: attribute)
// --> repeats for triangles, 50 bytes each
const HEADER: &[u8] = b"binary STL tube mesh";
const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Which flavour of STL to write.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

/// Write a mesh as binary STL.
///
/// Facet normals are `(b - a) × (c - a)` normalised, vertices are in the mesh winding order.
pub fn write_binary_stl<W: Write>(mesh: &TubeMesh, mut wtr: W) -> std::io::Result<()> {
    let mut header = [0u8; HEADER_LEN];
    header[..HEADER.len()].copy_from_slice(HEADER);
    wtr.write_all(&header)?;

    let count = u32::try_from(mesh.tri_len()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "binary STL holds at most u32::MAX triangles",
        )
    })?;
    wtr.write_u32::<LE>(count)?;

    for (tri, normal) in mesh.tris().zip(mesh.facet_normals()) {
        for p in std::iter::once(normal).chain(tri) {
            for x in p {
                wtr.write_f32::<LE>(x as f32)?;
            }
        }
        wtr.write_u16::<LE>(0)?; // attribute byte count
    }

    Ok(())
}

pub fn to_binary_stl(mesh: &TubeMesh) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + 4 + mesh.tri_len() * FACET_LEN);
    write_binary_stl(mesh, &mut buf).expect("writing binary STL to memory buffer");
    buf
}

/// Write a mesh as ASCII STL, under the solid `name`.
pub fn write_ascii_stl<W: Write>(
    mesh: &TubeMesh,
    name: &str,
    mut wtr: W,
) -> std::io::Result<()> {
    writeln!(wtr, "solid {}", name)?;
    for (tri, [nx, ny, nz]) in mesh.tris().zip(mesh.facet_normals()) {
        writeln!(wtr, "  facet normal {:e} {:e} {:e}", nx, ny, nz)?;
        writeln!(wtr, "    outer loop")?;
        for [x, y, z] in tri {
            writeln!(wtr, "      vertex {:e} {:e} {:e}", x, y, z)?;
        }
        writeln!(wtr, "    endloop")?;
        writeln!(wtr, "  endfacet")?;
    }
    writeln!(wtr, "endsolid {}", name)
}

pub fn to_ascii_stl(mesh: &TubeMesh, name: &str) -> String {
    let mut buf = Vec::new();
    write_ascii_stl(mesh, name, &mut buf).expect("writing ascii STL to memory buffer");
    String::from_utf8(buf).expect("ascii STL is utf8")
}

/// Write a mesh to a file, creating any missing parent directories.
pub fn save_stl<P: AsRef<Path>>(
    mesh: &TubeMesh,
    path: P,
    format: StlFormat,
) -> crate::Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    let mut wtr = std::io::BufWriter::new(std::fs::File::create(path)?);
    match format {
        StlFormat::Binary => write_binary_stl(mesh, &mut wtr)?,
        StlFormat::Ascii => {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("tube");
            write_ascii_stl(mesh, name, &mut wtr)?
        }
    }
    wtr.flush()?;

    log::info!("wrote {} triangles to {}", mesh.tri_len(), path.display());

    Ok(())
}

/// Deserialize a binary STL.
///
/// STL stores loose triangles, so coincident vertices are welded back together. Stored facet
/// normals are ignored.
pub fn from_binary_stl(stl: &[u8]) -> Result<TubeMesh> {
    if stl.len() < HEADER_LEN + 4 {
        return Err("binary STL is shorter than its header".into());
    }

    let mut c = Cursor::new(&stl[HEADER_LEN..]);
    let count = c.read_u32::<LE>()? as usize;

    let expected = HEADER_LEN + 4 + count * FACET_LEN;
    if stl.len() != expected {
        return Err(format!(
            "binary STL declares {} triangles ({} bytes) but holds {} bytes",
            count,
            expected,
            stl.len()
        )
        .into());
    }

    fn read_point(c: &mut Cursor<&[u8]>) -> std::io::Result<Point3> {
        let x = c.read_f32::<LE>()? as f64;
        let y = c.read_f32::<LE>()? as f64;
        let z = c.read_f32::<LE>()? as f64;
        Ok([x, y, z])
    }

    let mut tris = Vec::with_capacity(count);
    for _ in 0..count {
        let _normal = read_point(&mut c)?;
        let a = read_point(&mut c)?;
        let b = read_point(&mut c)?;
        let d = read_point(&mut c)?;
        c.read_u16::<LE>()?; // attribute byte count
        tris.push([a, b, d]);
    }

    Ok(tris.into_iter().collect())
}
