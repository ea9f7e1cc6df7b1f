//! NumPy `.npy` export and import for vorticity grids, plus CSV slices.
//!
//! Only the subset needed for cubic f64 grids is handled: little-endian
//! `<f8`, C order, shape `(n, n, n)`. Files are written as format v1.0;
//! v1.0 and v2.0 headers are accepted on read.
//!
//! Layout:
//!
//! ```text
//! \x93NUMPY | major | minor | header_len (u16 LE, u32 for v2) | header | data
//! ```
//!
//! The header is a Python dict literal padded with spaces and terminated by
//! `\n` so that the data starts on a 64-byte boundary.

use std::io::{Read, Write};

use crate::error::{Result, SimError};
use crate::grid::{voxel_count, VorticityGrid};

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const ALIGN: usize = 64;

fn header_dict(n: usize) -> String {
    format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': ({}, {}, {}), }}",
        n, n, n
    )
}

/// Write a grid as a `.npy` v1.0 array of shape (n, n, n).
pub fn write_npy<W: Write>(writer: &mut W, grid: &VorticityGrid) -> Result<()> {
    let mut header = header_dict(grid.size());
    // magic(6) + version(2) + len(2) + header + '\n'
    let preamble = MAGIC.len() + 2 + 2;
    let unpadded = preamble + header.len() + 1;
    let padding = (ALIGN - unpadded % ALIGN) % ALIGN;
    header.extend(std::iter::repeat(' ').take(padding));
    header.push('\n');

    let header_len = u16::try_from(header.len())
        .map_err(|_| SimError::Npy(format!("header too long: {} bytes", header.len())))?;

    writer.write_all(MAGIC)?;
    writer.write_all(&[1, 0])?;
    writer.write_all(&header_len.to_le_bytes())?;
    writer.write_all(header.as_bytes())?;

    let mut buf = Vec::with_capacity(grid.len() * 8);
    for v in grid.as_slice() {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    writer.write_all(&buf)?;
    Ok(())
}

/// Value of `key` in the header dict, up to the next top-level comma.
fn header_field<'a>(header: &'a str, key: &str) -> Result<&'a str> {
    let pattern = format!("'{}':", key);
    let start = header
        .find(&pattern)
        .ok_or_else(|| SimError::Npy(format!("missing '{}' in header", key)))?
        + pattern.len();
    let rest = header[start..].trim_start();
    let end = if rest.starts_with('(') {
        rest.find(')').map(|i| i + 1)
    } else {
        rest.find(|c| c == ',' || c == '}')
    }
    .ok_or_else(|| SimError::Npy(format!("unterminated '{}' in header", key)))?;
    Ok(rest[..end].trim())
}

fn parse_shape(field: &str) -> Result<Vec<usize>> {
    let inner = field
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| SimError::Npy(format!("bad shape {}", field)))?;
    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| SimError::Npy(format!("bad shape dimension '{}'", s)))
        })
        .collect()
}

/// Read a cubic `<f8` C-order array written by [`write_npy`] (or NumPy).
pub fn read_npy<R: Read>(reader: &mut R) -> Result<VorticityGrid> {
    let mut magic = [0u8; 6];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(SimError::Npy("bad magic string".into()));
    }

    let mut version = [0u8; 2];
    reader.read_exact(&mut version)?;
    let header_len = match version[0] {
        1 => {
            let mut len = [0u8; 2];
            reader.read_exact(&mut len)?;
            u16::from_le_bytes(len) as usize
        }
        2 => {
            let mut len = [0u8; 4];
            reader.read_exact(&mut len)?;
            u32::from_le_bytes(len) as usize
        }
        v => return Err(SimError::Npy(format!("unsupported format version {}.{}", v, version[1]))),
    };

    let mut header = vec![0u8; header_len];
    reader.read_exact(&mut header)?;
    let header = String::from_utf8(header)
        .map_err(|_| SimError::Npy("header is not valid UTF-8".into()))?;

    let descr = header_field(&header, "descr")?;
    if descr != "'<f8'" {
        return Err(SimError::Npy(format!("unsupported dtype {}", descr)));
    }
    if header_field(&header, "fortran_order")? != "False" {
        return Err(SimError::Npy("Fortran-order arrays are not supported".into()));
    }
    let shape = parse_shape(header_field(&header, "shape")?)?;
    let n = match shape.as_slice() {
        [a, b, c] if a == b && b == c => *a,
        _ => return Err(SimError::Npy(format!("expected cubic 3D shape, got {:?}", shape))),
    };

    if n == 0 {
        return Err(SimError::Npy("empty grid shape (0, 0, 0)".into()));
    }
    let count = voxel_count(n)
        .ok_or_else(|| SimError::Npy(format!("shape ({0}, {0}, {0}) overflows", n)))?;
    let expected = count
        .checked_mul(8)
        .ok_or_else(|| SimError::Npy(format!("shape ({0}, {0}, {0}) overflows", n)))?;

    // Buffer grows with the bytes actually present, not the claimed shape.
    let mut bytes = Vec::new();
    reader.by_ref().take(expected as u64).read_to_end(&mut bytes)?;
    if bytes.len() != expected {
        return Err(SimError::Npy(format!(
            "truncated data: expected {} values, got {} bytes",
            count,
            bytes.len()
        )));
    }

    let data = bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut b = [0u8; 8];
            b.copy_from_slice(chunk);
            f64::from_le_bytes(b)
        })
        .collect();
    VorticityGrid::from_vec(n, data)
}

/// Write a 2D slice as CSV, one row per line.
pub fn write_slice_csv<W: Write>(writer: &mut W, slice: &[Vec<f64>]) -> Result<()> {
    for row in slice {
        let line = row
            .iter()
            .map(|v| format!("{:e}", v))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}
