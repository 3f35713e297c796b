//! Portable float map output for distance maps
//!
//! Single-channel `Pf` header, negative scale for little-endian samples,
//! rows stored bottom to top.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use byteorder::{LittleEndian, WriteBytesExt};

use crate::distance::DistanceMap;

/// Write the header and samples of `map` to `writer`
pub fn write_pfm_to<W: Write>(map: &DistanceMap, writer: &mut W) -> Result<()> {
    write!(writer, "Pf\n{} {}\n-1.0\n", map.width, map.height)?;
    for y in (0..map.height).rev() {
        for &v in map.row(y) {
            writer.write_f32::<LittleEndian>(v)?;
        }
    }
    Ok(())
}

fn write_file(map: &DistanceMap, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("unable to open {} for writing", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_pfm_to(map, &mut writer).with_context(|| format!("Error writing to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Error writing to {}", path.display()))
}

/// Write `map` as a `.pfm` file; other extensions are rejected
pub fn write_pfm(map: &DistanceMap, path: &Path) -> Result<()> {
    if !path.as_os_str().as_encoded_bytes().ends_with(b".pfm") {
        bail!("wrong file extension; it should be .pfm: {}", path.display());
    }
    write_file(map, path)
}

/// Raw distance map dump with the same layout, any file name
pub fn write_raw_distmap(map: &DistanceMap, path: &Path) -> Result<()> {
    write_file(map, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> DistanceMap {
        DistanceMap {
            width: 2,
            height: 2,
            values: vec![1.0, 2.0, 3.0, 4.0],
        }
    }

    #[test]
    fn test_layout_is_bottom_up_little_endian() {
        let mut out = Vec::new();
        write_pfm_to(&sample_map(), &mut out).unwrap();
        let header = b"Pf\n2 2\n-1.0\n";
        assert_eq!(&out[..header.len()], header);

        let floats: Vec<f32> = out[header.len()..]
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(floats, vec![3.0, 4.0, 1.0, 2.0]);
    }

    #[test]
    fn test_extension_required() {
        let dir = std::env::temp_dir();
        let err = write_pfm(&sample_map(), &dir.join("distance.png")).unwrap_err();
        assert!(err.to_string().starts_with("wrong file extension"));
        let err = write_pfm(&sample_map(), &dir.join("distance.PFM")).unwrap_err();
        assert!(err.to_string().starts_with("wrong file extension"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_with_pfm_suffix_accepted() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"dist\xff\xfe.pfm"));
        write_pfm(&sample_map(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"Pf\n2 2\n-1.0\n"));
    }
}
