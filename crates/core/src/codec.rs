//! Little-endian wire primitives shared by the binary file formats.
//!
//! All formats in this workspace use fixed-width little-endian `i32` fields
//! and length-prefixed byte strings, with no padding or compression.

use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Result, TokenizerError};

pub fn write_i32<W: Write>(w: &mut W, path: &Path, value: i32) -> Result<()> {
    w.write_all(&value.to_le_bytes())
        .map_err(|e| TokenizerError::io(path, e))
}

pub fn read_i32<R: Read>(r: &mut R, path: &Path) -> Result<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)
        .map_err(|e| TokenizerError::io(path, e))?;
    Ok(i32::from_le_bytes(buf))
}

/// Write a length-prefixed byte string.
pub fn write_bytes<W: Write>(w: &mut W, path: &Path, bytes: &[u8]) -> Result<()> {
    write_i32(w, path, bytes.len() as i32)?;
    w.write_all(bytes).map_err(|e| TokenizerError::io(path, e))
}

/// Read a length-prefixed string, validating UTF-8.
pub fn read_string<R: Read>(r: &mut R, path: &Path) -> Result<String> {
    let len = read_i32(r, path)?;
    if len < 0 {
        return Err(TokenizerError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, "negative length prefix"),
        ));
    }
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf)
        .map_err(|e| TokenizerError::io(path, e))?;
    String::from_utf8(buf).map_err(|e| {
        TokenizerError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        )
    })
}

/// Create the parent directory chain for an output file.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| TokenizerError::io(path, e))?;
        }
    }
    Ok(())
}
