use crate::error::{Error, Result};
use std::io::Read;

/// Gzip magic bytes as a little-endian u16
pub const GZIP_MAGIC: u16 = 0x8b1f;

/// Header flags (RFC 1952)
pub const FHCRC: u8 = 1 << 1;
pub const FEXTRA: u8 = 1 << 2;
pub const FNAME: u8 = 1 << 3;
pub const FCOMMENT: u8 = 1 << 4;

/// The parts of a gzip member header worth reporting
#[derive(Debug, Clone)]
pub struct GzipHeader {
    pub flags: u8,
    pub mtime: u32,
    pub os: u8,
    pub filename: Option<String>,
    pub comment: Option<String>,
}

impl GzipHeader {
    /// Parse a member header, leaving `reader` at the first DEFLATE byte
    pub fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; 10];
        read_exact(reader, &mut buf)?;

        let magic = u16::from_le_bytes([buf[0], buf[1]]);
        if magic != GZIP_MAGIC {
            return Err(Error::InvalidGzipMagic(magic));
        }
        if buf[2] != 8 {
            return Err(Error::UnsupportedCompressionMethod(buf[2]));
        }

        let flags = buf[3];
        let mtime = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        let os = buf[9];

        if flags & FEXTRA != 0 {
            let mut xlen = [0u8; 2];
            read_exact(reader, &mut xlen)?;
            let mut extra = vec![0u8; u16::from_le_bytes(xlen) as usize];
            read_exact(reader, &mut extra)?;
        }
        let filename = if flags & FNAME != 0 { Some(read_cstring(reader)?) } else { None };
        let comment = if flags & FCOMMENT != 0 { Some(read_cstring(reader)?) } else { None };
        if flags & FHCRC != 0 {
            read_exact(reader, &mut [0u8; 2])?;
        }

        Ok(GzipHeader { flags, mtime, os, filename, comment })
    }
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|_| Error::UnexpectedEof)
}

/// Null-terminated field; Latin-1 when not valid UTF-8
fn read_cstring<R: Read>(reader: &mut R) -> Result<String> {
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        read_exact(reader, &mut byte)?;
        if byte[0] == 0 {
            break;
        }
        bytes.push(byte[0]);
    }
    Ok(String::from_utf8(bytes)
        .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect()))
}
