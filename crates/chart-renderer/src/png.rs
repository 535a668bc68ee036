//! Minimal PNG encoding for rendered figures.
//!
//! RGBA8, no interlace, filter 0 on every scanline: signature, IHDR, one
//! IDAT with zlib-compressed scanlines, IEND.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbaImage;
use std::io::Write;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum PngError {
    #[error("PNG encoding failed: {0}")]
    Io(#[from] std::io::Error),
}

const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Encode an image as a PNG byte stream.
pub fn encode(img: &RgbaImage) -> Result<Vec<u8>, PngError> {
    let (width, height) = img.dimensions();

    let stride = (width * 4) as usize;
    let mut raw = Vec::with_capacity((stride + 1) * height as usize);
    for row in img.as_raw().chunks_exact(stride.max(1)) {
        raw.push(0); // filter: none
        raw.extend_from_slice(row);
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw)?;
    let idat = encoder.finish()?;

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    // bit depth 8, color type 6 (RGBA), deflate, adaptive filtering, no interlace
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);

    let mut out = Vec::with_capacity(idat.len() + 64);
    out.extend_from_slice(&SIGNATURE);
    write_chunk(&mut out, b"IHDR", &ihdr);
    write_chunk(&mut out, b"IDAT", &idat);
    write_chunk(&mut out, b"IEND", &[]);
    Ok(out)
}

/// Encode and write to a file.
pub fn write_file(img: &RgbaImage, path: &Path) -> Result<(), PngError> {
    let bytes = encode(img)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);

    let mut crc = crc32fast::Hasher::new();
    crc.update(kind);
    crc.update(data);
    out.extend_from_slice(&crc.finalize().to_be_bytes());
}
