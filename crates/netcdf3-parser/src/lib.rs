//! Reader for classic NetCDF (CDF-1 / CDF-2) files.
//!
//! Subset services deliver windowed slices as classic-format files, which
//! are a flat header (dimensions, attributes, variables) followed by
//! big-endian array data at recorded byte offsets. This crate decodes that
//! container directly, with no libnetcdf/HDF5 system dependency.
//!
//! Only what subset responses need is implemented: header decoding, reading
//! a whole non-record variable, and reading the first record of a record
//! variable. CF packing conventions (`scale_factor`, `add_offset`,
//! `_FillValue`, `missing_value`) are applied by [`NcFile::read_scaled`].

pub mod error;
pub mod testdata;

pub use error::{NetCdf3Error, NetCdf3Result};

use bytes::Bytes;

const TAG_DIMENSION: u32 = 0x0A;
const TAG_VARIABLE: u32 = 0x0B;
const TAG_ATTRIBUTE: u32 = 0x0C;
const NUMRECS_STREAMING: u32 = u32::MAX;

/// External data types of the classic format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NcType {
    Byte,
    Char,
    Short,
    Int,
    Float,
    Double,
}

impl NcType {
    fn from_code(code: u32) -> NetCdf3Result<Self> {
        match code {
            1 => Ok(NcType::Byte),
            2 => Ok(NcType::Char),
            3 => Ok(NcType::Short),
            4 => Ok(NcType::Int),
            5 => Ok(NcType::Float),
            6 => Ok(NcType::Double),
            other => Err(NetCdf3Error::UnknownType(other)),
        }
    }

    /// External size in bytes of one element.
    pub fn size(&self) -> usize {
        match self {
            NcType::Byte | NcType::Char => 1,
            NcType::Short => 2,
            NcType::Int | NcType::Float => 4,
            NcType::Double => 8,
        }
    }
}

/// Typed attribute or variable values.
#[derive(Debug, Clone, PartialEq)]
pub enum NcValues {
    Bytes(Vec<i8>),
    Text(String),
    Shorts(Vec<i16>),
    Ints(Vec<i32>),
    Floats(Vec<f32>),
    Doubles(Vec<f64>),
}

impl NcValues {
    pub fn len(&self) -> usize {
        match self {
            NcValues::Bytes(v) => v.len(),
            NcValues::Text(s) => s.len(),
            NcValues::Shorts(v) => v.len(),
            NcValues::Ints(v) => v.len(),
            NcValues::Floats(v) => v.len(),
            NcValues::Doubles(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First element widened to f64, if numeric and present.
    pub fn first_f64(&self) -> Option<f64> {
        match self {
            NcValues::Bytes(v) => v.first().map(|&x| x as f64),
            NcValues::Text(_) => None,
            NcValues::Shorts(v) => v.first().map(|&x| x as f64),
            NcValues::Ints(v) => v.first().map(|&x| x as f64),
            NcValues::Floats(v) => v.first().map(|&x| x as f64),
            NcValues::Doubles(v) => v.first().copied(),
        }
    }

    /// All elements widened to f64 (empty for text).
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            NcValues::Bytes(v) => v.iter().map(|&x| x as f64).collect(),
            NcValues::Text(_) => Vec::new(),
            NcValues::Shorts(v) => v.iter().map(|&x| x as f64).collect(),
            NcValues::Ints(v) => v.iter().map(|&x| x as f64).collect(),
            NcValues::Floats(v) => v.iter().map(|&x| x as f64).collect(),
            NcValues::Doubles(v) => v.clone(),
        }
    }
}

/// A named dimension; `len == 0` marks the record dimension.
#[derive(Debug, Clone)]
pub struct NcDim {
    pub name: String,
    pub len: usize,
}

impl NcDim {
    pub fn is_record(&self) -> bool {
        self.len == 0
    }
}

/// A named attribute with typed values.
#[derive(Debug, Clone)]
pub struct NcAttr {
    pub name: String,
    pub values: NcValues,
}

/// A variable header entry.
#[derive(Debug, Clone)]
pub struct NcVar {
    pub name: String,
    pub dim_ids: Vec<usize>,
    pub attrs: Vec<NcAttr>,
    pub nc_type: NcType,
    /// Per-record external size as stored in the header (padded).
    pub vsize: usize,
    /// Absolute byte offset of the variable's data.
    pub begin: u64,
}

impl NcVar {
    /// Look up an attribute by name.
    pub fn attr(&self, name: &str) -> Option<&NcAttr> {
        self.attrs.iter().find(|a| a.name == name)
    }

    /// Numeric attribute widened to f64.
    pub fn attr_f64(&self, name: &str) -> Option<f64> {
        self.attr(name).and_then(|a| a.values.first_f64())
    }
}

/// A parsed classic-format file.
#[derive(Debug)]
pub struct NcFile {
    pub num_records: usize,
    pub dims: Vec<NcDim>,
    pub global_attrs: Vec<NcAttr>,
    pub vars: Vec<NcVar>,
    data: Bytes,
}

impl NcFile {
    /// Decode header and retain the body for variable reads.
    pub fn parse(bytes: Bytes) -> NetCdf3Result<Self> {
        let mut r = Reader::new(&bytes);

        let magic = r.take(3)?;
        if magic != b"CDF" {
            return Err(NetCdf3Error::BadMagic);
        }
        let version = r.u8()?;
        let wide_offsets = match version {
            1 => false,
            2 => true,
            other => return Err(NetCdf3Error::UnsupportedVersion(other)),
        };

        let numrecs_raw = r.u32()?;
        // A streaming writer leaves the record count unset; subset
        // responses carry one daily step, so assume a single record.
        let num_records = if numrecs_raw == NUMRECS_STREAMING {
            tracing::debug!("streaming record count, assuming 1");
            1
        } else {
            numrecs_raw as usize
        };

        let dims = read_dim_list(&mut r)?;
        let global_attrs = read_attr_list(&mut r)?;
        let vars = read_var_list(&mut r, wide_offsets, &dims)?;

        Ok(Self {
            num_records,
            dims,
            global_attrs,
            vars,
            data: bytes,
        })
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&NcVar> {
        self.vars.iter().find(|v| v.name == name)
    }

    /// Dimension lengths of a variable, with the record dimension resolved
    /// to the file's record count.
    pub fn shape(&self, var: &NcVar) -> NetCdf3Result<Vec<usize>> {
        var.dim_ids
            .iter()
            .map(|&id| {
                let dim = self
                    .dims
                    .get(id)
                    .ok_or(NetCdf3Error::InvalidDimId(id))?;
                Ok(if dim.is_record() {
                    self.num_records
                } else {
                    dim.len
                })
            })
            .collect()
    }

    fn is_record_var(&self, var: &NcVar) -> bool {
        var.dim_ids
            .first()
            .and_then(|&id| self.dims.get(id))
            .map(|d| d.is_record())
            .unwrap_or(false)
    }

    /// Number of elements in one read: the whole variable, or one record's
    /// worth for a record variable.
    fn slab_len(&self, var: &NcVar) -> NetCdf3Result<usize> {
        let shape = self.shape(var)?;
        let skip_first = self.is_record_var(var);
        Ok(shape
            .iter()
            .skip(if skip_first { 1 } else { 0 })
            .product::<usize>()
            .max(1))
    }

    /// Read a variable's raw values widened to f64.
    ///
    /// For record variables only the first record is materialized; daily
    /// subset responses carry a single time step.
    pub fn read_f64(&self, var: &NcVar) -> NetCdf3Result<Vec<f64>> {
        let count = self.slab_len(var)?;
        let start = var.begin as usize;
        let end = start
            .checked_add(count * var.nc_type.size())
            .ok_or_else(|| NetCdf3Error::DataOutOfBounds(var.name.clone()))?;
        if end > self.data.len() {
            return Err(NetCdf3Error::DataOutOfBounds(var.name.clone()));
        }

        let raw = &self.data[start..end];
        Ok(read_values(var.nc_type, count, raw).to_f64())
    }

    /// Read a variable with CF packing applied: `_FillValue` /
    /// `missing_value` sentinels become NaN (compared against the raw,
    /// unscaled value), then `value * scale_factor + add_offset`.
    pub fn read_scaled(&self, var: &NcVar) -> NetCdf3Result<Vec<f32>> {
        let scale = var.attr_f64("scale_factor").unwrap_or(1.0);
        let offset = var.attr_f64("add_offset").unwrap_or(0.0);
        let fill = var.attr_f64("_FillValue");
        let missing = var.attr_f64("missing_value");

        let raw = self.read_f64(var)?;
        Ok(raw
            .into_iter()
            .map(|v| {
                let is_fill = fill.map(|f| v == f).unwrap_or(false)
                    || missing.map(|m| v == m).unwrap_or(false);
                if is_fill {
                    f32::NAN
                } else {
                    (v * scale + offset) as f32
                }
            })
            .collect())
    }
}

fn read_values(nc_type: NcType, count: usize, raw: &[u8]) -> NcValues {
    match nc_type {
        NcType::Byte => NcValues::Bytes(raw[..count].iter().map(|&b| b as i8).collect()),
        NcType::Char => {
            NcValues::Text(String::from_utf8_lossy(&raw[..count]).into_owned())
        }
        NcType::Short => NcValues::Shorts(
            raw.chunks_exact(2)
                .take(count)
                .map(|c| i16::from_be_bytes([c[0], c[1]]))
                .collect(),
        ),
        NcType::Int => NcValues::Ints(
            raw.chunks_exact(4)
                .take(count)
                .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        NcType::Float => NcValues::Floats(
            raw.chunks_exact(4)
                .take(count)
                .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        NcType::Double => NcValues::Doubles(
            raw.chunks_exact(8)
                .take(count)
                .map(|c| {
                    f64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
                })
                .collect(),
        ),
    }
}

fn read_dim_list(r: &mut Reader<'_>) -> NetCdf3Result<Vec<NcDim>> {
    let count = read_list_header(r, TAG_DIMENSION)?;
    let mut dims = Vec::with_capacity(count);
    for _ in 0..count {
        let name = r.name()?;
        let len = r.u32()? as usize;
        dims.push(NcDim { name, len });
    }
    Ok(dims)
}

fn read_attr_list(r: &mut Reader<'_>) -> NetCdf3Result<Vec<NcAttr>> {
    let count = read_list_header(r, TAG_ATTRIBUTE)?;
    let mut attrs = Vec::with_capacity(count);
    for _ in 0..count {
        let name = r.name()?;
        let nc_type = NcType::from_code(r.u32()?)?;
        let nelems = r.u32()? as usize;
        let byte_len = nelems * nc_type.size();
        let raw = r.take(byte_len)?;
        let values = read_values(nc_type, nelems, raw);
        r.pad4(byte_len)?;
        attrs.push(NcAttr { name, values });
    }
    Ok(attrs)
}

fn read_var_list(
    r: &mut Reader<'_>,
    wide_offsets: bool,
    dims: &[NcDim],
) -> NetCdf3Result<Vec<NcVar>> {
    let count = read_list_header(r, TAG_VARIABLE)?;
    let mut vars = Vec::with_capacity(count);
    for _ in 0..count {
        let name = r.name()?;
        let ndims = r.u32()? as usize;
        let mut dim_ids = Vec::with_capacity(ndims);
        for _ in 0..ndims {
            let id = r.u32()? as usize;
            if id >= dims.len() {
                return Err(NetCdf3Error::InvalidDimId(id));
            }
            dim_ids.push(id);
        }
        let attrs = read_attr_list(r)?;
        let nc_type = NcType::from_code(r.u32()?)?;
        let vsize = r.u32()? as usize;
        let begin = if wide_offsets { r.u64()? } else { r.u32()? as u64 };
        vars.push(NcVar {
            name,
            dim_ids,
            attrs,
            nc_type,
            vsize,
            begin,
        });
    }
    Ok(vars)
}

/// A list header is either ABSENT (two zero words) or `tag count`.
fn read_list_header(r: &mut Reader<'_>, expected_tag: u32) -> NetCdf3Result<usize> {
    let offset = r.pos;
    let tag = r.u32()?;
    let count = r.u32()? as usize;
    if tag == 0 && count == 0 {
        return Ok(0);
    }
    if tag != expected_tag {
        return Err(NetCdf3Error::InvalidTag { tag, offset });
    }
    Ok(count)
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> NetCdf3Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .ok_or(NetCdf3Error::UnexpectedEof(self.pos))?;
        if end > self.buf.len() {
            return Err(NetCdf3Error::UnexpectedEof(self.pos));
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> NetCdf3Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> NetCdf3Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u64(&mut self) -> NetCdf3Result<u64> {
        let b = self.take(8)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Names are a length-prefixed byte string padded to a 4-byte boundary.
    fn name(&mut self) -> NetCdf3Result<String> {
        let len = self.u32()? as usize;
        let raw = self.take(len)?;
        let name = std::str::from_utf8(raw)
            .map_err(|_| NetCdf3Error::InvalidName)?
            .to_string();
        self.pad4(len)?;
        Ok(name)
    }

    /// Skip padding up to the next 4-byte boundary after `len` bytes.
    fn pad4(&mut self, len: usize) -> NetCdf3Result<()> {
        let rem = len % 4;
        if rem != 0 {
            self.take(4 - rem)?;
        }
        Ok(())
    }
}
