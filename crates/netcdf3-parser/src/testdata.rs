//! Synthetic classic-format files for tests.
//!
//! Builds the minimal file shape a daily subset response has: a record
//! `time` dimension, `lat`/`lon` coordinate variables, and a packed short
//! data variable with CF scale/offset/fill attributes.

const TAG_DIMENSION: u32 = 0x0A;
const TAG_VARIABLE: u32 = 0x0B;
const TAG_ATTRIBUTE: u32 = 0x0C;

struct Builder {
    out: Vec<u8>,
}

impl Builder {
    fn new() -> Self {
        Self { out: Vec::new() }
    }

    fn u32(&mut self, v: u32) {
        self.out.extend_from_slice(&v.to_be_bytes());
    }

    fn name(&mut self, s: &str) {
        self.u32(s.len() as u32);
        self.out.extend_from_slice(s.as_bytes());
        let rem = s.len() % 4;
        if rem != 0 {
            self.out.extend_from_slice(&vec![0u8; 4 - rem]);
        }
    }

    fn float_attr(&mut self, name: &str, v: f32) {
        self.name(name);
        self.u32(5); // NC_FLOAT
        self.u32(1);
        self.out.extend_from_slice(&v.to_be_bytes());
    }

    fn short_attr(&mut self, name: &str, v: i16) {
        self.name(name);
        self.u32(3); // NC_SHORT
        self.u32(1);
        self.out.extend_from_slice(&v.to_be_bytes());
        self.out.extend_from_slice(&[0u8, 0]); // pad to 4
    }
}

/// Build a classic CDF-1 file holding one daily record of a packed short
/// `sst[time][lat][lon]` variable.
///
/// `raw` is row-major `lats.len() x lons.len()`; raw values equal to
/// `fill` decode to NaN, everything else to `raw * scale`.
pub fn daily_subset_file(lats: &[f32], lons: &[f32], raw: &[i16], scale: f32, fill: i16) -> Vec<u8> {
    assert_eq!(raw.len(), lats.len() * lons.len(), "raw values must fill the grid");

    let lat_bytes = (lats.len() * 4) as u32;
    let lon_bytes = (lons.len() * 4) as u32;
    let sst_bytes = raw.len() * 2;
    let sst_padded = (sst_bytes + 3) / 4 * 4;

    let build = |lat_begin: u32, lon_begin: u32, sst_begin: u32| -> Vec<u8> {
        let mut b = Builder::new();
        b.out.extend_from_slice(b"CDF\x01");
        b.u32(1); // numrecs

        b.u32(TAG_DIMENSION);
        b.u32(3);
        b.name("time");
        b.u32(0); // record dimension
        b.name("lat");
        b.u32(lats.len() as u32);
        b.name("lon");
        b.u32(lons.len() as u32);

        // no global attributes
        b.u32(0);
        b.u32(0);

        b.u32(TAG_VARIABLE);
        b.u32(3);

        b.name("lat");
        b.u32(1);
        b.u32(1);
        b.u32(0);
        b.u32(0);
        b.u32(5); // NC_FLOAT
        b.u32(lat_bytes);
        b.u32(lat_begin);

        b.name("lon");
        b.u32(1);
        b.u32(2);
        b.u32(0);
        b.u32(0);
        b.u32(5);
        b.u32(lon_bytes);
        b.u32(lon_begin);

        b.name("sst");
        b.u32(3);
        b.u32(0);
        b.u32(1);
        b.u32(2);
        b.u32(TAG_ATTRIBUTE);
        b.u32(3);
        b.float_attr("scale_factor", scale);
        b.float_attr("add_offset", 0.0);
        b.short_attr("_FillValue", fill);
        b.u32(3); // NC_SHORT
        b.u32(sst_padded as u32);
        b.u32(sst_begin);

        b.out
    };

    // First pass with placeholder offsets to learn the header length.
    let header_len = build(0, 0, 0).len() as u32;
    let lat_begin = header_len;
    let lon_begin = lat_begin + lat_bytes;
    let sst_begin = lon_begin + lon_bytes;

    let mut file = build(lat_begin, lon_begin, sst_begin);
    for v in lats {
        file.extend_from_slice(&v.to_be_bytes());
    }
    for v in lons {
        file.extend_from_slice(&v.to_be_bytes());
    }
    for v in raw {
        file.extend_from_slice(&v.to_be_bytes());
    }
    file
}
