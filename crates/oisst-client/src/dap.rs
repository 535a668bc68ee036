//! Primary access strategy: OPeNDAP ASCII subset requests.
//!
//! Builds a DAP2 constraint expression for the windowed hyperslab plus the
//! `lat`/`lon` map vectors against the THREDDS `dodsC` endpoint's `.ascii`
//! form, and parses the textual response. Index arithmetic happens client
//! side against the known dataset grid; the server transfers only the
//! selected window.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use sst_common::grid::{grids, DatasetGridSpec};
use sst_common::{time, LatLonWindow, SstGrid};
use tracing::debug;

use crate::access::{decode_sample, AccessError, AccessStrategy};
use crate::resource_name;

pub struct DapAsciiAccess {
    client: Client,
    base_url: String,
    spec: DatasetGridSpec,
}

impl DapAsciiAccess {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            spec: grids::oisst_quarter_degree(),
        }
    }

    /// DAP2 constraint for one day and the inclusive index window.
    fn constraint(t: usize, j0: usize, j1: usize, i0: usize, i1: usize) -> String {
        format!("sst[{t}:{t}][{j0}:{j1}][{i0}:{i1}],lat[{j0}:{j1}],lon[{i0}:{i1}]")
    }
}

#[async_trait]
impl AccessStrategy for DapAsciiAccess {
    fn name(&self) -> &'static str {
        "opendap-ascii"
    }

    async fn fetch_slice(
        &self,
        date: NaiveDate,
        window: &LatLonWindow,
    ) -> Result<SstGrid, AccessError> {
        let (j0, j1) = self.spec.lat_indices(window).ok_or(AccessError::EmptyWindow)?;
        let (i0, i1) = self.spec.lon_indices(window).ok_or(AccessError::EmptyWindow)?;
        let t = time::day_index(date);

        let url = format!(
            "{}/{}.ascii?{}",
            self.base_url,
            resource_name(date.year()),
            Self::constraint(t, j0, j1, i0, i1)
        );
        debug!(url = %url, "requesting OPeNDAP ASCII subset");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AccessError::Status {
                status: response.status(),
                url,
            });
        }
        let body = response.text().await?;

        let width = i1 - i0 + 1;
        let height = j1 - j0 + 1;
        let parsed = parse_dap_ascii(&body, width, height)?;

        // The map vectors are cross-checked against the known grid; fall
        // back to computed coordinates when the response omits them.
        let lats = if parsed.lats.len() == height {
            parsed.lats
        } else {
            (j0..=j1).map(|j| self.spec.lat_of(j)).collect()
        };
        let lons = if parsed.lons.len() == width {
            parsed.lons
        } else {
            (i0..=i1).map(|i| self.spec.lon_of(i)).collect()
        };

        Ok(SstGrid::new(parsed.values, width, height, lats, lons)?)
    }
}

struct ParsedAscii {
    values: Vec<f32>,
    lats: Vec<f64>,
    lons: Vec<f64>,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    None,
    Sst,
    Lat,
    Lon,
    Other,
}

/// Parse the textual DAP2 response.
///
/// The body is a DDS echo, a dashed separator, then one section per
/// requested variable: a `name, [dims]` header line followed by value
/// lines. Grid rows are prefixed with their index (`[0][3], v, v, ...`);
/// map vectors are bare comma-separated values.
fn parse_dap_ascii(body: &str, width: usize, height: usize) -> Result<ParsedAscii, AccessError> {
    let data = match body.split_once("\n---") {
        Some((_, rest)) => rest,
        None => body,
    };

    let mut values: Vec<f32> = Vec::with_capacity(width * height);
    let mut lats: Vec<f64> = Vec::new();
    let mut lons: Vec<f64> = Vec::new();
    let mut section = Section::None;

    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('-') {
            continue;
        }

        if let Some(name) = section_name(line) {
            section = match name {
                "sst" => Section::Sst,
                "lat" => Section::Lat,
                "lon" => Section::Lon,
                _ => Section::Other,
            };
            continue;
        }

        match section {
            Section::Sst => {
                if !line.starts_with('[') {
                    continue;
                }
                let rest = match line.split_once(',') {
                    Some((_, rest)) => rest,
                    None => continue,
                };
                for tok in rest.split(',') {
                    values.push(decode_sample(parse_num::<f32>(tok)?));
                }
            }
            Section::Lat => push_floats(line, &mut lats)?,
            Section::Lon => push_floats(line, &mut lons)?,
            Section::None | Section::Other => {}
        }
    }

    if values.len() != width * height {
        return Err(AccessError::Decode(format!(
            "expected {} samples ({}x{}), found {}",
            width * height,
            width,
            height,
            values.len()
        )));
    }

    Ok(ParsedAscii { values, lats, lons })
}

/// Detect a section header line (`sst, [1][57][61]`, `sst.lat, [57]`).
///
/// Value lines either start with a row index or with a number, so a
/// header is a line whose leading token is a name and which carries a
/// dimension bracket.
fn section_name(line: &str) -> Option<&str> {
    if line.starts_with('[') || !line.contains('[') {
        return None;
    }
    let head = line.split([',', '[']).next()?.trim();
    if head.is_empty() {
        return None;
    }
    let first = head.chars().next()?;
    if first.is_ascii_digit() || first == '-' || first == '+' {
        return None;
    }
    Some(head.rsplit('.').next().unwrap_or(head))
}

fn push_floats(line: &str, out: &mut Vec<f64>) -> Result<(), AccessError> {
    for tok in line.split(',') {
        if tok.trim().is_empty() {
            continue;
        }
        out.push(parse_num::<f64>(tok)?);
    }
    Ok(())
}

fn parse_num<T: std::str::FromStr>(tok: &str) -> Result<T, AccessError> {
    tok.trim()
        .parse::<T>()
        .map_err(|_| AccessError::Decode(format!("bad numeric token '{}'", tok.trim())))
}
