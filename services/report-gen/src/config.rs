//! Figure configuration for the report generator.
//!
//! The YAML file carries the dataset request plus the literal statistics
//! and styling of every figure; nothing is derived here. When no file is
//! given, the built-in set reproduces the published report.

use anyhow::{bail, Context, Result};
use chart_renderer::{BulletSpec, ComboSpec, LollipopSpec, WaffleSpec};
use chrono::NaiveDate;
use serde::Deserialize;
use sst_common::{Color, LatLonWindow};
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct ReportConfig {
    pub dataset: DatasetSection,
    #[serde(default)]
    pub bullets: Vec<BulletFigure>,
    #[serde(default)]
    pub lollipops: Vec<LollipopFigure>,
    #[serde(default)]
    pub combo: Option<ComboFigure>,
    #[serde(default)]
    pub waffles: Vec<WaffleFigure>,
}

#[derive(Debug, Deserialize)]
pub struct DatasetSection {
    pub date: NaiveDate,
    pub window: WindowSection,
}

#[derive(Debug, Deserialize)]
pub struct WindowSection {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl WindowSection {
    pub fn to_window(&self) -> Result<LatLonWindow> {
        LatLonWindow::new(self.lat_min, self.lat_max, self.lon_min, self.lon_max)
            .context("invalid dataset window")
    }
}

#[derive(Debug, Deserialize)]
pub struct BulletFigure {
    pub value: f64,
    pub target: f64,
    pub label: String,
    pub color: Option<String>,
}

impl BulletFigure {
    pub fn to_spec(&self) -> Result<BulletSpec> {
        let mut spec = BulletSpec::new(self.value, self.target, self.label.clone());
        if let Some(hex) = &self.color {
            spec = spec.with_fill(parse_color(hex)?);
        }
        Ok(spec)
    }
}

#[derive(Debug, Deserialize)]
pub struct LollipopFigure {
    pub title: String,
    pub unit: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub color: Option<String>,
}

impl LollipopFigure {
    pub fn to_spec(&self) -> Result<LollipopSpec> {
        let mut spec = LollipopSpec::new(
            self.labels.clone(),
            self.values.clone(),
            self.title.clone(),
            self.unit.clone(),
        );
        if let Some(hex) = &self.color {
            spec = spec.with_color(parse_color(hex)?);
        }
        Ok(spec)
    }
}

#[derive(Debug, Deserialize)]
pub struct ComboFigure {
    pub title: String,
    pub x_labels: Vec<String>,
    pub bars: Vec<f64>,
    pub line: Vec<f64>,
    pub bar_axis_label: String,
    pub line_axis_label: String,
}

impl ComboFigure {
    pub fn to_spec(&self) -> ComboSpec {
        let mut spec = ComboSpec::new(self.x_labels.clone(), self.bars.clone(), self.line.clone());
        spec.title = self.title.clone();
        spec.bar_axis_label = self.bar_axis_label.clone();
        spec.line_axis_label = self.line_axis_label.clone();
        spec
    }
}

#[derive(Debug, Deserialize)]
pub struct WaffleFigure {
    pub percent: f64,
    pub title: String,
}

impl WaffleFigure {
    pub fn to_spec(&self) -> WaffleSpec {
        WaffleSpec::new(self.percent, self.title.clone())
    }
}

fn parse_color(hex: &str) -> Result<Color> {
    match Color::from_hex(hex) {
        Some(color) => Ok(color),
        None => bail!("invalid color '{hex}', expected #RRGGBB"),
    }
}

impl ReportConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))
    }

    /// The published report's figure set: Korean coastal waters, three
    /// bullet comparisons, three regional lollipops, the heat-illness
    /// combo and the two climate-anxiety waffles.
    pub fn builtin() -> Self {
        Self {
            dataset: DatasetSection {
                date: NaiveDate::from_ymd_opt(2024, 10, 2).expect("valid built-in date"),
                window: WindowSection {
                    lat_min: 28.0,
                    lat_max: 42.0,
                    lon_min: 120.0,
                    lon_max: 135.0,
                },
            },
            bullets: vec![
                BulletFigure {
                    value: 23.2,
                    target: 21.2,
                    label: "Oct 2024 vs last 10 years".to_string(),
                    color: None,
                },
                BulletFigure {
                    value: 19.8,
                    target: 19.2,
                    label: "2023 annual mean vs 2001-2020".to_string(),
                    color: Some("#2E86AB".to_string()),
                },
                BulletFigure {
                    value: 22.6,
                    target: 19.8,
                    label: "West Sea Oct 2024 vs last 10 years".to_string(),
                    color: Some("#E67E22".to_string()),
                },
            ],
            lollipops: vec![
                LollipopFigure {
                    title: "Long-term rise (1968-2008)".to_string(),
                    unit: "°C".to_string(),
                    labels: region_labels(),
                    values: vec![1.39, 1.23, 1.27],
                    color: None,
                },
                LollipopFigure {
                    title: "Mean annual rise (2010-)".to_string(),
                    unit: "°C/yr".to_string(),
                    labels: region_labels(),
                    values: vec![0.36, 0.54, 0.38],
                    color: Some("#59A14F".to_string()),
                },
                LollipopFigure {
                    title: "2024 anomaly".to_string(),
                    unit: "°C".to_string(),
                    labels: region_labels(),
                    values: vec![3.4, 2.8, 1.1],
                    color: Some("#F28E2B".to_string()),
                },
            ],
            combo: Some(ComboFigure {
                title: "Heat illness cases and deaths".to_string(),
                x_labels: vec!["2022".to_string(), "2023".to_string(), "2024".to_string()],
                bars: vec![1564.0, 2818.0, 3704.0],
                line: vec![9.0, 32.0, 34.0],
                bar_axis_label: "Total cases".to_string(),
                line_axis_label: "Total deaths".to_string(),
            }),
            waffles: vec![
                WaffleFigure {
                    percent: 59.0,
                    title: "Very or extremely worried (%)".to_string(),
                },
                WaffleFigure {
                    percent: 45.0,
                    title: "Daily life negatively affected (%)".to_string(),
                },
            ],
        }
    }
}

fn region_labels() -> Vec<String> {
    vec![
        "East Sea".to_string(),
        "West Sea".to_string(),
        "South Sea".to_string(),
    ]
}
