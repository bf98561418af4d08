use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_FORMAT: &str = "tif";

/// Ordered set of layer names to retrieve. A single name is a one-element set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LayerSpec")]
pub struct LayerSet(Vec<String>);

impl LayerSet {
    pub fn single(layer: impl Into<String>) -> Self {
        Self(vec![layer.into()])
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for LayerSet {
    fn from(layer: &str) -> Self {
        Self::single(layer)
    }
}

impl From<String> for LayerSet {
    fn from(layer: String) -> Self {
        Self::single(layer)
    }
}

impl From<Vec<String>> for LayerSet {
    fn from(layers: Vec<String>) -> Self {
        Self(layers)
    }
}

impl From<&[&str]> for LayerSet {
    fn from(layers: &[&str]) -> Self {
        layers.iter().copied().collect()
    }
}

impl<const N: usize> From<[&str; N]> for LayerSet {
    fn from(layers: [&str; N]) -> Self {
        layers.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for LayerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// Lets config files write either `layers = "daily_rain"` or `layers = ["a", "b"]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LayerSpec {
    One(String),
    Many(Vec<String>),
}

impl From<LayerSpec> for LayerSet {
    fn from(spec: LayerSpec) -> Self {
        match spec {
            LayerSpec::One(layer) => Self::single(layer),
            LayerSpec::Many(layers) => Self(layers),
        }
    }
}

/// A year as supplied by a caller, before it is coerced to an integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearInput {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i32> for YearInput {
    fn from(year: i32) -> Self {
        Self::Int(year.into())
    }
}

impl From<i64> for YearInput {
    fn from(year: i64) -> Self {
        Self::Int(year)
    }
}

impl From<f64> for YearInput {
    fn from(year: f64) -> Self {
        Self::Float(year)
    }
}

impl From<&str> for YearInput {
    fn from(year: &str) -> Self {
        Self::Text(year.to_string())
    }
}

impl From<String> for YearInput {
    fn from(year: String) -> Self {
        Self::Text(year)
    }
}

impl fmt::Display for YearInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// Geographic extent in the source CRS. Passed through to the fetch service as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn to_query_value(&self) -> String {
        format!("{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// Everything the caller asks for in one download.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    pub layers: LayerSet,
    pub bbox: BoundingBox,
    pub out_path: String,
    pub years: Vec<YearInput>,
    pub format: String,
    pub delete_temp: bool,
}

impl DownloadRequest {
    pub fn new<L, Y>(layers: L, bbox: BoundingBox, out_path: impl Into<String>, years: Y) -> Self
    where
        L: Into<LayerSet>,
        Y: IntoIterator,
        Y::Item: Into<YearInput>,
    {
        Self {
            layers: layers.into(),
            bbox,
            out_path: out_path.into(),
            years: years.into_iter().map(Into::into).collect(),
            format: DEFAULT_FORMAT.to_string(),
            delete_temp: false,
        }
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn delete_temp(mut self, delete_temp: bool) -> Self {
        self.delete_temp = delete_temp;
        self
    }
}

/// A request after year coercion, ready to be iterated layer by layer.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    pub layers: Vec<String>,
    pub years: Vec<i32>,
    pub bbox: BoundingBox,
    pub out_path: String,
    pub format: String,
    pub delete_temp: bool,
}

/// Arguments for a single fetch service call.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub layer: String,
    pub years: Vec<i32>,
    /// Layer-specific output prefix.
    pub out_path: String,
    pub bbox: BoundingBox,
    pub format: String,
    pub delete_temp: bool,
}

/// Ordered file references produced by a download, across all layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RasterPathCollection {
    kind: &'static str,
    paths: Vec<PathBuf>,
}

impl RasterPathCollection {
    pub const KIND: &'static str = "raster_path_collection";

    pub(crate) fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            kind: Self::KIND,
            paths,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }
}

impl Default for RasterPathCollection {
    fn default() -> Self {
        Self::from_paths(Vec::new())
    }
}

impl IntoIterator for RasterPathCollection {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl<'a> IntoIterator for &'a RasterPathCollection {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
