//! Static metadata for the SILO gridded climate layers.
//!
//! The catalog is informational: the CLI lists it, config validation warns on
//! names it doesn't know, and the HTTP fetch service uses the year range.

use crate::domain::model::BoundingBox;
use serde::Serialize;

pub const FIRST_YEAR: i32 = 1889;
pub const CRS: &str = "EPSG:4326";
pub const RESOLUTION_DEGREES: f64 = 0.05;
pub const EXTENT: [f64; 4] = [112.0, -44.0, 154.0, -10.0];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LayerInfo {
    pub name: &'static str,
    pub title: &'static str,
    pub units: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub crs: &'static str,
    pub bbox: BoundingBox,
    pub resolution_degrees: f64,
    pub first_year: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LicenseInfo {
    pub name: &'static str,
    pub source_url: &'static str,
    pub license: &'static str,
    pub license_title: &'static str,
    pub license_url: &'static str,
    pub copyright: &'static str,
    pub attribution: &'static str,
}

const LAYERS: &[LayerInfo] = &[
    LayerInfo { name: "daily_rain", title: "Daily rainfall", units: "mm" },
    LayerInfo { name: "monthly_rain", title: "Monthly rainfall", units: "mm" },
    LayerInfo { name: "max_temp", title: "Maximum temperature", units: "°C" },
    LayerInfo { name: "min_temp", title: "Minimum temperature", units: "°C" },
    LayerInfo { name: "vp", title: "Vapour pressure", units: "hPa" },
    LayerInfo { name: "vp_deficit", title: "Vapour pressure deficit", units: "hPa" },
    LayerInfo { name: "evap_pan", title: "Class A pan evaporation", units: "mm" },
    LayerInfo { name: "evap_syn", title: "Synthetic estimate of evaporation", units: "mm" },
    LayerInfo { name: "evap_comb", title: "Combination of pan and synthetic evaporation", units: "mm" },
    LayerInfo { name: "evap_morton_lake", title: "Morton's shallow lake evaporation", units: "mm" },
    LayerInfo { name: "radiation", title: "Solar radiation", units: "MJ/m2" },
    LayerInfo { name: "rh_tmax", title: "Relative humidity at maximum temperature", units: "%" },
    LayerInfo { name: "rh_tmin", title: "Relative humidity at minimum temperature", units: "%" },
    LayerInfo { name: "et_short_crop", title: "FAO56 short crop evapotranspiration", units: "mm" },
    LayerInfo { name: "et_tall_crop", title: "ASCE tall crop evapotranspiration", units: "mm" },
    LayerInfo { name: "et_morton_actual", title: "Morton's areal actual evapotranspiration", units: "mm" },
    LayerInfo { name: "et_morton_potential", title: "Morton's point potential evapotranspiration", units: "mm" },
    LayerInfo { name: "et_morton_wet", title: "Morton's wet-environment areal potential evapotranspiration", units: "mm" },
    LayerInfo { name: "mslp", title: "Mean sea level pressure", units: "hPa" },
];

pub fn layers() -> &'static [LayerInfo] {
    LAYERS
}

pub fn lookup(name: &str) -> Option<&'static LayerInfo> {
    LAYERS.iter().find(|layer| layer.name == name)
}

pub fn is_known_layer(name: &str) -> bool {
    lookup(name).is_some()
}

pub fn dataset() -> DatasetInfo {
    DatasetInfo {
        title: "SILO gridded climate data",
        description: "Daily climate surfaces for Australia interpolated from Bureau of Meteorology station records.",
        crs: CRS,
        bbox: EXTENT.into(),
        resolution_degrees: RESOLUTION_DEGREES,
        first_year: FIRST_YEAR,
    }
}

pub fn license() -> LicenseInfo {
    LicenseInfo {
        name: "SILO gridded climate data",
        source_url: "https://www.longpaddock.qld.gov.au/silo/gridded-data/",
        license: "CC BY 4.0",
        license_title: "Creative Commons Attribution 4.0 International (CC BY 4.0)",
        license_url: "https://creativecommons.org/licenses/by/4.0/",
        copyright: "© State of Queensland (Department of Environment and Science)",
        attribution: "State of Queensland (Department of Environment and Science)",
    }
}
