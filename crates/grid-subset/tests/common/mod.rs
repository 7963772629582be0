//! Shared fixtures for the grid-subset integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use geo_common::{LatLonPoint, LatLonRect};
use grid_subset::{
    classify_locator, AxisType, CoordinateAxis, DataSource, DatasetOpener, GridCoordSystem,
    GridDataset, Locator, MemoryDataSource, OpenErrorKind, Range, RawArray, Result, SubsetError,
    VerticalTransform, VerticalTransformKind, ZarrDataSource,
};
use projection::LambertConformal;
use test_utils::{encoded_array, fixtures, regular_values, sigma_levels};
use zarrs::array::{ArrayBuilder, DataType, FillValue};
use zarrs::array_subset::ArraySubset;
use zarrs_filesystem::FilesystemStore;

pub fn rect(bbox: (f64, f64, f64, f64)) -> LatLonRect {
    let (lat, lon, dlat, dlon) = bbox;
    LatLonRect::new(LatLonPoint::new(lat, lon), dlat, dlon).expect("valid bbox")
}

fn hourly_time(count: usize, step: f64) -> CoordinateAxis {
    CoordinateAxis::regular(
        "time",
        AxisType::Time,
        fixtures::time::HOURS_SINCE_REFERENCE,
        0.0,
        step,
        count,
    )
    .expect("time axis")
}

/// RUC-style `[2, 19, 22, 31]` lat/lon grid on isobaric levels.
pub fn ruc_coord_sys() -> GridCoordSystem {
    use fixtures::ruc::*;
    let lat = CoordinateAxis::regular("lat", AxisType::Lat, "degrees_north", LAT_START, SPACING, NLAT)
        .expect("lat axis");
    let lon = CoordinateAxis::regular("lon", AxisType::Lon, "degrees_east", LON_START, SPACING, NLON)
        .expect("lon axis");
    let isobaric =
        CoordinateAxis::irregular("isobaric", AxisType::Vertical, "hPa", LEVELS_HPA.to_vec())
            .expect("vertical axis");
    GridCoordSystem::builder(lat, lon)
        .time(hourly_time(TIMES, TIME_STEP_HOURS))
        .vertical(isobaric)
        .build()
        .expect("ruc coordinate system")
}

/// WRF-style `[13, 27, 60, 73]` Lambert conformal grid with horizontal
/// axes in `units`; `scale` converts kilometres to those units.
pub fn wrf_coord_sys_in(units: &str, scale: f64) -> GridCoordSystem {
    use fixtures::wrf::*;
    let y = CoordinateAxis::regular("y", AxisType::GeoY, units, Y_START * scale, SPACING * scale, NY)
        .expect("y axis");
    let x = CoordinateAxis::regular("x", AxisType::GeoX, units, X_START * scale, SPACING * scale, NX)
        .expect("x axis");
    let eta = CoordinateAxis::irregular("eta", AxisType::Vertical, "", sigma_levels(LEVELS))
        .expect("eta axis");
    let transform = VerticalTransform::new(
        "wrf_eta",
        "Pa",
        VerticalTransformKind::AtmosphereSigma {
            ptop: PTOP,
            sigma: sigma_levels(LEVELS),
        },
    );
    let lambert = LambertConformal::new(LAT0, LON0, LAT0, LAT0).expect("lambert projection");
    GridCoordSystem::builder(y, x)
        .time(hourly_time(TIMES, 1.0))
        .vertical(eta)
        .vertical_transform(transform)
        .projection(Arc::new(lambert))
        .build()
        .expect("wrf coordinate system")
}

pub fn wrf_coord_sys() -> GridCoordSystem {
    wrf_coord_sys_in("km", 1.0)
}

/// 2-D global grid, latitudes -90..90 by 10 and longitudes from `lon_start` by 4.
pub fn global_coord_sys(lon_start: f64) -> GridCoordSystem {
    use fixtures::global::*;
    let lat = CoordinateAxis::irregular(
        "lat",
        AxisType::Lat,
        "degrees_north",
        regular_values(LAT_START, LAT_SPACING, NLAT),
    )
    .expect("lat axis");
    let lon = CoordinateAxis::regular("lon", AxisType::Lon, "degrees_east", lon_start, LON_SPACING, NLON)
        .expect("lon axis");
    GridCoordSystem::builder(lat, lon).build().expect("global coordinate system")
}

/// Dataset holding one grid whose values encode their own index.
pub fn encoded_dataset(locator: &str, grid: &str, coord_sys: GridCoordSystem) -> GridDataset {
    let source = MemoryDataSource::new(grid, encoded_array(&coord_sys.shape()));
    GridDataset::builder(locator)
        .grid(grid, coord_sys, Arc::new(source))
        .build()
        .expect("dataset")
}

/// Data source that fails every read, like an unreachable remote store.
pub struct UnreachableSource {
    shape: Vec<usize>,
}

impl UnreachableSource {
    pub fn new(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
        }
    }
}

#[async_trait]
impl DataSource for UnreachableSource {
    fn name(&self) -> &str {
        "unreachable"
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    async fn read_slice(&self, _ranges: &[Range]) -> Result<RawArray> {
        Err(SubsetError::read_failure("unreachable", "connection refused"))
    }
}

/// Opens a Zarr store directory holding one float32 array at its root as a
/// single-grid dataset on a known coordinate system.
pub struct LocalZarrOpener {
    pub grid: String,
    pub coord_sys: GridCoordSystem,
}

#[async_trait]
impl DatasetOpener for LocalZarrOpener {
    async fn open_dataset(&self, locator: &str) -> Result<GridDataset> {
        match classify_locator(locator)? {
            Locator::Local(path) => {
                let source = ZarrDataSource::open_local(&path, "/")?;
                GridDataset::builder(locator)
                    .grid(self.grid.clone(), self.coord_sys.clone(), Arc::new(source))
                    .build()
            }
            Locator::Remote(url) => Err(SubsetError::open(
                url,
                OpenErrorKind::RemoteUnavailable,
                "no network in tests",
            )),
        }
    }
}

/// Write `values` as a float32 Zarr V3 array at the root of a new store.
pub fn write_zarr_array(
    path: &Path,
    shape: &[usize],
    chunk: &[usize],
    values: &[f32],
) -> anyhow::Result<()> {
    std::fs::create_dir_all(path)?;
    let store = Arc::new(FilesystemStore::new(path)?);

    let array = ArrayBuilder::new(
        shape.iter().map(|&n| n as u64).collect::<Vec<_>>(),
        DataType::Float32,
        chunk.iter().map(|&n| n as u64).collect::<Vec<_>>().try_into()?,
        FillValue::from(f32::NAN),
    )
    .attributes({
        let mut attrs = serde_json::Map::new();
        attrs.insert("units".to_string(), serde_json::json!("K"));
        attrs.insert("long_name".to_string(), serde_json::json!("temperature"));
        attrs
    })
    .build(store, "/")?;

    array.store_metadata()?;
    let subset = ArraySubset::new_with_start_shape(
        vec![0; shape.len()],
        shape.iter().map(|&n| n as u64).collect(),
    )?;
    array.store_array_subset_elements(&subset, values)?;
    Ok(())
}
