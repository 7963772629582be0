//! Integration tests: subsetting reference grids and reading the views.
//!
//! Every fixture value encodes its own `(t, z, y, x)` index, so a read can
//! be checked against the absolute indices the view should address.

mod common;

use std::sync::Arc;

use common::{encoded_dataset, global_coord_sys, rect, ruc_coord_sys, wrf_coord_sys, wrf_coord_sys_in};
use futures::future::join_all;
use geo_common::TimeWindow;
use grid_subset::{
    subset, AxisType, CoordinateAxis, GridCoordSystem, GridDataset, Range, SliceDirective,
    SubsetError, SubsetRequest,
};
use projection::Geostationary;
use test_utils::{decode_index, encode_index, fixtures, init_test_tracing};

fn ceil_div(n: usize, s: usize) -> usize {
    (n + s - 1) / s
}

#[test]
fn test_identity_subset_shares_axes() {
    init_test_tracing();
    let dataset = encoded_dataset("mem://ruc", "T", ruc_coord_sys());
    let grid = dataset.find_grid("T").unwrap();

    let view = subset(grid, None, None, None, 1, 1, 1).unwrap();
    assert_eq!(view.shape(), grid.shape());
    assert_eq!(view.rank(), 4);

    let (a, b) = (grid.coord_sys(), view.coord_sys());
    assert!(Arc::ptr_eq(a.time_axis().unwrap(), b.time_axis().unwrap()));
    assert!(Arc::ptr_eq(a.vertical_axis().unwrap(), b.vertical_axis().unwrap()));
    assert!(Arc::ptr_eq(a.y_axis(), b.y_axis()));
    assert!(Arc::ptr_eq(a.x_axis(), b.x_axis()));
}

#[test]
fn test_strided_subset_of_wrf_grid() {
    init_test_tracing();
    let dataset = encoded_dataset("mem://wrf", "T", wrf_coord_sys());
    let grid = dataset.find_grid("T").unwrap();

    let view = subset(grid, None, None, None, 1, 3, 3).unwrap();
    assert_eq!(view.shape(), vec![13, 9, 20, 25]);
    for (n, (s, got)) in fixtures::wrf::SHAPE.iter().zip([1, 3, 3, 3].iter().zip(view.shape())) {
        assert_eq!(got, ceil_div(*n, *s));
    }

    let cs = view.coord_sys();
    assert!(Arc::ptr_eq(cs.time_axis().unwrap(), grid.coord_sys().time_axis().unwrap()));
    assert!(Arc::ptr_eq(cs.projection().unwrap(), grid.coord_sys().projection().unwrap()));

    let vt = cs.vertical_transform().unwrap();
    assert_eq!(vt.units(), "Pa");
    assert_eq!(vt.num_levels(), Some(9));
    assert_eq!(cs.vertical_axis().unwrap().len(), 9);

    // the derived plane box agrees with the projection's own map area
    assert!(cs
        .bounding_box()
        .approx_eq(&cs.map_area(), cs.config().map_area_tolerance));
    let x = cs.x_axis();
    assert_eq!(x.value(0), Some(fixtures::wrf::X_START));
    assert_eq!(x.increment(), Some(90.0));
}

#[test]
fn test_own_lat_lon_bbox_selects_full_grid() {
    init_test_tracing();
    for cs in [ruc_coord_sys(), wrf_coord_sys()] {
        let bbox = cs.lat_lon_bounding_box().unwrap();
        let dataset = encoded_dataset("mem://grid", "T", cs);
        let grid = dataset.find_grid("T").unwrap();

        let view = subset(grid, None, None, Some(&bbox), 1, 1, 1).unwrap();
        assert_eq!(view.shape(), grid.shape(), "bbox {}", bbox);
        assert!(Arc::ptr_eq(view.coord_sys().x_axis(), grid.coord_sys().x_axis()));
    }
}

#[test]
fn test_bbox_subset_is_idempotent() {
    init_test_tracing();
    let kansas = rect(fixtures::bbox::KANSAS);
    for cs in [ruc_coord_sys(), wrf_coord_sys()] {
        let dataset = encoded_dataset("mem://grid", "T", cs);
        let grid = dataset.find_grid("T").unwrap();

        let once = subset(grid, None, None, Some(&kansas), 1, 1, 1).unwrap();
        let twice = subset(&once, None, None, Some(&kansas), 1, 1, 1).unwrap();
        assert_eq!(once.shape(), twice.shape());
        assert_eq!(once.section(), twice.section());
        assert!(once.shape()[2] < grid.shape()[2]);
        assert!(once.shape()[3] < grid.shape()[3]);
    }
}

#[test]
fn test_bbox_outside_grid_is_empty() {
    init_test_tracing();
    let pacific = rect(fixtures::bbox::SOUTH_PACIFIC);
    for cs in [ruc_coord_sys(), wrf_coord_sys()] {
        let dataset = encoded_dataset("mem://grid", "T", cs);
        let grid = dataset.find_grid("T").unwrap();

        let err = subset(grid, None, None, Some(&pacific), 1, 1, 1).unwrap_err();
        assert!(matches!(err, SubsetError::EmptySubsetResult { .. }), "got {:?}", err);
        assert!(err.is_resolution_error());
        assert!(err.to_string().contains("-50"));
    }
}

#[tokio::test]
async fn test_fixed_time_index_is_relative_to_view() {
    let dataset = encoded_dataset("mem://wrf", "T", wrf_coord_sys());
    let grid = dataset.find_grid("T").unwrap();

    let view = subset(grid, Some(Range::new(2, 5).unwrap()), None, None, 1, 1, 1).unwrap();
    assert_eq!(view.shape()[0], 4);

    let data = view.read_data_slice(0, -1, -1, -1).await.unwrap();
    assert_eq!(data.shape(), &[27, 60, 73]);
    assert_eq!(data[[0, 0, 0]], encode_index(2, 0, 0, 0));
    assert_eq!(data[[26, 59, 72]], encode_index(2, 26, 59, 72));
    assert!(data.iter().all(|&v| decode_index(v).0 == 2));
}

#[test]
fn test_vertical_range_on_surface_grid() {
    let dataset = encoded_dataset("mem://global", "sst", global_coord_sys(0.0));
    let grid = dataset.find_grid("sst").unwrap();
    assert_eq!(grid.rank(), 2);

    let err = subset(grid, None, Some(Range::new(0, 1).unwrap()), None, 1, 1, 1).unwrap_err();
    assert!(
        matches!(err, SubsetError::IncompatibleAxisRequest { ref axis, .. } if axis == "vertical"),
        "got {:?}",
        err
    );

    // strides on missing axes are ignored
    let view = subset(grid, None, None, None, 4, 4, 1).unwrap();
    assert_eq!(view.shape(), grid.shape());
}

#[test]
fn test_out_of_bounds_ranges() {
    let dataset = encoded_dataset("mem://ruc", "T", ruc_coord_sys());
    let grid = dataset.find_grid("T").unwrap();

    let err = subset(grid, Some(Range::new(0, 2).unwrap()), None, None, 1, 1, 1).unwrap_err();
    assert!(matches!(err, SubsetError::RangeOutOfBounds { ref axis, size: 2, .. } if axis == "time"));

    let err = subset(grid, None, Some(Range::new(10, 19).unwrap()), None, 1, 1, 1).unwrap_err();
    assert!(matches!(err, SubsetError::RangeOutOfBounds { size: 19, .. }));

    let err = subset(grid, None, None, None, 1, 0, 1).unwrap_err();
    assert!(matches!(err, SubsetError::InvalidRange(_)));
}

#[tokio::test]
async fn test_fixed_index_outside_view() {
    let dataset = encoded_dataset("mem://ruc", "T", ruc_coord_sys());
    let grid = dataset.find_grid("T").unwrap();
    let view = subset(grid, None, Some(Range::new(3, 6).unwrap()), None, 1, 1, 1).unwrap();

    let err = view.read_data_slice(0, 4, -1, -1).await.unwrap_err();
    assert!(matches!(err, SubsetError::RangeOutOfBounds { ref axis, size: 4, .. } if axis == "isobaric"));

    let err = view.read_data_slice(-2, -1, -1, -1).await.unwrap_err();
    assert!(matches!(err, SubsetError::RangeOutOfBounds { .. }));

    let err = view.read_section(&[SliceDirective::All; 3]).await.unwrap_err();
    assert!(matches!(err, SubsetError::IncompatibleAxisRequest { .. }));
}

#[tokio::test]
async fn test_reads_fail_after_close() {
    let dataset = encoded_dataset("mem://ruc", "T", ruc_coord_sys());
    let grid = dataset.find_grid("T").unwrap().clone();
    let view = subset(&grid, None, None, None, 1, 2, 2).unwrap();
    assert!(view.read_volume_data(1).await.is_ok());

    dataset.close();
    dataset.close();
    assert!(dataset.is_closed());
    assert!(view.is_closed());

    let err = view.read_volume_data(1).await.unwrap_err();
    assert!(matches!(err, SubsetError::ReadFailure { .. }), "got {:?}", err);
    let err = grid.read_yx_data(0, 0).await.unwrap_err();
    assert!(matches!(err, SubsetError::ReadFailure { .. }));

    // resolution needs no I/O and still works
    assert!(subset(&view, None, None, None, 1, 1, 1).is_ok());
}

#[tokio::test]
async fn test_drop_closes_dataset() {
    let view = {
        let dataset = encoded_dataset("mem://ruc", "T", ruc_coord_sys());
        let grid = dataset.find_grid("T").unwrap();
        subset(grid, None, None, None, 1, 1, 1).unwrap()
    };
    assert!(view.is_closed());
    assert!(matches!(
        view.read_yx_data(0, 0).await,
        Err(SubsetError::ReadFailure { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_source() {
    let cs = ruc_coord_sys();
    let source = common::UnreachableSource::new(&cs.shape());
    let dataset = GridDataset::builder("https://example.org/ruc.zarr")
        .grid("T", cs, Arc::new(source))
        .build()
        .unwrap();
    let grid = dataset.find_grid("T").unwrap();
    let err = grid.read_volume_data(0).await.unwrap_err();
    assert!(matches!(err, SubsetError::ReadFailure { .. }));
}

#[tokio::test]
async fn test_concurrent_reads_are_identical() {
    let dataset = encoded_dataset("mem://wrf", "T", wrf_coord_sys());
    let grid = dataset.find_grid("T").unwrap();
    let view = subset(grid, Some(Range::new(3, 9).unwrap()), None, Some(&rect(fixtures::bbox::KANSAS)), 2, 2, 2).unwrap();

    let reads = join_all((0..8).map(|_| view.read_data_slice(1, -1, -1, -1))).await;
    let first = reads[0].as_ref().unwrap();
    for read in &reads {
        assert_eq!(read.as_ref().unwrap(), first);
    }
}

#[tokio::test]
async fn test_time_window() {
    let dataset = encoded_dataset("mem://ruc", "T", ruc_coord_sys());
    let grid = dataset.find_grid("T").unwrap();

    let window = TimeWindow::from_iso_interval("2003-06-12T21:00:00Z/2003-06-12T23:00:00Z").unwrap();
    let view = grid.subset(&SubsetRequest::new().time_window(window)).unwrap();
    assert_eq!(view.shape()[0], 1);
    assert_eq!(view.section()[0], Range::single(1));

    let volume = view.read_volume_data(0).await.unwrap();
    assert_eq!(volume[[0, 0, 0]], encode_index(1, 0, 0, 0));

    let late = TimeWindow::from_iso_interval("2004-01-01T00:00:00Z/2004-01-02T00:00:00Z").unwrap();
    let err = grid.subset(&SubsetRequest::new().time_window(late)).unwrap_err();
    assert!(matches!(err, SubsetError::EmptySubsetResult { .. }));
}

#[test]
fn test_metre_axes_match_kilometre_axes() {
    let kansas = rect(fixtures::bbox::KANSAS);
    let km = encoded_dataset("mem://km", "T", wrf_coord_sys());
    let m = encoded_dataset("mem://m", "T", wrf_coord_sys_in("m", 1000.0));

    let a = subset(km.find_grid("T").unwrap(), None, None, Some(&kansas), 1, 1, 1).unwrap();
    let b = subset(m.find_grid("T").unwrap(), None, None, Some(&kansas), 1, 1, 1).unwrap();
    assert_eq!(a.section(), b.section());
    assert_eq!(b.coord_sys().x_axis().units(), "m");
}

#[test]
fn test_dateline_bbox() {
    let dateline = rect(fixtures::bbox::DATELINE);
    assert!(dateline.crosses_seam());

    // longitudes 0..356: the box is one contiguous block, 172..188
    let dataset = encoded_dataset("mem://global", "sst", global_coord_sys(0.0));
    let view = subset(dataset.find_grid("sst").unwrap(), None, None, Some(&dateline), 1, 1, 1).unwrap();
    assert_eq!(view.section()[0], Range::new(8, 10).unwrap());
    assert_eq!(view.section()[1], Range::new(43, 47).unwrap());
    assert_eq!(view.coord_sys().x_axis().values(), vec![172.0, 176.0, 180.0, 184.0, 188.0]);

    // longitudes -180..176: the two pieces at either end are unioned
    let dataset = encoded_dataset("mem://global", "sst", global_coord_sys(-180.0));
    let grid = dataset.find_grid("sst").unwrap();
    let view = subset(grid, None, None, Some(&dateline), 1, 1, 1).unwrap();
    assert_eq!(view.shape(), vec![3, 90]);
}

#[tokio::test]
async fn test_subset_of_subset_composes_ranges() {
    let dataset = encoded_dataset("mem://ruc", "T", ruc_coord_sys());
    let grid = dataset.find_grid("T").unwrap();

    let outer = grid
        .subset(&SubsetRequest::new().vertical_range(Range::with_stride(2, 16, 2).unwrap()).stride_xy(2))
        .unwrap();
    assert_eq!(outer.section()[1], Range::with_stride(2, 16, 2).unwrap());
    assert_eq!(outer.shape(), vec![2, 8, 11, 16]);

    let inner = outer
        .subset(&SubsetRequest::new().vertical_range(Range::with_stride(1, 5, 2).unwrap()))
        .unwrap();
    assert_eq!(inner.section()[1], Range::with_stride(4, 12, 4).unwrap());
    assert_eq!(
        inner.coord_sys().vertical_axis().unwrap().values(),
        vec![900.0, 700.0, 500.0]
    );

    let data = inner.read_data_slice(1, -1, 3, -1).await.unwrap();
    assert_eq!(data.shape(), &[3, 16]);
    // y index 3 of the view is absolute row 6, x index 5 is absolute column 10
    assert_eq!(data[[2, 5]], encode_index(1, 12, 6, 10));
}

#[tokio::test]
async fn test_convenience_reads() {
    let dataset = encoded_dataset("mem://ruc", "T", ruc_coord_sys());
    let grid = dataset.find_grid("T").unwrap();
    let view = grid
        .subset(&SubsetRequest::new().stride_y(3).stride_x(5))
        .unwrap();
    assert_eq!(view.shape(), vec![2, 19, 8, 7]);

    let volume = view.read_volume_data(1).await.unwrap();
    assert_eq!(volume.shape(), &[19, 8, 7]);
    assert_eq!(volume[[18, 7, 6]], encode_index(1, 18, 21, 30));

    let plane = view.read_yx_data(0, 4).await.unwrap();
    assert_eq!(plane.shape(), &[8, 7]);
    assert_eq!(plane[[1, 1]], encode_index(0, 4, 3, 5));

    let column = view
        .read_section(&[
            SliceDirective::Fixed(1),
            SliceDirective::All,
            SliceDirective::Fixed(2),
            SliceDirective::Fixed(3),
        ])
        .await
        .unwrap();
    assert_eq!(column.shape(), &[19]);
    assert_eq!(column[10], encode_index(1, 10, 6, 15));

    let flat = encoded_dataset("mem://global", "sst", global_coord_sys(0.0));
    let err = flat.find_grid("sst").unwrap().read_volume_data(0).await.unwrap_err();
    assert!(matches!(err, SubsetError::IncompatibleAxisRequest { .. }));
}

#[tokio::test]
async fn test_geostationary_scan_angle_grid() {
    init_test_tracing();
    // a coarse CONUS sector, scan angles in radians with y running north to south
    let y = CoordinateAxis::regular("y", AxisType::GeoY, "rad", 0.1274, -0.0028, 30).unwrap();
    let x = CoordinateAxis::regular("x", AxisType::GeoX, "rad", -0.1012, 0.0028, 50).unwrap();
    let cs = GridCoordSystem::builder(y, x)
        .projection(Arc::new(Geostationary::goes16()))
        .build()
        .unwrap();
    let bbox = cs.lat_lon_bounding_box().unwrap();
    assert!(bbox.contains(geo_common::LatLonPoint::new(39.0, -95.0)));

    let dataset = encoded_dataset("mem://goes", "CMI", cs);
    let grid = dataset.find_grid("CMI").unwrap();
    let view = subset(grid, None, None, Some(&rect(fixtures::bbox::KANSAS)), 1, 1, 1).unwrap();
    let shape = view.shape();
    assert!(shape[0] > 0 && shape[0] < 30, "shape {:?}", shape);
    assert!(shape[1] > 0 && shape[1] < 50, "shape {:?}", shape);

    let plane = view.read_yx_data(0, 0).await.unwrap();
    assert_eq!(plane.shape(), shape.as_slice());
    let (_, _, y0, x0) = decode_index(plane[[0, 0]]);
    assert_eq!((y0, x0), (view.section()[0].first(), view.section()[1].first()));
}
