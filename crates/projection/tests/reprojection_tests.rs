//! Reprojection tests across the public transform table.

use projection::CoordinateTransformer;
use wms_common::{BoundingBox, CrsCode, WmsError};

const MANHATTAN_3857: &str = "-8238310.24,4969803.4,-8238016.75,4970096.9";

#[test]
fn test_web_mercator_bbox_to_state_plane() {
    let ct = CoordinateTransformer::new();
    let out = ct.transform_bbox(MANHATTAN_3857, "EPSG:3857", "EPSG:3424").unwrap();
    let bbox = BoundingBox::from_wms_string(&out).unwrap();

    for v in [bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y] {
        assert!(v > 100_000.0 && v < 1_000_000.0, "{} not in NJ State Plane range", out);
    }
    assert!((bbox.min_x - 629066.03).abs() < 0.5, "{}", out);
    assert!((bbox.min_y - 684288.23).abs() < 0.5, "{}", out);
    assert!((bbox.max_x - 629792.77).abs() < 0.5, "{}", out);
    assert!((bbox.max_y - 685020.40).abs() < 0.5, "{}", out);
}

#[test]
fn test_output_has_six_decimals() {
    let ct = CoordinateTransformer::new();
    let out = ct.transform_bbox(MANHATTAN_3857, "EPSG:3857", "EPSG:4326").unwrap();
    let parts: Vec<&str> = out.split(',').collect();
    assert_eq!(parts.len(), 4);
    for part in parts {
        let decimals = part.split('.').nth(1).map(str::len);
        assert_eq!(decimals, Some(6), "{}", out);
    }
}

#[test]
fn test_state_plane_round_trip_through_web_mercator() {
    let ct = CoordinateTransformer::new();
    let (e, n) = (629066.0, 684288.0);
    let (x, y) = ct.transform_point(e, n, "EPSG:3424", "EPSG:3857").unwrap();
    assert!((x - (-8238310.25)).abs() < 1.0, "x = {}", x);
    assert!((y - 4969803.31).abs() < 1.0, "y = {}", y);

    let (e2, n2) = ct.transform_point(x, y, "EPSG:3857", "EPSG:3424").unwrap();
    assert!((e - e2).abs() < 1e-3);
    assert!((n - n2).abs() < 1e-3);
}

#[test]
fn test_geographic_round_trip_within_new_jersey() {
    let ct = CoordinateTransformer::new();
    for &(lon, lat) in &[(-75.5, 39.0), (-74.5, 40.0), (-74.0, 40.7), (-73.95, 41.3)] {
        let (e, n) = ct.transform_point(lon, lat, "4326", "3424").unwrap();
        let (lon2, lat2) = ct.transform_point(e, n, "3424", "4326").unwrap();
        assert!((lon - lon2).abs() < 1e-4);
        assert!((lat - lat2).abs() < 1e-4);
    }
}

#[test]
fn test_well_formed_bbox_never_fails_for_registered_pairs() {
    let ct = CoordinateTransformer::new();
    let boxes = [
        "-8238310.24,4969803.4,-8238016.75,4970096.9",
        "-74.1,40.6,-73.9,40.8",
        "629066,684288,629792,685020",
        " 1 , 2 , 3 , 4 ",
        "10,10,0,0",
    ];
    for from in CrsCode::ALL {
        for to in CrsCode::ALL {
            for bbox in boxes {
                assert!(
                    ct.transform_bbox(bbox, &from.to_string(), &to.to_string()).is_ok(),
                    "{} {} -> {}",
                    bbox,
                    from,
                    to
                );
            }
        }
    }
}

#[test]
fn test_identity_bbox_is_reformatted_only() {
    let ct = CoordinateTransformer::new();
    let out = ct.transform_bbox("1,2,3,4", "EPSG:3424", "102711").unwrap();
    assert_eq!(out, "1.000000,2.000000,3.000000,4.000000");
}

#[test]
fn test_unknown_crs() {
    let ct = CoordinateTransformer::new();
    let err = ct.transform_bbox("1,2,3,4", "CRS:84", "EPSG:3424").unwrap_err();
    assert!(matches!(err, WmsError::UnsupportedTransform { .. }));
    assert_eq!(err.wms_exception_code(), "InvalidCRS");
}
