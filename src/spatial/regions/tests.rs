use super::*;
use crate::spatial::Coordinate;

const TWO_REGIONS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "region_id": 7, "name": "north" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-88.0, 41.9], [-87.5, 41.9], [-87.5, 42.1], [-88.0, 42.1], [-88.0, 41.9]]]
      }
    },
    {
      "type": "Feature",
      "properties": { "region_id": 12 },
      "geometry": {
        "type": "MultiPolygon",
        "coordinates": [
          [[[-88.0, 41.6], [-87.5, 41.6], [-87.5, 41.9], [-88.0, 41.9], [-88.0, 41.6]]],
          [[[-87.4, 41.6], [-87.3, 41.6], [-87.3, 41.7], [-87.4, 41.7], [-87.4, 41.6]]]
        ]
      }
    }
  ]
}"#;

#[test]
fn test_empty_map_returns_default_region() {
    let map = RegionMap::empty();
    assert!(map.is_empty());
    assert_eq!(
        map.region_for_point(Coordinate::new(41.8781, -87.6298)),
        DEFAULT_REGION
    );
    assert_eq!(map.region_for_point(Coordinate::new(-33.9, 151.2)), DEFAULT_REGION);
}

#[test]
fn test_geojson_partition() {
    let map = RegionMap::from_geojson_str(TWO_REGIONS).unwrap();
    assert_eq!(map.len(), 2);

    assert_eq!(map.region_for_point(Coordinate::new(42.0, -87.7)), RegionId(7));
    assert_eq!(map.region_for_point(Coordinate::new(41.8, -87.7)), RegionId(12));
    // MultiPolygon の 2 つ目の島
    assert_eq!(map.region_for_point(Coordinate::new(41.65, -87.35)), RegionId(12));
    // 範囲外
    assert_eq!(map.region_for_point(Coordinate::new(40.0, -87.7)), DEFAULT_REGION);
}

#[test]
fn test_region_lookup_is_deterministic() {
    let map = RegionMap::from_geojson_str(TWO_REGIONS).unwrap();
    let p = Coordinate::new(42.0, -87.7);
    assert_eq!(map.region_for_point(p), map.region_for_point(p));
}

#[test]
fn test_rejects_missing_region_id() {
    let text = r#"{
      "type": "FeatureCollection",
      "features": [{
        "type": "Feature",
        "properties": { "name": "anonymous" },
        "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] }
      }]
    }"#;
    let err = RegionMap::from_geojson_str(text).unwrap_err();
    assert!(err.to_string().contains("region_id"), "{}", err);
}

#[test]
fn test_rejects_non_polygon_geometry() {
    let text = r#"{
      "type": "FeatureCollection",
      "features": [{
        "type": "Feature",
        "properties": { "region_id": 3 },
        "geometry": { "type": "Point", "coordinates": [0, 0] }
      }]
    }"#;
    assert!(RegionMap::from_geojson_str(text).is_err());
}

#[test]
fn test_rejects_non_collection() {
    let text = r#"{ "type": "Point", "coordinates": [0, 0] }"#;
    assert!(RegionMap::from_geojson_str(text).is_err());
}

#[test]
fn test_load_without_path_is_empty() {
    let map = RegionMap::load(None).unwrap();
    assert!(map.is_empty());
}
