//! Bounding-box normalization for geocoder responses

use eagle_core::error::Result;
use eagle_core::models::{BBox, DEFAULT_BBOX_PAD};

/// Reorder a `[minLat, maxLat, minLon, maxLon]` box (Nominatim's
/// `boundingbox` layout) into canonical `[minLon, minLat, maxLon, maxLat]`.
///
/// Pairs are sorted so a source that swaps min and max still yields a valid
/// box, and zero-width spans are padded.
pub fn normalize_lat_lon_order(values: [f64; 4]) -> Result<BBox> {
    let [lat_a, lat_b, lon_a, lon_b] = values;
    let bbox = BBox::new(lon_a.min(lon_b), lat_a.min(lat_b), lon_a.max(lon_b), lat_a.max(lat_b))?;
    Ok(ensure_non_degenerate(bbox))
}

/// Pad any zero-width span by [`DEFAULT_BBOX_PAD`] on each side of its center
pub fn ensure_non_degenerate(bbox: BBox) -> BBox {
    let (center_lon, center_lat) = bbox.center();
    let mut bbox = bbox;
    if bbox.lon_span() <= 0.0 {
        bbox.min_lon = center_lon - DEFAULT_BBOX_PAD;
        bbox.max_lon = center_lon + DEFAULT_BBOX_PAD;
    }
    if bbox.lat_span() <= 0.0 {
        bbox.min_lat = center_lat - DEFAULT_BBOX_PAD;
        bbox.max_lat = center_lat + DEFAULT_BBOX_PAD;
    }
    bbox
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_reorders_nominatim_layout() {
        // Nominatim: [minlat, maxlat, minlon, maxlon]
        let bbox = normalize_lat_lon_order([12.85, 12.95, 74.80, 74.90]).unwrap();
        assert_eq!(bbox.to_array(), [74.80, 12.85, 74.90, 12.95]);
    }

    #[test]
    fn test_normalize_pads_point_box() {
        let bbox = normalize_lat_lon_order([10.0, 10.0, 20.0, 20.0]).unwrap();
        assert!(bbox.is_non_degenerate());
        assert!(bbox.contains_strictly(20.0, 10.0));
    }

    #[test]
    fn test_normalize_rejects_non_finite() {
        assert!(normalize_lat_lon_order([f64::NAN, 1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_ensure_non_degenerate_keeps_valid_box() {
        let bbox = BBox::new(1.0, 2.0, 3.0, 4.0).unwrap();
        assert_eq!(ensure_non_degenerate(bbox), bbox);
    }

    proptest! {
        #[test]
        fn prop_normalize_yields_canonical_order(
            min_lat in -89.0f64..89.0,
            lat_span in 0.0001f64..1.0,
            min_lon in -179.0f64..179.0,
            lon_span in 0.0001f64..1.0,
        ) {
            let max_lat = min_lat + lat_span;
            let max_lon = min_lon + lon_span;

            let bbox = normalize_lat_lon_order([min_lat, max_lat, min_lon, max_lon]).unwrap();

            prop_assert_eq!(bbox.to_array(), [min_lon, min_lat, max_lon, max_lat]);
            prop_assert!(bbox.min_lon < bbox.max_lon);
            prop_assert!(bbox.min_lat < bbox.max_lat);
        }

        #[test]
        fn prop_normalize_is_always_non_degenerate(
            a in -89.0f64..89.0,
            b in -89.0f64..89.0,
            c in -179.0f64..179.0,
            d in -179.0f64..179.0,
        ) {
            let bbox = normalize_lat_lon_order([a, b, c, d]).unwrap();
            prop_assert!(bbox.min_lon < bbox.max_lon);
            prop_assert!(bbox.min_lat < bbox.max_lat);
        }
    }
}
