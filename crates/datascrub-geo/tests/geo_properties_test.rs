//! Property tests for boundary membership and the integrity check

use datascrub_core::{Column, Table, Value};
use datascrub_geo::{check_geo_integrity, Boundary};
use proptest::prelude::*;

fn rectangle(min_lon: f64, min_lat: f64, width: f64, height: f64) -> Boundary {
    Boundary::new(vec![
        (min_lon, min_lat),
        (min_lon, min_lat + height),
        (min_lon + width, min_lat + height),
        (min_lon + width, min_lat),
    ])
    .unwrap()
}

proptest! {
    #[test]
    fn prop_points_inside_rectangle_are_valid(
        min_lon in -170.0f64..160.0,
        min_lat in -80.0f64..70.0,
        width in 1.0f64..10.0,
        height in 1.0f64..10.0,
        fx in 0.0f64..=1.0,
        fy in 0.0f64..=1.0,
    ) {
        let boundary = rectangle(min_lon, min_lat, width, height);
        let lon = min_lon + fx * width;
        let lat = min_lat + fy * height;

        prop_assert!(boundary.contains_point(lon, lat));
    }

    #[test]
    fn prop_far_points_are_invalid(
        lon in -180.0f64..=180.0,
        lat in -90.0f64..=90.0,
    ) {
        prop_assume!(lon.abs() > 2.0 || lat.abs() > 2.0);

        let boundary = rectangle(-1.0, -1.0, 2.0, 2.0);
        let table = Table::from_columns(vec![
            Column::numeric("lon", vec![Some(lon)]),
            Column::numeric("lat", vec![Some(lat)]),
        ])
        .unwrap();

        let checked = check_geo_integrity(&table, "lat", "lon", &boundary).unwrap();
        prop_assert_eq!(
            checked.column("geo_valid").unwrap().get(0),
            Some(Value::Boolean(false))
        );
        prop_assert_eq!(checked.row_count(), 1);
    }
}
