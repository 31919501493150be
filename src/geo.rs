/// Equatorial circumference in meters (WGS84)
pub const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.686;

/// Latitude in WGS84 range and finite
#[inline(always)]
pub fn is_valid_latitude(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

/// Longitude in WGS84 range and finite
#[inline(always)]
pub fn is_valid_longitude(lon: f64) -> bool {
    lon.is_finite() && (-180.0..=180.0).contains(&lon)
}

/// Wrap longitude back into [-180, 180)
#[inline(always)]
pub fn wrap_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Arithmetic mean of (lon, lat) points, `None` when empty
pub fn mean_center(points: impl IntoIterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    let (mut sum_lon, mut sum_lat, mut n) = (0.0, 0.0, 0usize);
    for (lon, lat) in points {
        sum_lon += lon;
        sum_lat += lat;
        n += 1;
    }
    (n > 0).then(|| (sum_lon / n as f64, sum_lat / n as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_ranges() {
        assert!(is_valid_latitude(-90.0));
        assert!(!is_valid_latitude(90.5));
        assert!(!is_valid_latitude(f64::NAN));
        assert!(is_valid_longitude(180.0));
        assert!(!is_valid_longitude(-180.1));
    }

    #[test]
    fn test_wrap_lon() {
        assert!((wrap_lon(190.0) - -170.0).abs() < 1e-9);
        assert!((wrap_lon(-190.0) - 170.0).abs() < 1e-9);
        assert!((wrap_lon(20.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_center() {
        assert_eq!(mean_center(std::iter::empty()), None);
        assert_eq!(mean_center([(10.0, 0.0), (30.0, -10.0)]), Some((20.0, -5.0)));
    }
}
