//! Geodesic helpers on the WGS-84 ellipsoid

/// WGS-84 semi-major axis (m)
const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// Mean Earth radius (m) for the spherical fallback
const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

const VINCENTY_MAX_ITERATIONS: usize = 200;
const VINCENTY_TOLERANCE: f64 = 1e-12;

use crate::types::GeoPoint;

/// Initial bearing from `start` to `end`, in degrees clockwise from north,
/// normalized to [0, 360).
pub fn initial_bearing_degrees(start: GeoPoint, end: GeoPoint) -> f64 {
    let lat1 = start.latitude.to_radians();
    let lat2 = end.latitude.to_radians();
    let dlon = (end.longitude - start.longitude).to_radians();

    let x = dlon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    (x.atan2(y).to_degrees() + 360.0).rem_euclid(360.0)
}

/// Great-circle distance on a sphere (m).
pub fn haversine_distance_m(start: GeoPoint, end: GeoPoint) -> f64 {
    let lat1 = start.latitude.to_radians();
    let lat2 = end.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (end.longitude - start.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Ellipsoidal distance via Vincenty's inverse formula (m).
///
/// Returns `None` when the iteration does not converge (nearly antipodal points).
pub fn vincenty_distance_m(start: GeoPoint, end: GeoPoint) -> Option<f64> {
    let b = (1.0 - WGS84_F) * WGS84_A;
    let l = (end.longitude - start.longitude).to_radians();
    let u1 = ((1.0 - WGS84_F) * start.latitude.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * end.latitude.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut converged = false;
    let (mut sin_sigma, mut cos_sigma, mut sigma) = (0.0, 0.0, 0.0);
    let (mut cos_sq_alpha, mut cos_2sigma_m) = (0.0, 0.0);

    for _ in 0..VINCENTY_MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            return Some(0.0);
        }
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        cos_2sigma_m = if cos_sq_alpha == 0.0 {
            // equatorial line
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));
        if (lambda - previous).abs() < VINCENTY_TOLERANCE {
            converged = true;
            break;
        }
    }
    if !converged {
        return None;
    }

    let u_sq = cos_sq_alpha * (WGS84_A.powi(2) - b.powi(2)) / b.powi(2);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma.powi(2))
                        * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));
    Some(b * big_a * (sigma - delta_sigma))
}

/// Ellipsoidal distance, falling back to the sphere if Vincenty diverges.
pub fn geodesic_distance_m(start: GeoPoint, end: GeoPoint) -> f64 {
    vincenty_distance_m(start, end).unwrap_or_else(|| {
        tracing::debug!("Vincenty did not converge, using haversine distance");
        haversine_distance_m(start, end)
    })
}

/// Polar (distance, bearing) to the planar coordinates used by the radial map.
pub fn polar_to_cartesian(distance_m: f64, bearing_deg: f64) -> (f64, f64) {
    let angle = bearing_deg.to_radians();
    (distance_m * angle.cos(), distance_m * angle.sin())
}
