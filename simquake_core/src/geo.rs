//! Kilometer-scale geographic jitter and great-circle distance.

use rand::Rng;

/// Kilometers per degree of latitude (and of longitude at the equator).
pub const KM_PER_DEG: f64 = 111.0;

/// Floor for the cosine-of-latitude term so the longitude conversion stays
/// bounded near the poles.
pub const MIN_COS_LAT: f64 = 0.1;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Returns a uniform random `(Δlat, Δlon)` in degrees for a jitter box of
/// `km_lat` × `km_lon` kilometers centered on `base_lat`.
///
/// Longitude kilometers shrink with latitude, so the conversion divides by
/// `cos(base_lat)`, clamped to [`MIN_COS_LAT`].
pub fn jitter_deg<R: Rng>(rng: &mut R, base_lat: f64, km_lat: f64, km_lon: f64) -> (f64, f64) {
    let dlat = (km_lat / KM_PER_DEG) * (rng.gen::<f64>() - 0.5) * 2.0;
    let denom = KM_PER_DEG * base_lat.to_radians().cos().max(MIN_COS_LAT);
    let dlon = (km_lon / denom) * (rng.gen::<f64>() - 0.5) * 2.0;
    (dlat, dlon)
}

/// Great-circle distance between two points in kilometers (haversine).
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_jitter_stays_in_box() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let max_dlat = 150.0 / KM_PER_DEG;
        let max_dlon = 150.0 / (KM_PER_DEG * 15.5_f64.to_radians().cos());

        for _ in 0..1000 {
            let (dlat, dlon) = jitter_deg(&mut rng, 15.5, 150.0, 150.0);
            assert!(dlat.abs() <= max_dlat);
            assert!(dlon.abs() <= max_dlon);
        }
    }

    #[test]
    fn test_jitter_pole_guard() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        // At 89.9° the raw cosine would blow the longitude offset up by
        // ~570x; the floor caps it at 10x.
        let max_dlon = 100.0 / (KM_PER_DEG * MIN_COS_LAT);

        for _ in 0..1000 {
            let (_, dlon) = jitter_deg(&mut rng, 89.9, 100.0, 100.0);
            assert!(dlon.abs() <= max_dlon);
        }
    }

    #[test]
    fn test_haversine_one_degree_at_equator() {
        // 2π · 6371 / 360 ≈ 111.19 km
        assert_relative_eq!(haversine_km(0.0, 0.0, 0.0, 1.0), 111.19, epsilon = 0.01);
    }

    #[test]
    fn test_haversine_zero_and_symmetric() {
        assert_eq!(haversine_km(13.75, 100.5, 13.75, 100.5), 0.0);

        let d1 = haversine_km(13.75, 100.5, 38.3, 142.4);
        let d2 = haversine_km(38.3, 142.4, 13.75, 100.5);
        assert_relative_eq!(d1, d2, epsilon = 1e-9);
    }
}
