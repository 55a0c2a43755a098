//! Great-circle distance and ETA estimation for unit proximity ranking.

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average response speed in km per minute.
const SPEED_KM_PER_MIN: f64 = 0.5;

/// Congestion heuristic: distances beyond this pick up a 10% ETA penalty.
const CONGESTION_DISTANCE_KM: f64 = 10.0;
const CONGESTION_MULTIPLIER: f64 = 1.1;

/// Haversine distance in km.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
  let dlat = (lat2 - lat1).to_radians();
  let dlng = (lng2 - lng1).to_radians();
  let a = (dlat / 2.0).sin().powi(2)
    + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);
  let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
  EARTH_RADIUS_KM * c
}

/// Estimated minutes to cover the distance, with the congestion penalty
/// applied only beyond the threshold.
pub fn eta_minutes(distance_km: f64) -> f64 {
  let base = distance_km / SPEED_KM_PER_MIN;
  if distance_km > CONGESTION_DISTANCE_KM {
    base * CONGESTION_MULTIPLIER
  } else {
    base
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_distance() {
    assert!(haversine_km(9.01, 38.75, 9.01, 38.75).abs() < 1e-9);
  }

  #[test]
  fn one_degree_latitude_is_about_111_km() {
    let d = haversine_km(9.0, 38.75, 10.0, 38.75);
    assert!((d - 111.19).abs() < 0.5, "got {}", d);
  }

  #[test]
  fn eta_without_penalty_below_threshold() {
    assert!((eta_minutes(5.0) - 10.0).abs() < 1e-9);
    assert!((eta_minutes(10.0) - 20.0).abs() < 1e-9);
  }

  #[test]
  fn eta_penalty_beyond_threshold() {
    assert!((eta_minutes(20.0) - 44.0).abs() < 1e-9);
  }
}
