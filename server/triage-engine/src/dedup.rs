//! Near-duplicate detection for inbound reports.
//!
//! Heuristic only: the flag annotates, it never blocks intake. A match needs
//! planar degree-space proximity (the scale is sub-kilometer, so Euclidean on
//! raw lat/lng is close enough) plus case-insensitive exact title equality.

/// Anything that can serve as a dedup candidate (recent reports in the CLI,
/// stored incidents in the dispatch core).
pub trait Candidate {
  fn title(&self) -> &str;
  fn coords(&self) -> (f64, f64);
}

impl Candidate for crate::types::RecentReport {
  fn title(&self) -> &str {
    &self.title
  }

  fn coords(&self) -> (f64, f64) {
    (self.latitude, self.longitude)
  }
}

/// Planar Euclidean distance in degree-space. Intentionally not great-circle.
pub fn degree_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
  let dx = lat1 - lat2;
  let dy = lng1 - lng2;
  (dx * dx + dy * dy).sqrt()
}

/// Find a likely earlier report of the same event.
///
/// Returns the first matching candidate in iteration order (no ranking). The
/// caller supplies the window; reports outside it should not be passed in.
pub fn find_duplicate<'a, C: Candidate>(
  title: &str,
  latitude: f64,
  longitude: f64,
  threshold: f64,
  candidates: &'a [C],
) -> Option<&'a C> {
  let title_lower = title.to_lowercase();
  candidates.iter().find(|c| {
    let (lat, lng) = c.coords();
    degree_distance(latitude, longitude, lat, lng) < threshold
      && c.title().to_lowercase() == title_lower
  })
}
