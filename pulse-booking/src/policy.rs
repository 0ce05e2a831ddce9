use serde::Deserialize;

/// Tunable rules for the conflict resolver.
///
/// One resolver driven by this struct replaces the several copy-pasted
/// booking variants this service grew out of: the date-window restriction and
/// the catalog existence check are configuration, not separate code paths.
/// Deserializes straight from the `booking` configuration section; any field
/// left out takes its default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookingPolicy {
    /// Bookings are accepted for today through `window_days` ahead, inclusive.
    pub window_days: u32,
    /// How many days past the requested date the next-free trainer scan
    /// covers (the requested day itself is day 0).
    pub suggestion_scan_days: u32,
    /// Reject unknown trainer/zone ids before the conflict scan.
    pub enforce_catalog_refs: bool,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            window_days: 14,
            suggestion_scan_days: 7,
            enforce_catalog_refs: true,
        }
    }
}
