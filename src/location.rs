//! Resolving the starting position from a geolocation source.

use tracing::{debug, warn};

use crate::bounds::BoundsPolicy;
use crate::coordinate::Coordinate;
use crate::error::LocationError;
use crate::traits::LocationProvider;

/// Always reports the same position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation(pub Coordinate);

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }
}

/// A position inside the bounds is used as-is; anything else, including a
/// failed lookup, falls back to the policy's fallback coordinate.
pub fn resolve_start_location<P: LocationProvider>(
    provider: &P,
    policy: &BoundsPolicy,
) -> Coordinate {
    match provider.current_location() {
        Ok(position) if policy.contains(position) => position,
        Ok(position) => {
            debug!(
                lat = position.lat,
                lng = position.lng,
                "position outside service area, using fallback"
            );
            policy.fallback()
        }
        Err(err) => {
            warn!(error = %err, "geolocation failed, using fallback");
            policy.fallback()
        }
    }
}
