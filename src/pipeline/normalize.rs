use crate::common::types::NormalizedCoordinate;
use crate::pipeline::coordinates::ValidatedCoordinates;

const FULL_TURN: f64 = 360.0;

/// Re-expresses the fitted position in the Carrington frame.
///
/// LON_FWT is measured from the observer's central meridian, so adding the
/// observer's Carrington longitude gives a Carrington longitude, wrapped into [0, 360).
pub fn normalize(coords: &ValidatedCoordinates) -> NormalizedCoordinate {
    let latitude = round3(coords.lat_fwt);

    let mut longitude = round3((coords.lon_fwt + coords.crln_obs).rem_euclid(FULL_TURN));
    if longitude >= FULL_TURN {
        longitude -= FULL_TURN;
    }

    NormalizedCoordinate {
        latitude,
        longitude,
    }
}

/// Three decimal places, ties to even
fn round3(value: f64) -> f64 {
    let rounded = (value * 1000.0).round_ties_even() / 1000.0;
    // avoid printing "-0.0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
