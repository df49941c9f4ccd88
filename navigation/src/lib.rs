//! Units used throughout the crate unless stated otherwise:
//! - Altitudes and distances: metres.
//! - Ground speed: cm/s.
//! - Ground course: decidegrees. Bearing to target: centidegrees.
//! - Headings and heading errors: degrees.
//! - Attitude angles and attitude biases: decidegrees, positive pitch is nose down.

#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;

#[macro_use]
extern crate log;

mod config;
mod fixed_wing;
mod modes;
mod state;

pub use crate::config::NavConfig;
pub use crate::fixed_wing::{Attitude, AttitudeBias, FixedWingNavigator, GpsData, NavInput, NavOutput};
pub use crate::modes::{FlightModes, NavPhase, NavTransition};
pub use crate::state::{NavLoop, NavigationState, HISTORY_LEN, NAV_UPDATE_HZ};

/// Heading error beyond which the turn direction is forced, see `normalize_heading_error`.
pub const TURN_AROUND_THRESHOLD: f32 = 170.;

/// Heading error commanded when turning around.
pub const TURN_AROUND_ERROR: f32 = 175.;

/// Magnetometer and GPS course may disagree by this many degrees before GPS course wins.
const MAG_DISAGREEMENT_DEG: f32 = 10.;

/// GPS course is only trusted over the magnetometer above this ground speed (cm/s).
const MIN_COURSE_SPEED: i32 = 200;

/// Wraps a course in decidegrees into `[-1800, 1800]`.
pub fn wrap_decidegrees(mut course: i32) -> i32 {
	while course > 1800 {
		course -= 3600;
	}
	while course < -1800 {
		course += 3600;
	}
	course
}

/// Wraps a heading error in degrees into `(-180, 180]`. Errors still larger than
/// `TURN_AROUND_THRESHOLD` in magnitude are replaced by `TURN_AROUND_ERROR`, so that a target
/// straight behind always resolves to the same turn direction.
pub fn normalize_heading_error(error: f32) -> f32 {
	let mut wrapped = error % 360.;
	if wrapped <= -180. {
		wrapped += 360.;
	} else if wrapped > 180. {
		wrapped -= 360.;
	}

	if wrapped.abs() > TURN_AROUND_THRESHOLD {
		TURN_AROUND_ERROR
	} else {
		wrapped
	}
}

/// Returns the current heading in degrees.
///
/// Without magnetometer the GPS ground course is used. With one, the magnetic heading is preferred
/// unless it disagrees with the ground course by more than 10° while the ground speed is high
/// enough for the course to be meaningful.
pub fn fuse_heading(ground_course: i32, ground_speed: i32, magnetic_heading: Option<i16>) -> f32 {
	let course = wrap_decidegrees(ground_course) as f32 / 10.;

	match magnetic_heading {
		Some(heading) => {
			let heading = heading as f32;
			if (heading - course).abs() > MAG_DISAGREEMENT_DEG && ground_speed > MIN_COURSE_SPEED {
				course
			} else {
				heading
			}
		}
		None => course,
	}
}
