use serde::{Deserialize, Serialize};

/// Tuning of the fixed-wing navigator. Throttle values are in servo microseconds, angles in
/// degrees, altitudes and distances in metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
	/// (kp, ki, kd) of the altitude loop, driving pitch.
	pub altitude_pid: (f32, f32, f32),
	/// (kp, ki, kd) of the heading loop, driving roll and yaw.
	pub heading_pid: (f32, f32, f32),
	pub cruise_throttle: i16,
	pub idle_throttle: i16,
	pub climb_throttle: i16,
	/// Throttle added per metre below the target altitude.
	pub throttle_scaler: f32,
	/// Altitude above home to return at.
	pub rth_altitude: i32,
	pub max_climb_angle: i16,
	pub max_dive_angle: i16,
	pub max_correction_angle: i16,
	pub max_rudder_angle: i16,
	/// Below this altitude above home, climb-out keeps the wings level.
	pub safe_nav_altitude: i32,
	/// Radius around home inside which descending to the return altitude is allowed.
	pub safe_descent_radius: u32,
}

impl Default for NavConfig {
	fn default() -> Self {
		NavConfig {
			altitude_pid: (2.5, 0.05, 0.05),
			heading_pid: (1.4, 0.2, 0.08),
			cruise_throttle: 1500,
			idle_throttle: 1300,
			climb_throttle: 1900,
			throttle_scaler: 8.,
			rth_altitude: 40,
			max_climb_angle: 15,
			max_dive_angle: 15,
			max_correction_angle: 20,
			max_rudder_angle: 15,
			safe_nav_altitude: 20,
			safe_descent_radius: 50,
		}
	}
}
