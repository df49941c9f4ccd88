use mixer::{ActuatorCommandSet, RollPitchYaw, ServoWrite, RC_CHANNELS};
use navigation::{Attitude, AttitudeBias, FlightModes, GpsData};

/// Everything the flight controller reads during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
	/// Mode switches. `climb_out` is owned by the flight controller and ignored here.
	pub modes: FlightModes,
	/// Stick commands, centred on zero.
	pub command: RollPitchYaw<i16>,
	/// µs
	pub throttle: i16,
	pub axis_pid: RollPitchYaw<i16>,
	pub rc_data: [i16; RC_CHANNELS],
	pub attitude: Attitude,
	/// `None` without GPS fix.
	pub gps: Option<GpsData>,
	pub camstab: bool,
}

/// Result of one tick, for the actuator sink and the stabilization loop.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFrame {
	pub commands: ActuatorCommandSet,
	pub servo_writes: Vec<ServoWrite>,
	/// Throttle and yaw commands after navigation feedback.
	pub throttle: i16,
	pub yaw: i16,
	/// Offsets of the stabilization targets, zero when not navigating.
	pub bias: AttitudeBias,
	/// New GPS hold altitude requested by the navigator.
	pub hold_altitude: Option<i32>,
	pub modes: FlightModes,
}
