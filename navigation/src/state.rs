use pid::NavPid;
use std::time::Instant;

use crate::{AttitudeBias, NavConfig, NavPhase};

/// Rate of the navigation sub-cycle, matching the GPS fix rate.
pub const NAV_UPDATE_HZ: u32 = 5;

/// One second of derivative history.
pub const HISTORY_LEN: usize = NAV_UPDATE_HZ as usize;

const INTEGRAL_LIMIT: f32 = 500.;

/// Error deltas above this (scaled units) are treated as glitches.
const SPIKE_LIMIT: f32 = 100.;

/// Integral leak deadband in scaled units, i.e. 3 m or 3°.
const LEAK_DEADBAND: f32 = 30.;

pub type NavLoop = NavPid<f32, HISTORY_LEN>;

/// Everything the navigator accumulates across sub-cycles. Owned by the caller and handed to
/// `FixedWingNavigator::update` by exclusive reference every tick.
#[derive(Debug, Clone)]
pub struct NavigationState {
	pub(crate) altitude_loop: NavLoop,
	pub(crate) heading_loop: NavLoop,
	pub(crate) speed_boost: i32,
	pub(crate) last_update: Option<Instant>,
	pub(crate) throttle: i16,
	pub(crate) bias: AttitudeBias,
	pub(crate) heading_error: f32,
	pub(crate) altitude_error: f32,
	pub(crate) phase: NavPhase,
}

impl NavigationState {
	pub fn new(config: &NavConfig) -> Self {
		Self {
			altitude_loop: NavPid::new(config.altitude_pid, LEAK_DEADBAND, INTEGRAL_LIMIT, SPIKE_LIMIT),
			heading_loop: NavPid::new(config.heading_pid, LEAK_DEADBAND, INTEGRAL_LIMIT, SPIKE_LIMIT),
			speed_boost: 0,
			last_update: None,
			throttle: config.cruise_throttle,
			bias: AttitudeBias::default(),
			heading_error: 0.,
			altitude_error: 0.,
			phase: NavPhase::default(),
		}
	}

	/// Zeroes integrators, derivative histories, last errors and the speed boost. Called on
	/// arming and on mode re-entry. The next `update` runs a sub-cycle immediately.
	pub fn reset(&mut self) {
		self.altitude_loop.reset();
		self.heading_loop.reset();
		self.speed_boost = 0;
		self.last_update = None;
		self.heading_error = 0.;
		self.altitude_error = 0.;
		self.phase = NavPhase::default();
	}

	pub fn set_gains(&mut self, config: &NavConfig) {
		self.altitude_loop.set_gains(config.altitude_pid);
		self.heading_loop.set_gains(config.heading_pid);
	}

	pub fn altitude_loop(&self) -> &NavLoop {
		&self.altitude_loop
	}

	pub fn heading_loop(&self) -> &NavLoop {
		&self.heading_loop
	}

	pub fn speed_boost(&self) -> i32 {
		self.speed_boost
	}

	/// Heading error (degrees) fed to the heading loop on the last sub-cycle, before scaling.
	pub fn heading_error(&self) -> f32 {
		self.heading_error
	}

	/// Altitude error (metres, positive when too high) fed to the altitude loop on the last
	/// sub-cycle, before scaling.
	pub fn altitude_error(&self) -> f32 {
		self.altitude_error
	}

	pub fn phase(&self) -> NavPhase {
		self.phase
	}

	pub fn throttle(&self) -> i16 {
		self.throttle
	}

	pub fn bias(&self) -> AttitudeBias {
		self.bias
	}
}
