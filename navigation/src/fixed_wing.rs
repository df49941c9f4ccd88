use std::time::{Duration, Instant};

use crate::state::NAV_UPDATE_HZ;
use crate::{fuse_heading, normalize_heading_error, FlightModes, NavConfig, NavTransition, NavigationState};

/// Errors enter the loops in tenths (decidegrees, decimetres).
const ERROR_SCALE: f32 = 10.;

/// Radius around home (m) where heading corrections are damped and a failsafe return lands.
const HOME_RADIUS: u32 = 10;
const HOME_DAMPING: f32 = 0.1;

/// Hold altitude above home (m) set by a failsafe landing.
const FAILSAFE_LANDING_ALTITUDE: i32 = 5;

/// Altitude error (m) inside which the cruise throttle is held.
const THROTTLE_DEADBAND: f32 = 1.;

const PITCH_TO_THROTTLE: f32 = 0.5;
const MAX_PITCH_THROTTLE: f32 = 450.;

/// Ground speed (cm/s) the speed boost defends, about 18 km/h.
const MIN_GROUND_SPEED: i32 = 500;
const GROUND_SPEED_BAND: i32 = 50;
const SPEED_BOOST_GAIN: f32 = 0.1;
const MAX_SPEED_BOOST: i32 = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GpsData {
	/// Altitude (m).
	pub altitude: i32,
	pub home_altitude: i32,
	/// Target altitude (m). The navigator may request a new value through `NavOutput`.
	pub hold_altitude: i32,
	/// cm/s
	pub ground_speed: i32,
	/// decidegrees
	pub ground_course: i32,
	/// Bearing to the current target, centidegrees.
	pub bearing: i32,
	/// m
	pub distance_to_home: u32,
}

/// Output of the attitude estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Attitude {
	/// decidegrees
	pub roll: i16,
	/// decidegrees, positive nose down
	pub pitch: i16,
	/// Degrees. `None` without magnetometer.
	pub magnetic_heading: Option<i16>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NavInput {
	pub gps: GpsData,
	pub attitude: Attitude,
	/// Raw throttle stick, used as is in manual flight.
	pub throttle_stick: i16,
}

/// Attitude offsets requested by the navigator, in decidegrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttitudeBias {
	pub roll: i16,
	pub pitch: i16,
	pub yaw: i16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavOutput {
	/// Replaces the throttle command.
	pub throttle: i16,
	/// `yaw` is added to the yaw command; `roll` and `pitch` offset the stabilization targets.
	pub bias: AttitudeBias,
	/// New hold altitude to write back to the GPS target. `None` when the target is unchanged.
	pub hold_altitude: Option<i32>,
	pub transitions: Vec<NavTransition>,
}

fn constrain(value: f32, low: f32, high: f32) -> f32 {
	value.max(low).min(high)
}

/// Heading and altitude keeping for fixed-wing aircraft.
///
/// `update` is called every control tick; the actual computation runs at `NAV_UPDATE_HZ` and the
/// last throttle and bias are repeated in between.
pub struct FixedWingNavigator {
	config: NavConfig,
}

impl FixedWingNavigator {
	pub fn new(config: NavConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &NavConfig {
		&self.config
	}

	pub fn new_state(&self) -> NavigationState {
		NavigationState::new(&self.config)
	}

	pub fn set_config(&mut self, config: NavConfig, state: &mut NavigationState) {
		state.set_gains(&config);
		self.config = config;
	}

	fn period() -> Duration {
		Duration::from_millis(1000 / NAV_UPDATE_HZ as u64)
	}

	pub fn update(
		&self,
		state: &mut NavigationState,
		input: &NavInput,
		modes: &mut FlightModes,
		now: Instant,
	) -> NavOutput {
		let mut output = NavOutput {
			throttle: state.throttle,
			bias: state.bias,
			hold_altitude: None,
			transitions: Vec::new(),
		};

		// Never return below the return altitude, checked every tick
		if modes.climb_out && input.gps.altitude - input.gps.home_altitude < self.config.rth_altitude {
			Self::request_hold_altitude(&input.gps, input.gps.home_altitude + self.config.rth_altitude, &mut output);
		}

		let elapsed = state
			.last_update
			.map(|last_update| now.saturating_duration_since(last_update));

		if elapsed.map_or(true, |elapsed| elapsed >= Self::period()) {
			let dt = elapsed.unwrap_or_else(Self::period).as_secs_f32();
			state.last_update = Some(now);
			self.sub_cycle(state, input, modes, dt, &mut output);
		}

		if modes.navigation_bypassed() {
			state.throttle = input.throttle_stick;
			state.bias = AttitudeBias::default();
		}

		output.throttle = state.throttle;
		output.bias = state.bias;
		output
	}

	/// Starts a return to home: the loops restart from zero and the aircraft climbs out first.
	pub fn begin_return(&self, state: &mut NavigationState, modes: &mut FlightModes) {
		state.reset();
		Self::apply(state, modes, NavTransition::EnterClimbOut);
	}

	/// Returns whether `altitude` differs from the current hold altitude.
	fn request_hold_altitude(gps: &GpsData, altitude: i32, output: &mut NavOutput) -> bool {
		let changed = gps.hold_altitude != altitude;
		if changed {
			output.hold_altitude = Some(altitude);
		}
		changed
	}

	fn apply(state: &mut NavigationState, modes: &mut FlightModes, transition: NavTransition) {
		match transition {
			NavTransition::FailsafeDisarm => warn!("Failsafe return reached home, disarming"),
			_ => info!("Navigation: {:?}", transition),
		}

		modes.apply(transition);
		state.phase = state.phase.after(transition);
	}

	fn transition(
		state: &mut NavigationState,
		modes: &mut FlightModes,
		transition: NavTransition,
		output: &mut NavOutput,
	) {
		Self::apply(state, modes, transition);
		output.transitions.push(transition);
	}

	fn sub_cycle(
		&self,
		state: &mut NavigationState,
		input: &NavInput,
		modes: &mut FlightModes,
		dt: f32,
		output: &mut NavOutput,
	) {
		let config = &self.config;
		let gps = &input.gps;
		let attitude = &input.attitude;

		let idle_throttle = config.idle_throttle as f32;
		let climb_throttle = config.climb_throttle as f32;

		let current_altitude = gps.altitude - gps.home_altitude;
		let target_altitude = gps.hold_altitude - gps.home_altitude;
		let return_altitude = gps.home_altitude + config.rth_altitude;

		let heading = fuse_heading(gps.ground_course, gps.ground_speed, attitude.magnetic_heading);
		let mut heading_error = gps.bearing as f32 / 100. - heading;
		// Positive when too high
		let mut altitude_error = (current_altitude - target_altitude) as f32;

		let mut throttle = if altitude_error.abs() < THROTTLE_DEADBAND {
			config.cruise_throttle as f32
		} else {
			constrain(
				config.cruise_throttle as f32 - altitude_error * config.throttle_scaler,
				idle_throttle,
				climb_throttle,
			)
		};

		if modes.climb_out && altitude_error >= 0. {
			Self::transition(state, modes, NavTransition::ClimbOutComplete, output);
		}

		if modes.gps_home {
			if modes.climb_out {
				altitude_error = -(config.max_climb_angle as f32 * ERROR_SCALE);
				throttle = climb_throttle;

				if current_altitude < config.safe_nav_altitude {
					heading_error = 0.;
				}
			}

			if gps.distance_to_home < config.safe_descent_radius
				&& current_altitude > config.rth_altitude
				&& Self::request_hold_altitude(gps, return_altitude, output)
			{
				Self::transition(state, modes, NavTransition::BeginRthDescent, output);
			}
		}

		if modes.failsafe_rth && gps.distance_to_home < HOME_RADIUS {
			if modes.armed || modes.climb_out {
				Self::transition(state, modes, NavTransition::FailsafeDisarm, output);
			}
			Self::request_hold_altitude(gps, gps.home_altitude + FAILSAFE_LANDING_ALTITUDE, output);
		}

		if gps.distance_to_home < HOME_RADIUS {
			heading_error *= HOME_DAMPING;
		}

		let heading_error = normalize_heading_error(heading_error);

		state.heading_error = heading_error;
		state.altitude_error = altitude_error;

		let altitude = state.altitude_loop.update(altitude_error * ERROR_SCALE, dt);
		let heading = state.heading_loop.update(heading_error * ERROR_SCALE, dt);

		let max_climb = config.max_climb_angle as f32 * ERROR_SCALE;
		let max_dive = config.max_dive_angle as f32 * ERROR_SCALE;
		let max_correction = config.max_correction_angle as f32 * ERROR_SCALE;
		let max_rudder = config.max_rudder_angle as f32 * ERROR_SCALE;

		let mut pitch = constrain(altitude.proportional_integral / ERROR_SCALE, -max_climb, max_dive)
			+ altitude.derivative;
		let roll = constrain(heading.proportional_integral / ERROR_SCALE, -max_correction, max_correction)
			+ heading.derivative;
		let yaw = constrain(heading.proportional_integral / ERROR_SCALE, -max_rudder, max_rudder)
			+ heading.derivative;

		// No nose-up without thrust
		if modes.motors_stopped {
			pitch = constrain(pitch, 0., max_dive);
		}
		// Up elevator in turns
		pitch -= (attitude.roll as f32).abs();

		throttle -= constrain(attitude.pitch as f32 * PITCH_TO_THROTTLE, 0., MAX_PITCH_THROTTLE);
		throttle = constrain(throttle, idle_throttle, climb_throttle);

		if (gps.ground_speed - MIN_GROUND_SPEED).abs() > GROUND_SPEED_BAND {
			state.speed_boost += ((MIN_GROUND_SPEED - gps.ground_speed) as f32 * SPEED_BOOST_GAIN) as i32;
		}
		state.speed_boost = state.speed_boost.max(0).min(MAX_SPEED_BOOST);
		throttle += state.speed_boost as f32;

		state.throttle = throttle as i16;
		state.bias = AttitudeBias {
			roll: roll as i16,
			pitch: pitch as i16,
			yaw: yaw as i16,
		};

		debug!(target: "nav_output", "{} {} {} {} {:.1} {:.1}",
			   state.throttle,
			   state.bias.roll,
			   state.bias.pitch,
			   state.bias.yaw,
			   heading_error,
			   altitude_error);
	}
}
