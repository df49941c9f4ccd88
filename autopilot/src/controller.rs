use std::time::{Duration, Instant};

use mixer::{Mixer, MixerConfig, MixerError, MixerInput, RollPitch, RollPitchYaw, THROTTLE};
use navigation::{AttitudeBias, FixedWingNavigator, FlightModes, NavConfig, NavTransition, NavigationState};

use crate::frame::{InputFrame, OutputFrame};
use crate::traits::Autopilot;
use crate::FlightConfig;

/// Mixer and fixed-wing navigator, ticked once per control loop iteration.
pub struct FlightController {
	mixer: Mixer,
	navigator: FixedWingNavigator,
	nav_state: NavigationState,
	climb_out: bool,
	/// Set by a failsafe landing, cleared when the arm switch is cycled.
	failsafe_disarmed: bool,
	previously_armed: bool,
	previously_home: bool,
}

impl FlightController {
	pub fn new(config: &FlightConfig) -> Result<Self, MixerError> {
		let navigator = FixedWingNavigator::new(config.navigation.clone());
		let nav_state = navigator.new_state();

		Ok(FlightController {
			mixer: Mixer::new(config.mixer.clone())?,
			navigator,
			nav_state,
			climb_out: false,
			failsafe_disarmed: false,
			previously_armed: false,
			previously_home: false,
		})
	}

	/// Must be called between ticks.
	pub fn reconfigure(&mut self, config: MixerConfig) -> Result<(), MixerError> {
		self.mixer.reconfigure(config)
	}

	pub fn set_nav_config(&mut self, config: NavConfig) {
		self.navigator.set_config(config, &mut self.nav_state);
	}

	pub fn mixer(&self) -> &Mixer {
		&self.mixer
	}

	pub fn mixer_mut(&mut self) -> &mut Mixer {
		&mut self.mixer
	}

	pub fn nav_state(&self) -> &NavigationState {
		&self.nav_state
	}

	fn update_modes(&mut self, input_frame: &InputFrame) -> FlightModes {
		let switches = input_frame.modes;
		let mut modes = FlightModes { climb_out: self.climb_out, ..switches };

		if switches.armed && !self.previously_armed {
			info!("Armed");
			self.failsafe_disarmed = false;
			self.nav_state.reset();
		} else if !switches.armed && self.previously_armed {
			info!("Disarmed");
		}
		self.previously_armed = switches.armed;

		if self.failsafe_disarmed {
			modes.armed = false;
		}

		if switches.gps_home && !self.previously_home {
			info!("Return to home");
			if self.mixer.runtime().is_fixed_wing() {
				self.navigator.begin_return(&mut self.nav_state, &mut modes);
			} else {
				self.nav_state.reset();
			}
		} else if !switches.gps_home && self.previously_home {
			modes.climb_out = false;
		}
		self.previously_home = switches.gps_home;

		modes
	}

	pub fn tick(&mut self, input_frame: &InputFrame, now: Instant) -> OutputFrame {
		let mut modes = self.update_modes(input_frame);

		let mut throttle = input_frame.throttle;
		let mut yaw = input_frame.command.yaw;
		let mut bias = AttitudeBias::default();
		let mut hold_altitude = None;

		let fixed_wing = self.mixer.runtime().is_fixed_wing();

		if let Some(gps) = input_frame.gps.filter(|_| fixed_wing) {
			let nav_input = navigation::NavInput {
				gps,
				attitude: input_frame.attitude,
				throttle_stick: input_frame.rc_data[THROTTLE],
			};

			let nav_output = self.navigator.update(&mut self.nav_state, &nav_input, &mut modes, now);

			if nav_output.transitions.contains(&NavTransition::FailsafeDisarm) {
				self.failsafe_disarmed = true;
			}

			throttle = nav_output.throttle;
			yaw = yaw.saturating_add(nav_output.bias.yaw);
			bias = nav_output.bias;
			hold_altitude = nav_output.hold_altitude;
		}

		self.climb_out = modes.climb_out;

		let mixer_input = MixerInput {
			command: RollPitchYaw {
				roll: input_frame.command.roll,
				pitch: input_frame.command.pitch,
				yaw,
			},
			throttle,
			axis_pid: input_frame.axis_pid,
			rc_data: input_frame.rc_data,
			attitude: RollPitch {
				roll: input_frame.attitude.roll,
				pitch: input_frame.attitude.pitch,
			},
			armed: modes.armed,
			passthrough: modes.passthrough,
			camstab: input_frame.camstab,
		};

		let commands = self.mixer.mix(&mixer_input);
		let servo_writes = self.mixer.servo_writes(&commands, &mixer_input);

		OutputFrame {
			commands,
			servo_writes,
			throttle,
			yaw,
			bias,
			hold_altitude,
			modes,
		}
	}
}

impl Autopilot<InputFrame, OutputFrame> for FlightController {
	const MAX_CONTROL_LOOP_PERIOD: Duration = Duration::from_millis(50);

	fn output_frame(&mut self, input_frame: InputFrame) -> OutputFrame {
		self.tick(&input_frame, Instant::now())
	}
}

#[cfg(test)]
mod tests {
	use std::time::{Duration, Instant};

	use mixer::{Airframe, THROTTLE};
	use navigation::{FlightModes, GpsData, NavConfig, NavPhase};

	use crate::{FlightConfig, FlightController, InputFrame};

	const HOME: i32 = 100;

	fn controller(airframe: Airframe) -> FlightController {
		let mut config = FlightConfig::default();
		config.mixer.airframe = airframe;
		FlightController::new(&config).unwrap()
	}

	fn frame(throttle: i16) -> InputFrame {
		let mut frame = InputFrame {
			modes: FlightModes { armed: true, angle: true, ..Default::default() },
			throttle,
			rc_data: [1500; 18],
			..Default::default()
		};
		frame.rc_data[THROTTLE] = throttle;
		frame
	}

	fn gps(altitude: i32, distance_to_home: u32) -> GpsData {
		GpsData {
			altitude: HOME + altitude,
			home_altitude: HOME,
			hold_altitude: HOME + 40,
			ground_speed: 500,
			distance_to_home,
			..Default::default()
		}
	}

	#[test]
	fn multirotor_ignores_navigation() {
		let mut controller = controller(Airframe::QuadX);
		let mut frame = frame(1400);
		frame.gps = Some(gps(0, 8));
		frame.modes.failsafe_rth = true;
		frame.modes.gps_home = true;
		frame.command.yaw = 30;

		let output = controller.tick(&frame, Instant::now());

		assert!(output.modes.armed);
		assert!(!output.modes.climb_out);
		assert_eq!(output.throttle, 1400);
		assert_eq!(output.yaw, 30);
		assert_eq!(output.commands.motors(), &[1400; 4]);
	}

	#[test]
	fn fixed_wing_cruise() {
		let mut controller = controller(Airframe::Airplane);
		let mut frame = frame(1200);
		frame.gps = Some(gps(40, 500));

		let output = controller.tick(&frame, Instant::now());

		assert_eq!(output.throttle, 1500);
		assert_eq!(output.commands.motors(), &[1500]);
		assert_eq!(output.servo_writes.len(), 4);
	}

	#[test]
	fn fixed_wing_without_gps_flies_manually() {
		let mut controller = controller(Airframe::Airplane);

		let output = controller.tick(&frame(1200), Instant::now());

		assert_eq!(output.throttle, 1200);
		assert_eq!(output.bias, Default::default());
		assert_eq!(output.commands.motors(), &[1200]);
	}

	#[test]
	fn manual_fixed_wing_flight_uses_raw_throttle_stick() {
		let mut controller = controller(Airframe::Airplane);
		let mut frame = frame(1200);
		frame.rc_data[THROTTLE] = 1250;
		frame.modes.angle = false;
		frame.gps = Some(gps(10, 500));

		let output = controller.tick(&frame, Instant::now());

		assert_eq!(output.throttle, 1250);
		assert_eq!(output.bias, Default::default());
		assert_eq!(output.commands.motors(), &[1250]);
	}

	#[test]
	fn heading_correction_feeds_yaw_command() {
		let mut controller = controller(Airframe::FlyingWing);
		let mut frame = frame(1200);
		let mut gps = gps(40, 500);
		gps.bearing = 3000;
		frame.gps = Some(gps);
		frame.command.yaw = 10;

		let output = controller.tick(&frame, Instant::now());

		assert!(output.bias.yaw > 0);
		assert_eq!(output.yaw, 10 + output.bias.yaw);
	}

	#[test]
	fn return_to_home_starts_climb_out() {
		let mut controller = controller(Airframe::Airplane);
		let mut frame = frame(1200);
		frame.gps = Some(gps(10, 500));
		let start = Instant::now();

		let output = controller.tick(&frame, start);
		assert!(!output.modes.climb_out);

		frame.modes.gps_home = true;
		let output = controller.tick(&frame, start + Duration::from_millis(50));
		assert!(output.modes.climb_out);
		assert_eq!(output.throttle, 1900);
		assert_eq!(controller.nav_state().phase(), NavPhase::ClimbOut);

		// Climb-out is kept between ticks
		let output = controller.tick(&frame, start + Duration::from_millis(100));
		assert!(output.modes.climb_out);

		frame.modes.gps_home = false;
		let output = controller.tick(&frame, start + Duration::from_millis(150));
		assert!(!output.modes.climb_out);
	}

	#[test]
	fn failsafe_disarm_holds_until_rearmed() {
		let mut controller = controller(Airframe::Airplane);
		let mut frame = frame(1600);
		frame.gps = Some(gps(40, 8));
		frame.modes.failsafe_rth = true;
		frame.modes.gps_home = true;
		let start = Instant::now();

		let output = controller.tick(&frame, start);
		assert!(!output.modes.armed);
		assert_eq!(output.hold_altitude, Some(HOME + 5));
		assert_eq!(output.commands.motors(), &[1000]);

		// Still far from home on the next ticks, the arm switch did not move
		frame.gps = Some(gps(40, 500));
		frame.modes.failsafe_rth = false;
		let output = controller.tick(&frame, start + Duration::from_millis(400));
		assert!(!output.modes.armed);
		assert_eq!(output.commands.motors(), &[1000]);

		frame.modes.armed = false;
		controller.tick(&frame, start + Duration::from_millis(450));
		frame.modes.armed = true;
		let output = controller.tick(&frame, start + Duration::from_millis(500));
		assert!(output.modes.armed);
		assert_eq!(output.commands.motors(), &[1500]);
	}

	#[test]
	fn navigation_tuning_applies_on_next_tick() {
		let mut controller = controller(Airframe::Airplane);
		let mut frame = frame(1200);
		frame.gps = Some(gps(40, 500));

		let mut config = NavConfig::default();
		config.cruise_throttle = 1600;
		controller.set_nav_config(config);
		let output = controller.tick(&frame, Instant::now());

		assert_eq!(output.throttle, 1600);
	}

	#[test]
	fn disarmed_motor_override() {
		let mut controller = controller(Airframe::QuadX);
		controller.mixer_mut().runtime_mut().set_disarmed_command(2, 1100).unwrap();
		let mut frame = frame(1400);
		frame.modes.armed = false;

		let output = controller.tick(&frame, Instant::now());

		assert_eq!(output.commands.motors(), &[1000, 1000, 1100, 1000]);
	}

	#[test]
	fn reconfigure_between_ticks() {
		let mut controller = controller(Airframe::QuadX);
		let mut config = controller.mixer().config().clone();
		config.airframe = Airframe::Hex6X;

		controller.reconfigure(config).unwrap();
		let output = controller.tick(&frame(1400), Instant::now());

		assert_eq!(output.commands.motors().len(), 6);
	}
}
