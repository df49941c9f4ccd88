use crate::{
	motor, servo, ActuatorCommandSet, MixerConfig, MixerError, MixerRuntime, RollPitch, RollPitchYaw, ServoWrite,
	RC_CHANNELS, THROTTLE,
};

/// Inputs of one mixing cycle.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MixerInput {
	/// Stick commands, after navigation feedback on fixed-wing.
	pub command: RollPitchYaw<i16>,
	/// µs
	pub throttle: i16,
	/// Output of the stabilization loops.
	pub axis_pid: RollPitchYaw<i16>,
	/// Raw RC channels, µs.
	pub rc_data: [i16; RC_CHANNELS],
	/// decidegrees
	pub attitude: RollPitch<i16>,
	pub armed: bool,
	pub passthrough: bool,
	/// Camera stabilization mode.
	pub camstab: bool,
}

pub struct Mixer {
	config: MixerConfig,
	runtime: MixerRuntime,
}

impl Mixer {
	pub fn new(config: MixerConfig) -> Result<Self, MixerError> {
		let runtime = MixerRuntime::resolve(&config)?;
		Ok(Mixer { config, runtime })
	}

	/// Resolves a new configuration. The current one stays active if it is invalid.
	pub fn reconfigure(&mut self, config: MixerConfig) -> Result<(), MixerError> {
		self.runtime = MixerRuntime::resolve(&config)?;
		self.config = config;
		Ok(())
	}

	pub fn config(&self) -> &MixerConfig {
		&self.config
	}

	pub fn runtime(&self) -> &MixerRuntime {
		&self.runtime
	}

	pub fn runtime_mut(&mut self) -> &mut MixerRuntime {
		&mut self.runtime
	}

	pub fn mix(&self, input: &MixerInput) -> ActuatorCommandSet {
		debug!(target: "mixer_input", "{} {} {} {} {}",
			   input.axis_pid.roll,
			   input.axis_pid.pitch,
			   input.axis_pid.yaw,
			   input.throttle,
			   input.armed);

		let config = &self.config;
		let limits = &config.limits;
		let runtime = &self.runtime;

		let mut axis = input.axis_pid;
		if runtime.motor_count() > 3 {
			axis.yaw = motor::limit_yaw(axis.yaw, input.command.yaw);
		}

		let mut motors: Vec<i32> = runtime
			.motors()
			.iter()
			.map(|mix| motor::mix_linear(mix, input.throttle, &axis, config.yaw_direction))
			.collect();

		// The propeller of a fixed-wing only follows the throttle stick
		if runtime.is_fixed_wing() {
			if let Some(propeller) = motors.first_mut() {
				*propeller = if input.armed {
					input.throttle.max(limits.min_throttle).min(limits.max_throttle) as i32
				} else {
					limits.min_command as i32
				};
			}
		}

		let mut commands = ActuatorCommandSet::new(runtime.motor_count());

		let throttle_motor = motors.first().copied().unwrap_or(0) as i16;
		*commands.servos_mut() = servo::mix(config, runtime, input, &axis, throttle_motor);

		motor::reallocate_headroom(&mut motors, limits.max_throttle);

		let throttle_rc = input.rc_data[THROTTLE];
		for ((command, &motor), &disarmed) in commands
			.motors_mut()
			.iter_mut()
			.zip(motors.iter())
			.zip(runtime.disarmed().iter())
		{
			*command = if input.armed {
				motor::clamp(motor, throttle_rc, &config.features, limits)
			} else {
				disarmed
			};
		}

		debug!(target: "mixer_output", "{:?} {:?}", commands.motors(), commands.servos());

		commands
	}

	/// Physical servo writes for `commands`, mixed from `input`.
	pub fn servo_writes(&self, commands: &ActuatorCommandSet, input: &MixerInput) -> Vec<ServoWrite> {
		servo::writes(&self.config, &self.runtime, commands.servos(), input)
	}
}
