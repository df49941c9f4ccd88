use crate::{
	Airframe, MixerConfig, MixerError, MotorMix, ServoCenter, ServoRule, Table, MAX_MOTORS, MAX_SERVOS,
	MAX_SERVO_RULES, RC_CHANNELS,
};

/// Mixing tables of the current session, resolved from a `MixerConfig`.
#[derive(Debug, Clone, PartialEq)]
pub struct MixerRuntime {
	airframe: Airframe,
	motors: Vec<MotorMix>,
	servo_rules: Vec<ServoRule>,
	servo_enabled: bool,
	fixed_wing: bool,
	disarmed: [i16; MAX_MOTORS],
}

impl MixerRuntime {
	pub fn resolve(config: &MixerConfig) -> Result<Self, MixerError> {
		for (servo, servo_config) in config.servos.iter().enumerate() {
			if let ServoCenter::RcChannel(channel) = servo_config.center {
				if channel >= RC_CHANNELS {
					return Err(MixerError::CenterChannelOutOfRange { servo, channel });
				}
			}
		}

		let airframe = config.airframe;
		let profile = airframe.profile();

		let mut motors = match profile.motors {
			Table::Builtin(motors) => motors.to_vec(),
			Table::Custom => custom_motors(&config.custom_motor_mix)?,
		};

		let servo_enabled = profile.uses_servos || config.features.servo_tilt;

		let servo_rules = if servo_enabled {
			match profile.servo_rules {
				Table::Builtin(rules) => rules.to_vec(),
				Table::Custom => custom_servo_rules(&config.custom_servo_mix)?,
			}
		} else {
			Vec::new()
		};

		// Bidirectional ESCs have half the authority in each direction
		if config.features.bidirectional && motors.len() > 1 {
			for motor in motors.iter_mut() {
				motor.roll *= 0.5;
				motor.pitch *= 0.5;
				motor.yaw *= 0.5;
			}
		}

		let mut runtime = MixerRuntime {
			airframe,
			motors,
			servo_rules,
			servo_enabled,
			fixed_wing: airframe.is_fixed_wing(),
			disarmed: [0; MAX_MOTORS],
		};
		runtime.reset_disarmed(config);

		info!(
			"Mixer resolved for {:?}: {} motors, {} servo rules, servos {}",
			airframe,
			runtime.motors.len(),
			runtime.servo_rules.len(),
			if servo_enabled { "enabled" } else { "disabled" }
		);

		Ok(runtime)
	}

	pub fn airframe(&self) -> Airframe {
		self.airframe
	}

	pub fn motor_count(&self) -> usize {
		self.motors.len()
	}

	pub fn motors(&self) -> &[MotorMix] {
		&self.motors
	}

	pub fn servo_rules(&self) -> &[ServoRule] {
		&self.servo_rules
	}

	pub fn servo_enabled(&self) -> bool {
		self.servo_enabled
	}

	pub fn is_fixed_wing(&self) -> bool {
		self.fixed_wing
	}

	/// Command of every motor while disarmed.
	pub fn disarmed(&self) -> &[i16] {
		&self.disarmed[..self.motors.len()]
	}

	/// Overrides the disarmed command of one motor, for motor tests with the props off.
	pub fn set_disarmed_command(&mut self, motor: usize, command: i16) -> Result<(), MixerError> {
		if motor >= self.motors.len() {
			return Err(MixerError::MotorOutOfRange { motor });
		}

		info!("Motor {} disarmed command set to {}", motor, command);
		self.disarmed[motor] = command;
		Ok(())
	}

	pub fn reset_disarmed(&mut self, config: &MixerConfig) {
		let command = if config.features.bidirectional {
			config.limits.neutral_3d
		} else {
			config.limits.min_command
		};

		self.disarmed = [command; MAX_MOTORS];
	}
}

fn custom_motors(slot: &[MotorMix]) -> Result<Vec<MotorMix>, MixerError> {
	let motors: Vec<MotorMix> = slot
		.iter()
		.take_while(|motor| motor.throttle != 0.)
		.copied()
		.collect();

	if motors.len() > MAX_MOTORS {
		return Err(MixerError::TooManyMotors { count: motors.len() });
	}

	Ok(motors)
}

fn custom_servo_rules(slot: &[ServoRule]) -> Result<Vec<ServoRule>, MixerError> {
	let rules: Vec<ServoRule> = slot
		.iter()
		.take_while(|rule| rule.target != 0)
		.copied()
		.collect();

	if rules.len() > MAX_SERVO_RULES {
		return Err(MixerError::TooManyServoRules { count: rules.len() });
	}

	if let Some(rule) = rules.iter().find(|rule| rule.target >= MAX_SERVOS) {
		return Err(MixerError::ServoTargetOutOfRange { target: rule.target });
	}

	Ok(rules)
}
