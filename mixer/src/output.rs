use serde::{Deserialize, Serialize};

use crate::{MAX_MOTORS, MAX_SERVOS, SERVO_NEUTRAL};

/// Motor commands and servo positions of one control cycle, in µs.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActuatorCommandSet {
	motors: [i16; MAX_MOTORS],
	motor_count: usize,
	servos: [i16; MAX_SERVOS],
}

impl ActuatorCommandSet {
	pub fn new(motor_count: usize) -> Self {
		ActuatorCommandSet {
			motors: [0; MAX_MOTORS],
			motor_count: motor_count.min(MAX_MOTORS),
			servos: [SERVO_NEUTRAL; MAX_SERVOS],
		}
	}

	/// Commands of the active motors.
	pub fn motors(&self) -> &[i16] {
		&self.motors[..self.motor_count]
	}

	pub fn motors_mut(&mut self) -> &mut [i16] {
		&mut self.motors[..self.motor_count]
	}

	pub fn servos(&self) -> &[i16; MAX_SERVOS] {
		&self.servos
	}

	pub fn servos_mut(&mut self) -> &mut [i16; MAX_SERVOS] {
		&mut self.servos
	}

	/// Sets every active motor to the same command.
	pub fn write_all(&mut self, command: i16) {
		for motor in self.motors_mut() {
			*motor = command;
		}
	}
}

/// One write to a physical servo output.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct ServoWrite {
	pub output: usize,
	/// µs, 0 stops the signal.
	pub pulse: i16,
}

#[cfg(test)]
mod tests {
	use crate::{ActuatorCommandSet, MAX_MOTORS};

	#[test]
	fn write_all_only_touches_active_motors() {
		let mut commands = ActuatorCommandSet::new(3);
		commands.write_all(1234);

		assert_eq!(commands.motors(), &[1234, 1234, 1234]);
		assert_eq!(commands.servos()[0], 1500);

		let commands = ActuatorCommandSet::new(MAX_MOTORS + 4);
		assert_eq!(commands.motors().len(), MAX_MOTORS);
	}
}
