use thiserror::Error;

use crate::{MAX_MOTORS, MAX_SERVOS, MAX_SERVO_RULES, RC_CHANNELS};

/// Configuration errors, detected when a mixer configuration is resolved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MixerError {
	#[error("custom motor mix has {count} motors, at most {} are supported", MAX_MOTORS)]
	TooManyMotors { count: usize },

	#[error("custom servo mix has {count} rules, at most {} are supported", MAX_SERVO_RULES)]
	TooManyServoRules { count: usize },

	#[error("servo rule targets servo {target}, only {} servos exist", MAX_SERVOS)]
	ServoTargetOutOfRange { target: usize },

	#[error("servo {servo} takes its centre from RC channel {channel}, only {} channels exist", RC_CHANNELS)]
	CenterChannelOutOfRange { servo: usize, channel: usize },

	#[error("motor {motor} is not driven by the current airframe")]
	MotorOutOfRange { motor: usize },

	#[error("no airframe at catalog index {0}")]
	UnknownAirframe(usize),
}
