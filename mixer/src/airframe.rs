use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::MixerError;

/// Weights applied to the throttle, roll, pitch and yaw commands for one motor.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq)]
pub struct MotorMix {
	pub throttle: f32,
	pub roll: f32,
	pub pitch: f32,
	pub yaw: f32,
}

pub const fn mix(throttle: f32, roll: f32, pitch: f32, yaw: f32) -> MotorMix {
	MotorMix { throttle, roll, pitch, yaw }
}

/// Entries of the virtual servo input vector.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputChannel {
	/// Stabilized roll, or the roll stick in passthrough.
	Roll,
	Pitch,
	Yaw,
	/// Command of motor 0.
	Throttle,
	/// `mid_rc - AUX1`
	Aux1,
	Aux2,
	Aux3,
	Aux4,
	/// `mid_rc - ` raw roll stick
	RcRoll,
	RcPitch,
	RcYaw,
	RcThrottle,
	AnglePitch,
	AngleRoll,
}

impl InputChannel {
	pub const COUNT: usize = 14;

	pub fn index(self) -> usize {
		self as usize
	}
}

/// `target += direction * source * rate / 100`
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct ServoRule {
	pub target: usize,
	pub source: InputChannel,
	/// %
	pub rate: i16,
}

const fn rule(target: usize, source: InputChannel, rate: i16) -> ServoRule {
	ServoRule { target, source, rate }
}

/// Where the tables of an airframe come from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Table<T: 'static> {
	Builtin(&'static [T]),
	/// User-defined slot of the mixer configuration.
	Custom,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AirframeProfile {
	pub motors: Table<MotorMix>,
	pub servo_rules: Table<ServoRule>,
	/// The airframe drives servos on its own, regardless of the servo tilt feature.
	pub uses_servos: bool,
}

const NONE: &[MotorMix] = &[];
const NO_RULES: &[ServoRule] = &[];

/// Propulsion only, used by airframes steered with servos.
const SINGLE: &[MotorMix] = &[mix(1., 0., 0., 0.)];

const TRI: &[MotorMix] = &[
	mix(1., 0., 1.333333, 0.),    // Rear
	mix(1., -1., -0.666667, 0.),  // Right
	mix(1., 1., -0.666667, 0.),   // Left
];

const QUAD_P: &[MotorMix] = &[
	mix(1., 0., 1., -1.),  // Rear
	mix(1., -1., 0., 1.),  // Right
	mix(1., 1., 0., 1.),   // Left
	mix(1., 0., -1., -1.), // Front
];

const QUAD_X: &[MotorMix] = &[
	mix(1., -1., 1., -1.), // Rear right
	mix(1., -1., -1., 1.), // Front right
	mix(1., 1., 1., 1.),   // Rear left
	mix(1., 1., -1., -1.), // Front left
];

const BI: &[MotorMix] = &[
	mix(1., 1., 0., 0.),  // Left
	mix(1., -1., 0., 0.), // Right
];

const Y6: &[MotorMix] = &[
	mix(1., 0., 1.333333, 1.),    // Rear
	mix(1., -1., -0.666667, -1.), // Right
	mix(1., 1., -0.666667, -1.),  // Left
	mix(1., 0., 1.333333, -1.),   // Under rear
	mix(1., -1., -0.666667, 1.),  // Under right
	mix(1., 1., -0.666667, 1.),   // Under left
];

const HEX6_P: &[MotorMix] = &[
	mix(1., -0.866025, 0.5, 1.),   // Rear right
	mix(1., -0.866025, -0.5, -1.), // Front right
	mix(1., 0.866025, 0.5, 1.),    // Rear left
	mix(1., 0.866025, -0.5, -1.),  // Front left
	mix(1., 0., -1., 1.),          // Front
	mix(1., 0., 1., -1.),          // Rear
];

const Y4: &[MotorMix] = &[
	mix(1., 0., 1., -1.), // Rear top, CW
	mix(1., -1., -1., 0.), // Front right, CCW
	mix(1., 0., 1., 1.),  // Rear bottom, CCW
	mix(1., 1., -1., 0.), // Front left, CW
];

const HEX6_X: &[MotorMix] = &[
	mix(1., -0.5, 0.866025, 1.),   // Rear right
	mix(1., -0.5, -0.866025, 1.),  // Front right
	mix(1., 0.5, 0.866025, -1.),   // Rear left
	mix(1., 0.5, -0.866025, -1.),  // Front left
	mix(1., -1., 0., -1.),         // Right
	mix(1., 1., 0., 1.),           // Left
];

const OCTO_X8: &[MotorMix] = &[
	mix(1., -1., 1., -1.), // Rear right
	mix(1., -1., -1., 1.), // Front right
	mix(1., 1., 1., 1.),   // Rear left
	mix(1., 1., -1., -1.), // Front left
	mix(1., -1., 1., 1.),  // Under rear right
	mix(1., -1., -1., -1.), // Under front right
	mix(1., 1., 1., -1.),  // Under rear left
	mix(1., 1., -1., 1.),  // Under front left
];

const OCTO_FLAT_P: &[MotorMix] = &[
	mix(1., 0.707107, -0.707107, 1.),  // Front left
	mix(1., -0.707107, -0.707107, 1.), // Front right
	mix(1., -0.707107, 0.707107, 1.),  // Rear right
	mix(1., 0.707107, 0.707107, 1.),   // Rear left
	mix(1., 0., -1., -1.),             // Front
	mix(1., -1., 0., -1.),             // Right
	mix(1., 0., 1., -1.),              // Rear
	mix(1., 1., 0., -1.),              // Left
];

const OCTO_FLAT_X: &[MotorMix] = &[
	mix(1., 1., -0.5, 1.),   // Mid front left
	mix(1., -0.5, -1., 1.),  // Front right
	mix(1., -1., 0.5, 1.),   // Mid rear right
	mix(1., 0.5, 1., 1.),    // Rear left
	mix(1., 0.5, -1., -1.),  // Front left
	mix(1., -1., -0.5, -1.), // Mid front right
	mix(1., -0.5, 1., -1.),  // Rear right
	mix(1., 1., 0.5, -1.),   // Mid rear left
];

const V_TAIL4: &[MotorMix] = &[
	mix(1., 0., 1., 1.),   // Rear right
	mix(1., -1., -1., 0.), // Front right
	mix(1., 0., 1., -1.),  // Rear left
	mix(1., 1., -1., 0.),  // Front left
];

// Same coefficients as the V-tail
const A_TAIL4: &[MotorMix] = V_TAIL4;

const HEX6_H: &[MotorMix] = &[
	mix(1., -1., 1., -1.), // Rear right
	mix(1., -1., -1., 1.), // Front right
	mix(1., 1., 1., 1.),   // Rear left
	mix(1., 1., -1., -1.), // Front left
	mix(1., 0., 0., 0.),   // Right
	mix(1., 0., 0., 0.),   // Left
];

const DUALCOPTER: &[MotorMix] = &[
	mix(1., 0., 0., -1.), // Left
	mix(1., 0., 0., 1.),  // Right
];

use self::InputChannel::*;

const SERVO_TRI: &[ServoRule] = &[rule(5, Yaw, 100)];

const SERVO_BI: &[ServoRule] = &[
	rule(4, Yaw, 100),
	rule(4, Pitch, 100),
	rule(5, Yaw, 100),
	rule(5, Pitch, 100),
];

const SERVO_FLYING_WING: &[ServoRule] = &[
	rule(3, Roll, 100),  // Left elevon
	rule(3, Pitch, 100),
	rule(4, Roll, 100),  // Right elevon
	rule(4, Pitch, 100),
];

const SERVO_AIRPLANE: &[ServoRule] = &[
	rule(3, Roll, 100),  // Left aileron
	rule(4, Roll, 100),  // Right aileron
	rule(5, Yaw, 100),   // Rudder
	rule(6, Pitch, 100), // Elevator
];

const SERVO_DUALCOPTER: &[ServoRule] = &[rule(4, Pitch, 100), rule(5, Roll, 100)];

const SERVO_SINGLECOPTER: &[ServoRule] = &[
	rule(3, Yaw, 100),
	rule(3, Throttle, 50),
	rule(4, Yaw, 100),
	rule(4, Yaw, 50),
	rule(5, Yaw, 100),
	rule(5, Pitch, 50),
	rule(6, Yaw, 100),
	rule(6, Roll, 50),
];

/// Supported airframes, in catalog order.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Airframe {
	Tri,
	QuadP,
	QuadX,
	Bi,
	Gimbal,
	Y6,
	Hex6,
	FlyingWing,
	Y4,
	Hex6X,
	OctoX8,
	OctoFlatP,
	OctoFlatX,
	Airplane,
	Heli120Ccpm,
	Heli90Deg,
	VTail4,
	Hex6H,
	PpmToServo,
	Dualcopter,
	Singlecopter,
	ATail4,
	Custom,
	CustomAirplane,
}

impl Default for Airframe {
	fn default() -> Self {
		Airframe::QuadX
	}
}

impl Airframe {
	pub const ALL: [Airframe; 24] = [
		Airframe::Tri,
		Airframe::QuadP,
		Airframe::QuadX,
		Airframe::Bi,
		Airframe::Gimbal,
		Airframe::Y6,
		Airframe::Hex6,
		Airframe::FlyingWing,
		Airframe::Y4,
		Airframe::Hex6X,
		Airframe::OctoX8,
		Airframe::OctoFlatP,
		Airframe::OctoFlatX,
		Airframe::Airplane,
		Airframe::Heli120Ccpm,
		Airframe::Heli90Deg,
		Airframe::VTail4,
		Airframe::Hex6H,
		Airframe::PpmToServo,
		Airframe::Dualcopter,
		Airframe::Singlecopter,
		Airframe::ATail4,
		Airframe::Custom,
		Airframe::CustomAirplane,
	];

	/// Catalog index, as used by `MixerConfig::load_custom_motor_mix`.
	pub fn index(self) -> usize {
		self as usize
	}

	pub fn is_fixed_wing(self) -> bool {
		matches!(self, Airframe::FlyingWing | Airframe::Airplane | Airframe::CustomAirplane)
	}

	/// Servos of these airframes are computed by the servo rules, on every cycle.
	pub fn uses_servo_rules(self) -> bool {
		matches!(
			self,
			Airframe::CustomAirplane
				| Airframe::FlyingWing
				| Airframe::Airplane
				| Airframe::Bi
				| Airframe::Tri
				| Airframe::Dualcopter
				| Airframe::Singlecopter
		)
	}

	pub fn profile(self) -> AirframeProfile {
		use Table::*;

		let (motors, servo_rules, uses_servos) = match self {
			Airframe::Tri => (Builtin(TRI), Builtin(SERVO_TRI), true),
			Airframe::QuadP => (Builtin(QUAD_P), Builtin(NO_RULES), false),
			Airframe::QuadX => (Builtin(QUAD_X), Builtin(NO_RULES), false),
			Airframe::Bi => (Builtin(BI), Builtin(SERVO_BI), true),
			Airframe::Gimbal => (Builtin(NONE), Builtin(NO_RULES), true),
			Airframe::Y6 => (Builtin(Y6), Builtin(NO_RULES), false),
			Airframe::Hex6 => (Builtin(HEX6_P), Builtin(NO_RULES), false),
			Airframe::FlyingWing => (Builtin(SINGLE), Builtin(SERVO_FLYING_WING), true),
			Airframe::Y4 => (Builtin(Y4), Builtin(NO_RULES), false),
			Airframe::Hex6X => (Builtin(HEX6_X), Builtin(NO_RULES), false),
			Airframe::OctoX8 => (Builtin(OCTO_X8), Builtin(NO_RULES), false),
			Airframe::OctoFlatP => (Builtin(OCTO_FLAT_P), Builtin(NO_RULES), false),
			Airframe::OctoFlatX => (Builtin(OCTO_FLAT_X), Builtin(NO_RULES), false),
			Airframe::Airplane => (Builtin(SINGLE), Builtin(SERVO_AIRPLANE), true),
			Airframe::Heli120Ccpm => (Builtin(NONE), Builtin(NO_RULES), true),
			Airframe::Heli90Deg => (Builtin(NONE), Builtin(NO_RULES), true),
			Airframe::VTail4 => (Builtin(V_TAIL4), Builtin(NO_RULES), false),
			Airframe::Hex6H => (Builtin(HEX6_H), Builtin(NO_RULES), false),
			Airframe::PpmToServo => (Builtin(NONE), Builtin(NO_RULES), true),
			Airframe::Dualcopter => (Builtin(DUALCOPTER), Builtin(SERVO_DUALCOPTER), true),
			Airframe::Singlecopter => (Builtin(SINGLE), Builtin(SERVO_SINGLECOPTER), true),
			Airframe::ATail4 => (Builtin(A_TAIL4), Builtin(NO_RULES), false),
			Airframe::Custom => (Custom, Builtin(NO_RULES), false),
			Airframe::CustomAirplane => (Builtin(SINGLE), Custom, true),
		};

		AirframeProfile { motors, servo_rules, uses_servos }
	}
}

impl TryFrom<usize> for Airframe {
	type Error = MixerError;

	fn try_from(index: usize) -> Result<Self, Self::Error> {
		Airframe::ALL
			.get(index)
			.copied()
			.ok_or(MixerError::UnknownAirframe(index))
	}
}
