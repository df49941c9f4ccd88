use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::{Airframe, InputChannel, MixerError, MotorMix, ServoRule, Table, SERVO_NEUTRAL};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
	/// Servos 0 and 1 drive a camera tilt/roll gimbal.
	pub servo_tilt: bool,
	/// Bidirectional (3D) ESCs.
	pub bidirectional: bool,
	/// Stop the motors instead of idling when the throttle stick is low.
	pub motor_stop: bool,
	/// Extra servo outputs are available (custom airplane only).
	pub ppm: bool,
}

/// Motor and stick thresholds, in µs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorLimits {
	pub min_throttle: i16,
	pub max_throttle: i16,
	/// Sent to stopped motors.
	pub min_command: i16,
	pub mid_rc: i16,
	/// Throttle stick value under which the stick is considered low.
	pub min_check: i16,
	/// Stopped bidirectional motor.
	pub neutral_3d: i16,
	pub deadband_3d_low: i16,
	pub deadband_3d_high: i16,
}

impl Default for MotorLimits {
	fn default() -> Self {
		MotorLimits {
			min_throttle: 1150,
			max_throttle: 1850,
			min_command: 1000,
			mid_rc: 1500,
			min_check: 1100,
			neutral_3d: 1460,
			deadband_3d_low: 1406,
			deadband_3d_high: 1514,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServoCenter {
	/// µs
	Fixed(i16),
	/// Centre follows an RC channel, typically a knob on the transmitter.
	RcChannel(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServoConfig {
	pub min: i16,
	pub max: i16,
	pub center: ServoCenter,
	/// % applied to the mixed position, also the gain of the gimbal paths.
	pub rate: i16,
	/// Inputs whose contribution to this servo is inverted.
	pub reversed: Vec<InputChannel>,
}

impl Default for ServoConfig {
	fn default() -> Self {
		ServoConfig {
			min: 1020,
			max: 2000,
			center: ServoCenter::Fixed(SERVO_NEUTRAL),
			rate: 100,
			reversed: Vec::new(),
		}
	}
}

impl ServoConfig {
	pub fn direction(&self, source: InputChannel) -> i32 {
		if self.reversed.contains(&source) {
			-1
		} else {
			1
		}
	}

	pub fn center(&self, rc_data: &[i16]) -> i32 {
		match self.center {
			ServoCenter::Fixed(center) => center as i32,
			ServoCenter::RcChannel(channel) => rc_data.get(channel).copied().unwrap_or(SERVO_NEUTRAL) as i32,
		}
	}
}

/// Everything the mixer needs to know about the airframe. Takes effect once resolved into a
/// `MixerRuntime`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
	pub airframe: Airframe,
	pub features: Features,
	pub limits: MotorLimits,
	/// 1 or -1, inverts the yaw contribution of every motor.
	pub yaw_direction: i8,
	/// Keep driving the tricopter tail servo while disarmed.
	pub tri_unarmed_servo: bool,
	/// Camera stabilization mixes pitch and roll on both tilt servos.
	pub gimbal_mix_tilt: bool,
	/// AUX1 to AUX4 are forwarded unmixed to the last four servo outputs.
	pub gimbal_forward_aux: bool,
	/// Physical servo outputs of the board.
	pub servo_outputs: usize,
	pub servos: [ServoConfig; crate::MAX_SERVOS],
	/// Motors of the `Custom` airframe. A zero throttle weight ends the list.
	pub custom_motor_mix: Vec<MotorMix>,
	/// Servo rules of the `CustomAirplane` airframe. A rule targeting servo 0 ends the list.
	pub custom_servo_mix: Vec<ServoRule>,
}

impl Default for MixerConfig {
	fn default() -> Self {
		MixerConfig {
			airframe: Airframe::default(),
			features: Features::default(),
			limits: MotorLimits::default(),
			yaw_direction: 1,
			tri_unarmed_servo: true,
			gimbal_mix_tilt: false,
			gimbal_forward_aux: false,
			servo_outputs: crate::MAX_SERVOS,
			servos: Default::default(),
			custom_motor_mix: Vec::new(),
			custom_servo_mix: Vec::new(),
		}
	}
}

impl MixerConfig {
	/// Replaces the custom motor slot with the table of the airframe at catalog `index`.
	///
	/// The active mixer is unaffected until the configuration is resolved again.
	pub fn load_custom_motor_mix(&mut self, index: usize) -> Result<(), MixerError> {
		let airframe = Airframe::try_from(index)?;

		self.custom_motor_mix = match airframe.profile().motors {
			Table::Builtin(motors) => motors.to_vec(),
			Table::Custom => Vec::new(),
		};

		info!("Custom motor mix loaded from {:?} ({} motors)", airframe, self.custom_motor_mix.len());
		Ok(())
	}

	/// Replaces the custom servo slot with the rules of the airframe at catalog `index`.
	pub fn load_custom_servo_mix(&mut self, index: usize) -> Result<(), MixerError> {
		let airframe = Airframe::try_from(index)?;

		self.custom_servo_mix = match airframe.profile().servo_rules {
			Table::Builtin(rules) => rules.to_vec(),
			Table::Custom => Vec::new(),
		};

		info!("Custom servo mix loaded from {:?} ({} rules)", airframe, self.custom_servo_mix.len());
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use crate::{Airframe, InputChannel, MixerConfig, MixerError, ServoCenter, ServoConfig};

	#[test]
	fn servo_direction_and_center() {
		let servo = ServoConfig {
			center: ServoCenter::RcChannel(6),
			reversed: vec![InputChannel::Pitch],
			..Default::default()
		};

		assert_eq!(servo.direction(InputChannel::Pitch), -1);
		assert_eq!(servo.direction(InputChannel::Roll), 1);

		let mut rc_data = [1500; 18];
		rc_data[6] = 1320;
		assert_eq!(servo.center(&rc_data), 1320);
		assert_eq!(ServoConfig::default().center(&rc_data), 1500);
	}

	#[test]
	fn load_custom_mixes() {
		let mut config = MixerConfig::default();

		config.load_custom_motor_mix(Airframe::Hex6X.index()).unwrap();
		assert_eq!(config.custom_motor_mix.len(), 6);

		config.load_custom_servo_mix(Airframe::Airplane.index()).unwrap();
		assert_eq!(config.custom_servo_mix.len(), 4);

		config.load_custom_motor_mix(Airframe::Custom.index()).unwrap();
		assert!(config.custom_motor_mix.is_empty());

		assert_eq!(config.load_custom_servo_mix(99), Err(MixerError::UnknownAirframe(99)));
		assert_eq!(config.custom_servo_mix.len(), 4);
		assert_eq!(config.airframe, Airframe::QuadX);
	}

	#[test]
	fn partial_json_falls_back_to_defaults() {
		let config: MixerConfig = serde_json::from_str(
			r#"{ "airframe": "Tri", "features": { "bidirectional": true }, "servos": [
				{ "center": { "RcChannel": 5 }, "reversed": ["Yaw"] }, {}, {}, {}, {}, {}, {}, {} ] }"#,
		)
		.unwrap();

		assert_eq!(config.airframe, Airframe::Tri);
		assert!(config.features.bidirectional);
		assert!(!config.features.servo_tilt);
		assert_eq!(config.limits.max_throttle, 1850);
		assert_eq!(config.yaw_direction, 1);
		assert_eq!(config.servos[0].center, ServoCenter::RcChannel(5));
		assert_eq!(config.servos[0].min, 1020);
		assert_eq!(config.servos[1], ServoConfig::default());
	}
}
