use crate::{Features, MotorLimits, MotorMix, RollPitchYaw};

/// Bounds the yaw correction by the yaw stick deflection, so that a yaw correction cannot use up
/// all the motor headroom.
pub fn limit_yaw(yaw_pid: i16, yaw_command: i16) -> i16 {
	let limit = 100 + (yaw_command as i32).abs();
	(yaw_pid as i32).max(-limit).min(limit) as i16
}

pub fn mix_linear(mix: &MotorMix, throttle: i16, axis: &RollPitchYaw<i16>, yaw_direction: i8) -> i32 {
	(throttle as f32 * mix.throttle
		+ axis.pitch as f32 * mix.pitch
		+ axis.roll as f32 * mix.roll
		+ -(yaw_direction as f32) * axis.yaw as f32 * mix.yaw) as i32
}

/// Lowers every motor by the amount the highest one exceeds `max_throttle`, keeping the
/// differences between motors.
pub fn reallocate_headroom(motors: &mut [i32], max_throttle: i16) {
	let max_throttle = max_throttle as i32;

	if let Some(&max_motor) = motors.iter().max() {
		if max_motor > max_throttle {
			let excess = max_motor - max_throttle;
			for motor in motors.iter_mut() {
				*motor -= excess;
			}
		}
	}
}

/// Final per-motor clamp. `throttle_rc` is the raw throttle stick.
pub fn clamp(motor: i32, throttle_rc: i16, features: &Features, limits: &MotorLimits) -> i16 {
	let constrain = |low: i16, high: i16| motor.max(low as i32).min(high as i32) as i16;

	if features.bidirectional {
		if throttle_rc > limits.mid_rc {
			constrain(limits.deadband_3d_high, limits.max_throttle)
		} else {
			constrain(limits.min_command, limits.deadband_3d_low)
		}
	} else if throttle_rc < limits.min_check {
		if features.motor_stop {
			limits.min_command
		} else {
			limits.min_throttle
		}
	} else {
		constrain(limits.min_throttle, limits.max_throttle)
	}
}

#[cfg(test)]
mod tests {
	use crate::motor::{clamp, limit_yaw, mix_linear, reallocate_headroom};
	use crate::{mix, Features, MotorLimits, RollPitchYaw};

	#[test]
	fn yaw_is_limited_by_stick() {
		assert_eq!(limit_yaw(300, 0), 100);
		assert_eq!(limit_yaw(-300, 0), -100);
		assert_eq!(limit_yaw(300, -150), 250);
		assert_eq!(limit_yaw(80, 0), 80);
	}

	#[test]
	fn linear_mix() {
		let axis = RollPitchYaw { roll: 100, pitch: 50, yaw: 20 };

		assert_eq!(mix_linear(&mix(1., -1., 1., -1.), 1500, &axis, 1), 1470);
		assert_eq!(mix_linear(&mix(1., -1., 1., -1.), 1500, &axis, -1), 1430);
		assert_eq!(mix_linear(&mix(1., 0., 1.333333, 0.), 1000, &RollPitchYaw { roll: 0, pitch: 10, yaw: 0 }, 1), 1013);
	}

	#[test]
	fn headroom_keeps_differences() {
		let before = [1900, 1700, 2000, 1500];
		let mut motors = before;

		reallocate_headroom(&mut motors, 1850);

		assert_eq!(*motors.iter().max().unwrap(), 1850);
		for i in 0..motors.len() {
			for j in 0..motors.len() {
				assert_eq!(motors[i] - motors[j], before[i] - before[j]);
			}
		}

		let mut motors = [1200, 1300];
		reallocate_headroom(&mut motors, 1850);
		assert_eq!(motors, [1200, 1300]);

		reallocate_headroom(&mut [], 1850);
	}

	#[test]
	fn normal_clamp() {
		let features = Features::default();
		let limits = MotorLimits::default();

		assert_eq!(clamp(2000, 1500, &features, &limits), 1850);
		assert_eq!(clamp(900, 1500, &features, &limits), 1150);
		assert_eq!(clamp(1400, 1500, &features, &limits), 1400);

		// Throttle stick low
		assert_eq!(clamp(1400, 1050, &features, &limits), 1150);

		let features = Features { motor_stop: true, ..Default::default() };
		assert_eq!(clamp(1400, 1050, &features, &limits), 1000);
	}

	#[test]
	fn bidirectional_clamp() {
		let features = Features { bidirectional: true, ..Default::default() };
		let limits = MotorLimits::default();

		// Forward band
		assert_eq!(clamp(1450, 1600, &features, &limits), 1514);
		assert_eq!(clamp(1900, 1600, &features, &limits), 1850);

		// Reverse band
		assert_eq!(clamp(1450, 1400, &features, &limits), 1406);
		assert_eq!(clamp(900, 1400, &features, &limits), 1000);
		assert_eq!(clamp(1200, 1500, &features, &limits), 1200);
	}
}
