use crate::{
	Airframe, InputChannel, MixerConfig, MixerInput, MixerRuntime, RollPitchYaw, ServoWrite, AUX1, AUX2, AUX3,
	AUX4, MAX_SERVOS, PITCH, ROLL, SERVO_NEUTRAL, THROTTLE, YAW,
};

/// Virtual input vector the servo rules read from, indexed by `InputChannel`.
pub fn input_channels(
	input: &MixerInput,
	axis: &RollPitchYaw<i16>,
	mid_rc: i16,
	throttle_motor: i16,
) -> [i32; InputChannel::COUNT] {
	let axis = if input.passthrough { &input.command } else { axis };
	let from_center = |channel: usize| mid_rc as i32 - input.rc_data[channel] as i32;

	[
		axis.roll as i32,
		axis.pitch as i32,
		axis.yaw as i32,
		throttle_motor as i32,
		from_center(AUX1),
		from_center(AUX2),
		from_center(AUX3),
		from_center(AUX4),
		from_center(ROLL),
		from_center(PITCH),
		from_center(YAW),
		from_center(THROTTLE),
		input.attitude.pitch as i32,
		input.attitude.roll as i32,
	]
}

/// Servo positions of one cycle, clamped to each servo range.
pub fn mix(
	config: &MixerConfig,
	runtime: &MixerRuntime,
	input: &MixerInput,
	axis: &RollPitchYaw<i16>,
	throttle_motor: i16,
) -> [i16; MAX_SERVOS] {
	let mut servos = [SERVO_NEUTRAL as i32; MAX_SERVOS];
	let rc_data = &input.rc_data[..];
	let angle = &input.attitude;

	if runtime.airframe().uses_servo_rules() {
		let channels = input_channels(input, axis, config.limits.mid_rc, throttle_motor);

		for (servo, servo_config) in servos.iter_mut().zip(config.servos.iter()) {
			*servo = servo_config.center(rc_data);
		}

		for rule in runtime.servo_rules() {
			let direction = config.servos[rule.target].direction(rule.source);
			servos[rule.target] += direction * (channels[rule.source.index()] * rule.rate as i32) / 100;
		}

		for (servo, servo_config) in servos.iter_mut().zip(config.servos.iter()) {
			*servo = servo_config.rate as i32 * *servo / 100;
		}
	} else if runtime.airframe() == Airframe::Gimbal {
		servos[0] = config.servos[0].rate as i32 * angle.pitch as i32 / 50 + config.servos[0].center(rc_data);
		servos[1] = config.servos[1].rate as i32 * angle.roll as i32 / 50 + config.servos[1].center(rc_data);
	}

	if config.features.servo_tilt {
		let pitch_rate = config.servos[0].rate as i32;
		let roll_rate = config.servos[1].rate as i32;

		servos[0] = config.servos[0].center(rc_data);
		servos[1] = config.servos[1].center(rc_data);

		if input.camstab {
			let pitch = angle.pitch as i32;
			let roll = angle.roll as i32;

			if config.gimbal_mix_tilt {
				servos[0] -= -pitch_rate * pitch / 50 - roll_rate * roll / 50;
				servos[1] += -pitch_rate * pitch / 50 + roll_rate * roll / 50;
			} else {
				servos[0] += pitch_rate * pitch / 50;
				servos[1] += roll_rate * roll / 50;
			}
		}
	}

	let mut pulses = [SERVO_NEUTRAL; MAX_SERVOS];
	for ((pulse, servo), servo_config) in pulses.iter_mut().zip(servos.iter()).zip(config.servos.iter()) {
		*pulse = (*servo).max(servo_config.min as i32).min(servo_config.max as i32) as i16;
	}

	pulses
}

/// Maps computed servo positions to the physical servo outputs of the airframe.
pub fn writes(
	config: &MixerConfig,
	runtime: &MixerRuntime,
	servos: &[i16; MAX_SERVOS],
	input: &MixerInput,
) -> Vec<ServoWrite> {
	let mut writes = if runtime.servo_enabled() {
		airframe_writes(config, runtime, servos, input.armed)
	} else {
		Vec::new()
	};

	if config.gimbal_forward_aux {
		let offset = config.servo_outputs.saturating_sub(4);
		writes.extend((AUX1..=AUX4).enumerate().map(|(i, channel)| ServoWrite {
			output: offset + i,
			pulse: input.rc_data[channel],
		}));
	}

	writes
}

fn airframe_writes(config: &MixerConfig, runtime: &MixerRuntime, servos: &[i16; MAX_SERVOS], armed: bool) -> Vec<ServoWrite> {
	let sources: &[usize] = match runtime.airframe() {
		Airframe::Bi | Airframe::Dualcopter => &[4, 5],
		Airframe::Tri => {
			// A disarmed tail servo gets no signal at all
			let pulse = if config.tri_unarmed_servo || armed { servos[5] } else { 0 };
			return vec![ServoWrite { output: 0, pulse }];
		}
		Airframe::Gimbal => &[0, 1],
		Airframe::FlyingWing => &[3, 4],
		Airframe::Airplane | Airframe::Singlecopter => &[3, 4, 5, 6],
		Airframe::CustomAirplane if config.features.ppm => &[3, 4, 5, 6, 0, 1, 2, 7],
		Airframe::CustomAirplane => &[3, 4, 5, 6],
		_ if config.features.servo_tilt => &[0, 1],
		_ => &[],
	};

	sources
		.iter()
		.enumerate()
		.map(|(output, &source)| ServoWrite { output, pulse: servos[source] })
		.collect()
}
