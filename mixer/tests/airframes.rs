use mixer::{Airframe, Mixer, MixerConfig, MixerInput, Table, THROTTLE};

fn multirotors() -> impl Iterator<Item = Airframe> {
	Airframe::ALL.iter().copied().filter(|airframe| match airframe.profile().motors {
		Table::Builtin(motors) => motors.len() > 1,
		Table::Custom => false,
	})
}

fn input(throttle: i16, roll: i16, pitch: i16, yaw: i16) -> MixerInput {
	let mut input = MixerInput {
		throttle,
		axis_pid: (roll, pitch, yaw).into(),
		rc_data: [1500; 18],
		armed: true,
		..Default::default()
	};
	input.rc_data[THROTTLE] = throttle;
	input
}

#[test]
fn neutral_sticks_give_equal_thrust() {
	for airframe in multirotors() {
		let mixer = Mixer::new(MixerConfig { airframe, ..Default::default() }).unwrap();
		let commands = mixer.mix(&input(1400, 0, 0, 0));

		assert!(commands.motors().iter().all(|&motor| motor == 1400), "{:?}: {:?}", airframe, commands.motors());
	}
}

#[test]
fn commands_stay_within_throttle_range() {
	let corrections = [-500, -120, 0, 75, 400];

	for airframe in multirotors() {
		for &bidirectional in [false, true].iter() {
			let mut config = MixerConfig { airframe, ..Default::default() };
			config.features.bidirectional = bidirectional;
			let limits = config.limits;
			let mixer = Mixer::new(config).unwrap();

			for &throttle in [1000, 1300, 1500, 1700, 2000].iter() {
				for &roll in corrections.iter() {
					for &pitch in corrections.iter() {
						for &yaw in corrections.iter() {
							let commands = mixer.mix(&input(throttle, roll, pitch, yaw));

							for &motor in commands.motors() {
								assert!(motor <= limits.max_throttle, "{:?}", airframe);
								assert!(motor >= limits.min_command, "{:?}", airframe);
							}
						}
					}
				}
			}
		}
	}
}

#[test]
fn elevons_mix_roll_and_pitch() {
	let mixer = Mixer::new(MixerConfig { airframe: Airframe::FlyingWing, ..Default::default() }).unwrap();

	let pitch_up = mixer.mix(&input(1500, 0, 200, 0));
	assert_eq!(pitch_up.servos()[3], pitch_up.servos()[4]);

	let roll_right = mixer.mix(&input(1500, 200, 0, 0));
	assert_eq!(roll_right.servos()[3], roll_right.servos()[4]);

	let mut config = mixer.config().clone();
	config.servos[4].reversed = vec![mixer::InputChannel::Roll];
	let mixer = Mixer::new(config).unwrap();

	let roll_right = mixer.mix(&input(1500, 200, 0, 0));
	assert_eq!(roll_right.servos()[3] - 1500, 1500 - roll_right.servos()[4]);

	let pitch_up = mixer.mix(&input(1500, 0, 200, 0));
	assert_eq!(pitch_up.servos()[3], pitch_up.servos()[4]);
}
