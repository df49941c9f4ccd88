use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq)]
pub struct RollPitch<N> {
	pub roll: N,
	pub pitch: N,
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq)]
pub struct RollPitchYaw<N> {
	pub roll: N,
	pub pitch: N,
	pub yaw: N,
}

impl<N> From<(N, N)> for RollPitch<N> {
	fn from((roll, pitch): (N, N)) -> Self {
		RollPitch { roll, pitch }
	}
}

impl<N> From<(N, N, N)> for RollPitchYaw<N> {
	fn from((roll, pitch, yaw): (N, N, N)) -> Self {
		RollPitchYaw { roll, pitch, yaw }
	}
}
