/// Flight mode flags read by the navigator.
///
/// Most flags are independent inputs owned by the rest of the firmware. The navigator only ever
/// writes `armed` (cleared on failsafe landing) and `climb_out`, and only through
/// `FlightModes::apply`.
///
/// Exclusivity:
/// - `climb_out` implies an active return to home; it is cleared by `ClimbOutComplete` and by
///   `FailsafeDisarm`, so it never survives a failsafe landing.
/// - `angle`/`horizon` select stabilized flight; with neither set, or with `passthrough` outside
///   of a failsafe return, navigation is bypassed entirely.
/// - `gps_hold` and `gps_home` are independent of the above.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlightModes {
	pub armed: bool,
	pub angle: bool,
	pub horizon: bool,
	pub passthrough: bool,
	pub gps_hold: bool,
	pub gps_home: bool,
	pub climb_out: bool,
	pub failsafe_rth: bool,
	pub motors_stopped: bool,
}

impl FlightModes {
	pub fn is_stabilized(&self) -> bool {
		self.angle || self.horizon
	}

	/// Manual flight: the throttle stick goes straight through and no attitude bias is applied.
	pub fn navigation_bypassed(&self) -> bool {
		!self.is_stabilized() || (self.passthrough && !self.failsafe_rth)
	}

	pub fn apply(&mut self, transition: NavTransition) {
		match transition {
			NavTransition::EnterClimbOut => self.climb_out = true,
			NavTransition::ClimbOutComplete => self.climb_out = false,
			NavTransition::BeginRthDescent => {}
			NavTransition::FailsafeDisarm => {
				self.armed = false;
				self.climb_out = false;
			}
		}
	}
}

/// Named transitions of the navigation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTransition {
	/// Return to home entered: climb at full authority, wings level below the safe altitude.
	EnterClimbOut,
	/// Target altitude reached during climb-out.
	ClimbOutComplete,
	/// Close to home and above the return altitude: the hold altitude is lowered.
	BeginRthDescent,
	/// Failsafe return reached home: motors disarmed, hold altitude set just above home.
	FailsafeDisarm,
}

/// Phase of the navigation state machine, as last changed by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPhase {
	Cruise,
	ClimbOut,
	RthDescent,
	FailsafeDisarm,
}

impl Default for NavPhase {
	fn default() -> Self {
		NavPhase::Cruise
	}
}

impl NavPhase {
	pub fn after(self, transition: NavTransition) -> NavPhase {
		match transition {
			NavTransition::EnterClimbOut => NavPhase::ClimbOut,
			NavTransition::ClimbOutComplete => NavPhase::Cruise,
			NavTransition::BeginRthDescent => NavPhase::RthDescent,
			NavTransition::FailsafeDisarm => NavPhase::FailsafeDisarm,
		}
	}
}
