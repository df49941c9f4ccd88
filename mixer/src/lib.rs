//! Actuator output stage: turns stabilization and navigation corrections into motor commands and
//! servo positions for a family of airframes.
//!
//! Commands are PWM pulse widths in µs. Stick and PID values are centred on zero.

#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;

#[macro_use]
extern crate log;

mod airframe;
mod config;
mod error;
mod mixer;
mod motor;
mod output;
mod roll_pitch_yaw;
mod runtime;
mod servo;

pub use crate::airframe::{mix, Airframe, AirframeProfile, InputChannel, MotorMix, ServoRule, Table};
pub use crate::config::{Features, MixerConfig, MotorLimits, ServoCenter, ServoConfig};
pub use crate::error::MixerError;
pub use crate::mixer::{Mixer, MixerInput};
pub use crate::output::{ActuatorCommandSet, ServoWrite};
pub use crate::roll_pitch_yaw::{RollPitch, RollPitchYaw};
pub use crate::runtime::MixerRuntime;

pub const MAX_MOTORS: usize = 12;
pub const MAX_SERVOS: usize = 8;
pub const MAX_SERVO_RULES: usize = 16;
pub const RC_CHANNELS: usize = 18;

// RC channel indices
pub const ROLL: usize = 0;
pub const PITCH: usize = 1;
pub const YAW: usize = 2;
pub const THROTTLE: usize = 3;
pub const AUX1: usize = 4;
pub const AUX2: usize = 5;
pub const AUX3: usize = 6;
pub const AUX4: usize = 7;

/// Servo position before any mixing, also the power-on value of every servo output.
pub const SERVO_NEUTRAL: i16 = 1500;
