#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;

mod boxcar;

pub use crate::boxcar::Boxcar;
