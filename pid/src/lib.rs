#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;

use dsp::Boxcar;
use num_traits::float::FloatCore;

/// Output of one loop iteration. The derivative is kept apart so that callers can limit the
/// proportional-integral part before adding it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidOutput<F> {
	pub proportional_integral: F,
	pub derivative: F,
}

/// PI loop with a leaky, clamped integral and a boxcar-averaged derivative over the last `N`
/// error deltas.
///
/// - While `|error| <= deadband` the integral is multiplied by `dt` before accumulating, so it
///   leaks away instead of being reset.
/// - The integral is clamped to `[-integral_limit, integral_limit]`.
/// - Error deltas larger than `spike_limit` are replaced by zero before entering the window.
/// - The derivative is `kd * sum(deltas) / dt`.
#[derive(Debug, Clone)]
pub struct NavPid<F: FloatCore, const N: usize> {
	k: (F, F, F),
	deadband: F,
	integral_limit: F,
	spike_limit: F,
	error_integral: F,
	last_error: F,
	deltas: Boxcar<F, N>,
}

fn constrain<F: FloatCore>(value: F, low: F, high: F) -> F {
	value.max(low).min(high)
}

impl<F: FloatCore, const N: usize> NavPid<F, N> {
	pub fn new(k: (F, F, F), deadband: F, integral_limit: F, spike_limit: F) -> Self {
		Self {
			k,
			deadband,
			integral_limit,
			spike_limit,
			error_integral: F::zero(),
			last_error: F::zero(),
			deltas: Boxcar::new(),
		}
	}

	pub fn gains(&self) -> (F, F, F) {
		self.k
	}

	pub fn set_gains(&mut self, k: (F, F, F)) {
		self.k = k;
	}

	pub fn integral(&self) -> F {
		self.error_integral
	}

	pub fn last_error(&self) -> F {
		self.last_error
	}

	pub fn delta_sum(&self) -> F {
		self.deltas.sum()
	}

	pub fn reset(&mut self) {
		self.error_integral = F::zero();
		self.last_error = F::zero();
		self.deltas.clear();
	}

	/// Runs one iteration. `dt` is in seconds; a non-positive `dt` yields a zero derivative.
	pub fn update(&mut self, error: F, dt: F) -> PidOutput<F> {
		let (kp, ki, kd) = self.k;

		if error.abs() <= self.deadband {
			self.error_integral = self.error_integral * dt;
		}

		self.error_integral = constrain(
			self.error_integral + error * ki * dt,
			-self.integral_limit,
			self.integral_limit,
		);

		let delta = {
			let delta = error - self.last_error;
			if delta.abs() > self.spike_limit {
				F::zero()
			} else {
				delta
			}
		};
		self.last_error = error;

		let delta_sum = self.deltas.push(delta);
		let derivative = if dt > F::zero() {
			delta_sum * kd / dt
		} else {
			F::zero()
		};

		PidOutput {
			proportional_integral: error * kp + self.error_integral,
			derivative,
		}
	}
}

#[cfg(test)]
mod tests {
	use crate::NavPid;

	const DT: f32 = 0.2;
	const EPS: f32 = 1e-3;

	fn pid(k: (f32, f32, f32)) -> NavPid<f32, 5> {
		NavPid::new(k, 30., 500., 100.)
	}

	#[test]
	fn proportional_only() {
		let mut pid = pid((2.5, 0., 0.));

		let output = pid.update(40., DT);
		assert_approx_eq!(output.proportional_integral, 100., EPS);
		assert_approx_eq!(output.derivative, 0., EPS);
	}

	#[test]
	fn integral_accumulates_with_dt() {
		let mut pid = pid((0., 0.5, 0.));

		pid.update(100., DT);
		assert_approx_eq!(pid.integral(), 100. * 0.5 * DT, EPS);

		let output = pid.update(100., DT);
		assert_approx_eq!(output.proportional_integral, 2. * 100. * 0.5 * DT, EPS);
	}

	#[test]
	fn integral_leaks_inside_deadband() {
		let mut pid = pid((0., 1., 0.));

		for _ in 0..5 {
			pid.update(200., DT);
		}
		let accumulated = pid.integral();
		assert_approx_eq!(accumulated, 200., EPS);

		// |20| <= 30: the integral is first scaled by dt, then accumulates as usual
		pid.update(20., DT);
		assert_approx_eq!(pid.integral(), accumulated * DT + 20. * DT, EPS);
	}

	#[test]
	fn integral_is_clamped() {
		let mut pid = pid((0., 10., 0.));

		for _ in 0..100 {
			pid.update(1000., 1.);
			assert!(pid.integral() <= 500.);
		}
		assert_approx_eq!(pid.integral(), 500., EPS);

		for _ in 0..100 {
			pid.update(-1000., 3.);
			assert!(pid.integral() >= -500.);
		}
		assert_approx_eq!(pid.integral(), -500., EPS);
	}

	#[test]
	fn integral_stays_bounded_for_arbitrary_sequences() {
		let mut pid = pid((1., 7.3, 0.2));
		let mut error = 13.;

		for i in 0..500 {
			error = (error * 7.1 + i as f32 * 3.7) % 1700. - 850.;
			let dt = 0.01 + (i % 13) as f32 * 0.37;
			pid.update(error, dt);
			assert!(pid.integral() >= -500. && pid.integral() <= 500.);
		}
	}

	#[test]
	fn derivative_is_boxcar_sum_over_dt() {
		let mut pid = pid((0., 0., 0.5));

		pid.update(10., DT);
		pid.update(30., DT);
		let output = pid.update(60., DT);

		// deltas 10, 20, 30
		assert_approx_eq!(output.derivative, 60. * 0.5 / DT, EPS);
		assert_approx_eq!(pid.delta_sum(), 60., EPS);
	}

	#[test]
	fn derivative_window_forgets_old_deltas() {
		let mut pid = pid((0., 0., 1.));

		pid.update(50., DT);
		for _ in 0..5 {
			pid.update(50., DT);
		}

		assert_approx_eq!(pid.delta_sum(), 0., EPS);
	}

	#[test]
	fn derivative_spikes_are_rejected() {
		let mut pid = pid((0., 0., 1.));

		pid.update(10., DT);
		let output = pid.update(400., DT);

		assert_approx_eq!(output.derivative, 10. / DT, EPS);
		assert_approx_eq!(pid.last_error(), 400., EPS);
	}

	#[test]
	fn zero_dt_has_no_derivative() {
		let mut pid = pid((1., 1., 1.));

		let output = pid.update(50., 0.);
		assert_approx_eq!(output.derivative, 0., EPS);
		assert_approx_eq!(output.proportional_integral, 50., EPS);
	}

	#[test]
	fn reset_clears_state() {
		let mut pid = pid((1., 1., 1.));
		pid.update(80., DT);
		pid.update(90., DT);

		pid.reset();

		assert_approx_eq!(pid.integral(), 0., EPS);
		assert_approx_eq!(pid.last_error(), 0., EPS);
		assert_approx_eq!(pid.delta_sum(), 0., EPS);
		assert_eq!(pid.gains(), (1., 1., 1.));
	}
}
