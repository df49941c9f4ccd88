use num_traits::{float::FloatCore, NumCast};

/// Fixed-length window over the last `N` samples, keeping their sum up to date on every push.
///
/// Used as a boxcar filter: `sum() / N` is the moving average, and for a window of per-cycle
/// deltas `sum() / dt` is a smoothed derivative.
#[derive(Debug, Clone)]
pub struct Boxcar<F: FloatCore, const N: usize> {
	samples: [F; N],
	head: usize,
	sum: F,
}

impl<F: FloatCore, const N: usize> Boxcar<F, N> {
	pub fn new() -> Self {
		assert!(N > 0, "a boxcar window needs at least one sample");

		Self {
			samples: [F::zero(); N],
			head: 0,
			sum: F::zero(),
		}
	}

	/// Pushes `sample`, evicting the oldest one, and returns the updated sum.
	pub fn push(&mut self, sample: F) -> F {
		let evicted = std::mem::replace(&mut self.samples[self.head], sample);
		self.sum = self.sum - evicted + sample;
		self.head = (self.head + 1) % N;

		self.sum
	}

	pub fn sum(&self) -> F {
		self.sum
	}

	pub fn average(&self) -> F {
		// N is small, the conversion cannot fail
		self.sum / <F as NumCast>::from(N).unwrap_or_else(F::one)
	}

	pub fn capacity(&self) -> usize {
		N
	}

	/// Samples from the oldest to the newest.
	pub fn iter(&self) -> impl Iterator<Item = &F> + '_ {
		self.samples[self.head..]
			.iter()
			.chain(self.samples[..self.head].iter())
	}

	pub fn clear(&mut self) {
		self.samples = [F::zero(); N];
		self.head = 0;
		self.sum = F::zero();
	}
}

impl<F: FloatCore, const N: usize> Default for Boxcar<F, N> {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use crate::Boxcar;

	#[test]
	fn sum_of_partial_window() {
		let mut boxcar = Boxcar::<f32, 5>::new();

		assert_approx_eq!(boxcar.push(1.), 1.);
		assert_approx_eq!(boxcar.push(2.5), 3.5);
		assert_approx_eq!(boxcar.sum(), 3.5);
		assert_approx_eq!(boxcar.average(), 0.7);
	}

	#[test]
	fn oldest_sample_is_evicted() {
		let mut boxcar = Boxcar::<f32, 3>::new();

		for sample in &[1., 2., 3.] {
			boxcar.push(*sample);
		}
		assert_approx_eq!(boxcar.sum(), 6.);

		assert_approx_eq!(boxcar.push(10.), 15.);
		assert_eq!(boxcar.iter().copied().collect::<Vec<f32>>(), vec![2., 3., 10.]);

		assert_approx_eq!(boxcar.push(-4.), 9.);
		assert_eq!(boxcar.iter().copied().collect::<Vec<f32>>(), vec![3., 10., -4.]);
	}

	#[test]
	fn sum_matches_window_after_many_pushes() {
		let mut boxcar = Boxcar::<f64, 5>::new();

		for i in 0..1000 {
			boxcar.push((i % 17) as f64 - 8.);
		}

		let expected: f64 = boxcar.iter().sum();
		assert_approx_eq!(boxcar.sum(), expected);
	}

	#[test]
	fn clear_resets_window() {
		let mut boxcar = Boxcar::<f32, 4>::new();
		boxcar.push(3.);
		boxcar.push(4.);

		boxcar.clear();

		assert_approx_eq!(boxcar.sum(), 0.);
		assert!(boxcar.iter().all(|sample| *sample == 0.));
		assert_eq!(boxcar.capacity(), 4);
	}
}
