use crossbeam_channel::{Receiver, Sender};
use std::{
	thread,
	time::{Duration, Instant},
};

pub trait Autopilot<In, Out>
where
	Self: Sized + Send + 'static,
	Out: Send + 'static,
	In: Send + 'static,
{
	const MAX_CONTROL_LOOP_PERIOD: Duration;

	fn output_frame(&mut self, input_frame: In) -> Out;

	/// Runs until every input sender or the output receiver is dropped.
	fn control_loop(&mut self, receiver: Receiver<In>, sender: Sender<Out>) {
		let mut last_output_frame_instant = Instant::now();

		// Empty the receiver queue, while keeping the latest input frame.
		// Starvation is avoided by setting a maximum period in which an output frame should be
		// emitted.
		while let Ok(input_frame) = receiver.recv() {
			if receiver.is_empty()
				|| (Instant::now() - last_output_frame_instant) >= Self::MAX_CONTROL_LOOP_PERIOD
			{
				if sender.send(self.output_frame(input_frame)).is_err() {
					error!("Output frame receiver disconnected, stopping control loop");
					break;
				}

				last_output_frame_instant = Instant::now();
			}
		}
	}

	fn spawn(mut self, receiver: Receiver<In>, sender: Sender<Out>) -> thread::JoinHandle<()> {
		thread::spawn(move || self.control_loop(receiver, sender))
	}
}

/// Controllers that export data to external devices.
pub trait OutputController<T: Send + 'static>
where
	Self: Sized + Send + 'static,
{
	/// Writes an output value to a physical actuator.
	fn write_output(&mut self, output: T) -> anyhow::Result<()>;

	fn spawn(mut self, output_receiver: Receiver<T>) -> thread::JoinHandle<()> {
		thread::spawn(move || {
			for output in output_receiver.iter() {
				self.write_output(output)
					.map_err(|e| error!("Failed to write output: {}", e))
					.unwrap_or_default();
			}
		})
	}
}
