//! Flight controller glue: configuration, the per-tick controller and its threads.

#[macro_use]
extern crate anyhow;

#[macro_use]
extern crate log;

use crossbeam_channel::{unbounded, Sender};
use std::path::Path;
use std::thread::JoinHandle;

use black_box::BlackBox;

pub mod config;
mod controller;
mod frame;
mod traits;

pub use crate::config::{FlightConfig, TryIntoLevelFilter};
pub use crate::controller::FlightController;
pub use crate::frame::{InputFrame, OutputFrame};
pub use crate::traits::{Autopilot, OutputController};

/// Installs the flight log in `directory`, at the configured level.
pub fn init_logging<P: AsRef<Path>>(config: &FlightConfig, directory: P) -> anyhow::Result<JoinHandle<()>> {
	let level_filter = config
		.log_level_filter
		.try_into_level_filter()
		.map_err(|_| anyhow!("Invalid log level filter \"{}\"", config.log_level_filter))?;

	let black_box = BlackBox::new(directory)?;
	let path = black_box.path().to_path_buf();
	let handle = black_box
		.spawn(level_filter)
		.map_err(|e| anyhow!("Failed to install the black box logger: {}", e))?;

	info!("Autopilot {}, logging to {}", env!("CARGO_PKG_VERSION"), path.display());

	Ok(handle)
}

/// Starts the controller and output threads. Input frames are sent through the returned sender;
/// dropping it stops both threads.
pub fn start<O>(config: &FlightConfig, output_controller: O) -> anyhow::Result<(Sender<InputFrame>, JoinHandle<()>)>
where
	O: OutputController<OutputFrame>,
{
	let controller = FlightController::new(config)?;

	let (output_frame_sender, output_frame_receiver) = unbounded::<OutputFrame>();
	output_controller.spawn(output_frame_receiver);

	let (input_frame_sender, input_frame_receiver) = unbounded::<InputFrame>();
	let handle = controller.spawn(input_frame_receiver, output_frame_sender);

	info!("Flight controller started for {:?}", config.mixer.airframe);

	Ok((input_frame_sender, handle))
}
