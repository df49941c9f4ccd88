//! Flight recorder: a `log` backend writing every record to a timestamped file and to stdout.

#[macro_use]
extern crate lazy_static;

use chrono::{Datelike, Timelike};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::{
	collections::VecDeque,
	fs::{File, OpenOptions},
	io::{self, Write},
	path::{Path, PathBuf},
	thread,
	thread::JoinHandle,
	time::{Duration, Instant},
};

lazy_static! {
	static ref BLACK_BOX_CHANNEL: (Sender<Message>, Receiver<Message>) = unbounded::<Message>();
	static ref BLACK_BOX_LOGGER: BlackBoxLogger = BlackBoxLogger {
		start_instant: Instant::now()
	};
}

enum Message {
	Log(String),
	Flush,
}

/// Records are written out once more than this many are buffered.
const MAX_BUFFER_LEN: usize = 8;

pub struct BlackBox {
	file: File,
	path: PathBuf,
	buffer: VecDeque<String>,
}

impl BlackBox {
	/// Creates a new flight log in `directory`.
	pub fn new<P: AsRef<Path>>(directory: P) -> io::Result<Self> {
		let path = directory
			.as_ref()
			.join(file_name(&chrono::offset::Local::now()));

		let file = OpenOptions::new()
			.write(true)
			.create(true)
			.truncate(true)
			.open(&path)?;

		Ok(BlackBox {
			file,
			path,
			buffer: VecDeque::<String>::new(),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn try_flush(&mut self) {
		if let Err(e) = self.flush() {
			self.buffer
				.push_back(format!("Failed to flush black box: {}", e));
		}
	}

	fn flush(&mut self) -> io::Result<()> {
		while let Some(message) = self.buffer.pop_front() {
			println!("{}", message);
			writeln!(self.file, "{}", message)?;
		}
		self.file.flush()
	}

	fn receive(&mut self, message: Message) {
		match message {
			Message::Log(content) => self.buffer.push_back(content),
			Message::Flush => self.try_flush(),
		}

		if self.buffer.len() > MAX_BUFFER_LEN {
			self.try_flush();
		}
	}

	fn receive_loop(&mut self) {
		const RECEIVE_TIMEOUT: Duration = Duration::from_millis(500);

		while let Ok(message) = BLACK_BOX_CHANNEL.1.recv_timeout(RECEIVE_TIMEOUT) {
			self.receive(message);
		}

		// Quiet period: write out what is left
		if !self.buffer.is_empty() {
			self.try_flush();
		}
	}

	/// Installs the global logger and starts writing records. Fails if a logger is already set.
	pub fn spawn(mut self, level_filter: LevelFilter) -> Result<JoinHandle<()>, SetLoggerError> {
		log::set_logger(&*BLACK_BOX_LOGGER)?;
		log::set_max_level(level_filter);

		Ok(thread::spawn(move || loop {
			self.receive_loop()
		}))
	}
}

/// `flight_<h>-<m>-<s>_<d>-<mo>-<y>.log`
pub fn file_name<T: Datelike + Timelike>(time: &T) -> String {
	format!(
		"flight_{}-{}-{}_{}-{}-{}.log",
		time.hour(),
		time.minute(),
		time.second(),
		time.day(),
		time.month(),
		time.year()
	)
}

/// `[elapsed][Level][module] message`, followed by `(file:line)` for errors.
pub fn format_record(record: &Record, elapsed: Duration) -> String {
	if record.level() == Level::Error {
		format!(
			"[{:.3}][{:?}][{}] {} ({}:{})",
			elapsed.as_secs_f32(),
			record.level(),
			record.module_path().unwrap_or("unknown"),
			record.args(),
			record.file().unwrap_or("unknown"),
			record.line().unwrap_or(0)
		)
	} else {
		format!(
			"[{:.3}][{:?}][{}] {}",
			elapsed.as_secs_f32(),
			record.level(),
			record.module_path().unwrap_or("unknown"),
			record.args(),
		)
	}
}

struct BlackBoxLogger {
	start_instant: Instant,
}

impl Log for BlackBoxLogger {
	fn enabled(&self, _: &Metadata) -> bool {
		true
	}

	fn log(&self, record: &Record) {
		if self.enabled(record.metadata()) {
			let formatted = format_record(record, self.start_instant.elapsed());
			// The receiving end is static and never dropped
			let _ = BLACK_BOX_CHANNEL.0.send(Message::Log(formatted));
		}
	}

	fn flush(&self) {
		let _ = BLACK_BOX_CHANNEL.0.send(Message::Flush);
	}
}
