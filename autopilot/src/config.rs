use log::LevelFilter;
use mixer::MixerConfig;
use navigation::NavConfig;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
	/// One of `none`, `error`, `warn`, `info`, `debug` or `all`.
	pub log_level_filter: String,
	pub mixer: MixerConfig,
	pub navigation: NavConfig,
}

impl Default for FlightConfig {
	fn default() -> Self {
		FlightConfig {
			log_level_filter: String::from("info"),
			mixer: MixerConfig::default(),
			navigation: NavConfig::default(),
		}
	}
}

pub trait TryIntoLevelFilter {
	fn try_into_level_filter(&self) -> Result<LevelFilter, ()>;
}

impl TryIntoLevelFilter for String {
	fn try_into_level_filter(&self) -> Result<LevelFilter, ()> {
		Ok(match self.as_str() {
			"none" => LevelFilter::Off,
			"error" => LevelFilter::Error,
			"warn" => LevelFilter::Warn,
			"info" => LevelFilter::Info,
			"debug" => LevelFilter::Debug,
			"all" => LevelFilter::Trace,
			_ => return Err(()),
		})
	}
}

pub fn read<P: AsRef<Path>>(path: P) -> anyhow::Result<FlightConfig> {
	let config_file = File::open(path)?;

	let config: FlightConfig = serde_json::from_reader(config_file)?;

	Ok(config)
}

pub fn save<P: AsRef<Path>>(path: P, config: &FlightConfig) -> anyhow::Result<()> {
	let mut config_file = OpenOptions::new()
		.create(true)
		.write(true)
		.truncate(true)
		.open(path)?;

	write!(config_file, "{}", serde_json::to_string_pretty(config)?)?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use crate::config::{self, FlightConfig, TryIntoLevelFilter};
	use log::LevelFilter;
	use mixer::Airframe;
	use std::fs;

	#[test]
	fn level_filters() {
		assert_eq!(String::from("none").try_into_level_filter(), Ok(LevelFilter::Off));
		assert_eq!(String::from("debug").try_into_level_filter(), Ok(LevelFilter::Debug));
		assert_eq!(String::from("all").try_into_level_filter(), Ok(LevelFilter::Trace));
		assert_eq!(String::from("verbose").try_into_level_filter(), Err(()));
	}

	#[test]
	fn save_then_read() {
		let path = std::env::temp_dir().join(format!("flight_config_{}.json", std::process::id()));

		let mut flight_config = FlightConfig::default();
		flight_config.mixer.airframe = Airframe::FlyingWing;
		flight_config.mixer.servos[3].rate = 80;
		flight_config.navigation.rth_altitude = 60;

		config::save(&path, &flight_config).unwrap();
		let read = config::read(&path).unwrap();
		fs::remove_file(&path).unwrap();

		assert_eq!(read, flight_config);
	}

	#[test]
	fn missing_sections_use_defaults() {
		let flight_config: FlightConfig =
			serde_json::from_str(r#"{ "navigation": { "cruise_throttle": 1450 } }"#).unwrap();

		assert_eq!(flight_config.log_level_filter, "info");
		assert_eq!(flight_config.navigation.cruise_throttle, 1450);
		assert_eq!(flight_config.navigation.climb_throttle, 1900);
		assert_eq!(flight_config.mixer.airframe, Airframe::QuadX);
	}

	#[test]
	fn missing_file() {
		assert!(config::read("/nonexistent/flight_config.json").is_err());
	}
}
