//! Pipeline configuration. The pen firmware exists in several sensor
//! configurations that differ in channel count and in the exact wording of
//! the start/stop markers, so nothing about the stream shape is hard-coded:
//! every variant is described by a [PenConfig], either built from one of
//! the presets below or loaded from a RON file.

use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    fmt, fs,
    path::Path,
};

/// How the buffer turns accumulated samples into classifier windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum WindowMode {
    /// Emit an overlapping window every `window_step` samples while the
    /// stream is live.
    Sliding,
    /// Emit exactly one window per recording session, padded or truncated
    /// to `window_size` when the stop marker arrives.
    SingleShot,
}

/// Describes one sensor configuration of the pen and the windowing policy
/// to apply to its stream.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PenConfig {
    /// Exact line the firmware prints when the pen starts recording.
    pub start_marker: String,
    /// Exact line the firmware prints when the pen stops recording.
    pub stop_marker: String,
    /// Field separator in telemetry lines.
    pub delimiter: char,
    /// Ordered channel names; the length fixes the expected field count.
    pub channels: Vec<String>,
    /// Rows per classifier window.
    pub window_size: usize,
    /// Rows to advance between windows in [WindowMode::Sliding].
    pub window_step: usize,
    /// Window extraction policy.
    pub mode: WindowMode,
}

/// Things that can go wrong loading, saving, or validating a [PenConfig].
#[derive(Debug)]
pub enum ConfigError {
    /// Returned when io fails while reading or writing a config file.
    IoError(std::io::Error),
    /// Returned when serialization of the config fails.
    RonError(ron::Error),
    /// Returned when deserialization of the config fails.
    RonSpannedError(ron::de::SpannedError),
    /// Returned when the config values cannot describe a usable pipeline.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ConfigError as CE;
        let msg = match self {
            CE::IoError(error) => Cow::from(format!("io error: {}", error)),
            CE::RonError(error) => Cow::from(format!("ron error: {}", error)),
            CE::RonSpannedError(error) => Cow::from(format!("ron spanning error: {}", error)),
            CE::Invalid(reason) => Cow::from(format!("invalid config: {}", reason)),
        };

        write!(f, "{}", msg)
    }
}

impl std::error::Error for ConfigError {}

fn imu_channels() -> Vec<String> {
    [
        "Acc_X", "Acc_Y", "Acc_Z", "Gyro_X", "Gyro_Y", "Gyro_Z", "Mag_X", "Mag_Y", "Mag_Z",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl PenConfig {
    /// The full prototype: IMU, one force pad, and the IR optical sensor.
    /// This is the configuration the reference classifier was trained on.
    pub fn all_sensors() -> Self {
        let mut channels = imu_channels();
        channels.push("Force".to_string());
        channels.push("IR_A".to_string());
        Self {
            start_marker: "System Activated".to_string(),
            stop_marker: "System Deactivated".to_string(),
            delimiter: ',',
            channels,
            window_size: 64,
            window_step: 32,
            mode: WindowMode::SingleShot,
        }
    }

    /// Early bring-up board with nothing but the 9-axis IMU. Its firmware
    /// prefixes the control markers with "IMU".
    pub fn single_imu() -> Self {
        Self {
            start_marker: "IMU System Activated".to_string(),
            stop_marker: "IMU System Deactivated".to_string(),
            delimiter: ',',
            channels: imu_channels(),
            window_size: 64,
            window_step: 32,
            mode: WindowMode::SingleShot,
        }
    }

    /// IMU plus force pad plus the two-channel optical sensor.
    pub fn imu_force_optic() -> Self {
        let mut channels = imu_channels();
        channels.push("Force".to_string());
        channels.push("Optic_D".to_string());
        channels.push("Optic_A".to_string());
        Self {
            start_marker: "IMU System Activated".to_string(),
            stop_marker: "IMU System Deactivated".to_string(),
            delimiter: ',',
            channels,
            window_size: 64,
            window_step: 32,
            mode: WindowMode::SingleShot,
        }
    }

    /// Grip variant with three force pads around the barrel.
    pub fn triple_force() -> Self {
        let mut channels = imu_channels();
        channels.push("Force1".to_string());
        channels.push("Force2".to_string());
        channels.push("Force3".to_string());
        Self {
            start_marker: "System Activated".to_string(),
            stop_marker: "System Deactivated".to_string(),
            delimiter: ',',
            channels,
            window_size: 64,
            window_step: 32,
            mode: WindowMode::Sliding,
        }
    }

    /// Number of numeric fields every telemetry line must carry.
    pub fn feature_count(&self) -> usize {
        self.channels.len()
    }

    /// Checks that the config describes a pipeline that can actually run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.is_empty() {
            return Err(ConfigError::Invalid("no channels declared".to_string()));
        }
        if self.window_size == 0 {
            return Err(ConfigError::Invalid("window_size must be at least 1".to_string()));
        }
        if self.window_step == 0 {
            return Err(ConfigError::Invalid("window_step must be at least 1".to_string()));
        }
        if self.start_marker == self.stop_marker {
            return Err(ConfigError::Invalid(
                "start and stop markers must differ".to_string(),
            ));
        }
        Ok(())
    }

    /// Load a config from a RON file and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(ConfigError::IoError)?;
        let config: PenConfig =
            ron::de::from_str(&text).map_err(ConfigError::RonSpannedError)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config out as RON.
    pub fn to_path(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let text = ron::ser::to_string(self).map_err(ConfigError::RonError)?;
        fs::write(path, text).map_err(ConfigError::IoError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_channel_counts() {
        assert_eq!(PenConfig::single_imu().feature_count(), 9);
        assert_eq!(PenConfig::all_sensors().feature_count(), 11);
        assert_eq!(PenConfig::imu_force_optic().feature_count(), 12);
        assert_eq!(PenConfig::triple_force().feature_count(), 12);
    }

    #[test]
    fn presets_validate() {
        for config in [
            PenConfig::single_imu(),
            PenConfig::all_sensors(),
            PenConfig::imu_force_optic(),
            PenConfig::triple_force(),
        ] {
            config.validate().unwrap();
        }
    }

    #[test]
    fn rejects_degenerate_configs() {
        let mut config = PenConfig::all_sensors();
        config.window_step = 0;
        assert!(config.validate().is_err());

        let mut config = PenConfig::all_sensors();
        config.channels.clear();
        assert!(config.validate().is_err());

        let mut config = PenConfig::all_sensors();
        config.stop_marker = config.start_marker.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn write_and_read_path() {
        let tempfile = tempfile::NamedTempFile::new().unwrap();
        let path = tempfile.path();
        let config = PenConfig::imu_force_optic();

        config.to_path(path).unwrap();
        let read_config = PenConfig::from_path(path).unwrap();
        assert_eq!(config, read_config);
    }
}
