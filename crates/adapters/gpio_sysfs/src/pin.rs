//! A single exported sysfs GPIO pin.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GpioError;

/// Default root of the sysfs GPIO interface.
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            // "low" sets the direction and drives the pin low atomically.
            Self::Out => "low",
        }
    }
}

/// Which electrical level counts as "active".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    #[default]
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    #[must_use]
    pub fn from_active_high(active_high: bool) -> Self {
        if active_high {
            Self::ActiveHigh
        } else {
            Self::ActiveLow
        }
    }

    fn to_level(self, active: bool) -> bool {
        active == matches!(self, Self::ActiveHigh)
    }

    fn to_active(self, level: bool) -> bool {
        level == matches!(self, Self::ActiveHigh)
    }
}

/// An exported pin, addressed by its `value` attribute.
#[derive(Debug)]
pub struct SysfsPin {
    number: u32,
    value_path: PathBuf,
    polarity: Polarity,
}

impl SysfsPin {
    /// Export pin `number` under `root` (unless already exported) and set
    /// its direction.
    ///
    /// # Errors
    ///
    /// Returns [`GpioError::Io`] if any sysfs attribute cannot be written.
    pub fn open(
        root: &Path,
        number: u32,
        direction: Direction,
        polarity: Polarity,
    ) -> Result<Self, GpioError> {
        let pin_dir = root.join(format!("gpio{number}"));
        if !pin_dir.exists() {
            write_attr(&root.join("export"), &number.to_string())?;
            tracing::debug!(pin = number, "gpio exported");
        }
        write_attr(&pin_dir.join("direction"), direction.as_str())?;
        tracing::info!(pin = number, direction = direction.as_str(), ?polarity, "gpio ready");

        Ok(Self {
            number,
            value_path: pin_dir.join("value"),
            polarity,
        })
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Whether the pin currently sits at its active level.
    ///
    /// # Errors
    ///
    /// Returns [`GpioError`] if the value cannot be read or parsed.
    pub fn is_active(&self) -> Result<bool, GpioError> {
        let raw = fs::read_to_string(&self.value_path).map_err(|source| GpioError::Io {
            path: self.value_path.clone(),
            source,
        })?;
        let level = match raw.trim() {
            "1" => true,
            "0" => false,
            other => {
                return Err(GpioError::UnexpectedValue {
                    path: self.value_path.clone(),
                    value: other.to_string(),
                });
            }
        };
        Ok(self.polarity.to_active(level))
    }

    /// Drive the pin to its active (or idle) level.
    ///
    /// # Errors
    ///
    /// Returns [`GpioError::Io`] if the value cannot be written.
    pub fn set_active(&self, active: bool) -> Result<(), GpioError> {
        let level = if self.polarity.to_level(active) { "1" } else { "0" };
        write_attr(&self.value_path, level)
    }
}

fn write_attr(path: &Path, value: &str) -> Result<(), GpioError> {
    fs::write(path, value).map_err(|source| GpioError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Lay out a fake sysfs tree with pin `number` already exported.
    pub(crate) fn fake_pin(root: &Path, number: u32, value: &str) {
        let dir = root.join(format!("gpio{number}"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("direction"), "in").unwrap();
        fs::write(dir.join("value"), value).unwrap();
    }

    #[test]
    fn should_export_missing_pin() {
        let root = tempfile::tempdir().unwrap();
        // The kernel would create gpio25/ on export; the test can only
        // check that the export was requested.
        let err = SysfsPin::open(root.path(), 25, Direction::Out, Polarity::ActiveHigh);
        assert_eq!(
            fs::read_to_string(root.path().join("export")).unwrap(),
            "25"
        );
        assert!(matches!(err, Err(GpioError::Io { .. })));
    }

    #[test]
    fn should_set_direction_of_exported_pin() {
        let root = tempfile::tempdir().unwrap();
        fake_pin(root.path(), 25, "1");

        let pin = SysfsPin::open(root.path(), 25, Direction::Out, Polarity::ActiveHigh).unwrap();

        assert_eq!(pin.number(), 25);
        assert_eq!(
            fs::read_to_string(root.path().join("gpio25/direction")).unwrap(),
            "low"
        );
        assert!(!root.path().join("export").exists());
    }

    #[test]
    fn should_read_active_high_level() {
        let root = tempfile::tempdir().unwrap();
        fake_pin(root.path(), 32, "1\n");
        let pin = SysfsPin::open(root.path(), 32, Direction::In, Polarity::ActiveHigh).unwrap();
        assert!(pin.is_active().unwrap());
    }

    #[test]
    fn should_invert_active_low_level() {
        let root = tempfile::tempdir().unwrap();
        fake_pin(root.path(), 32, "1\n");
        let pin = SysfsPin::open(root.path(), 32, Direction::In, Polarity::ActiveLow).unwrap();
        assert!(!pin.is_active().unwrap());

        pin.set_active(true).unwrap();
        assert_eq!(
            fs::read_to_string(root.path().join("gpio32/value")).unwrap(),
            "0"
        );
    }

    #[test]
    fn should_reject_garbage_value() {
        let root = tempfile::tempdir().unwrap();
        fake_pin(root.path(), 32, "x");
        let pin = SysfsPin::open(root.path(), 32, Direction::In, Polarity::ActiveHigh).unwrap();
        assert!(matches!(
            pin.is_active(),
            Err(GpioError::UnexpectedValue { .. })
        ));
    }
}
