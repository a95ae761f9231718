//! Logical register table.
//!
//! Maps operator-facing parameter names onto device register addresses and
//! their accepted value domains. The table is fixed at compile time; nothing
//! mutates it at runtime.

use std::fmt;
use std::str::FromStr;

use crate::error::{UnknownRegister, ValueDomainError};

/// Accepted values for a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueDomain {
    /// Any value in the inclusive range.
    Range {
        /// Smallest accepted value.
        min: u8,
        /// Largest accepted value.
        max: u8,
    },
    /// One of a small set of discrete selector values.
    Choice(&'static [u8]),
    /// The register cannot be written.
    ReadOnly,
}

impl ValueDomain {
    /// Whether the domain accepts the value.
    pub fn contains(&self, value: u8) -> bool {
        match self {
            ValueDomain::Range { min, max } => (*min..=*max).contains(&value),
            ValueDomain::Choice(values) => values.contains(&value),
            ValueDomain::ReadOnly => false,
        }
    }
}

impl fmt::Display for ValueDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueDomain::Range { min, max } => write!(f, "{min}..={max}"),
            ValueDomain::Choice(values) => {
                write!(f, "{{")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "}}")
            }
            ValueDomain::ReadOnly => write!(f, "read-only"),
        }
    }
}

/// The image-processing registers the panel exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// Display brightness.
    Brightness,
    /// Display contrast.
    Contrast,
    /// Electronic magnification selector (1x/2x/4x).
    DigitalZoom,
    /// Thermal color mapping (white-hot/black-hot/thermal-dart).
    Polarity,
    /// Automatic gain control mode.
    AgcMode,
    /// Non-uniformity correction mode.
    NucMode,
    /// Aiming overlay style.
    Reticle,
    /// Aiming overlay colour.
    ReticleColour,
    /// Firmware version, reported as four dotted components.
    FirmwareVersion,
}

impl Register {
    /// Every register, in panel display order.
    pub const ALL: [Register; 9] = [
        Register::Brightness,
        Register::Contrast,
        Register::DigitalZoom,
        Register::Polarity,
        Register::AgcMode,
        Register::NucMode,
        Register::Reticle,
        Register::ReticleColour,
        Register::FirmwareVersion,
    ];

    /// Device register address.
    pub fn address(&self) -> u8 {
        match self {
            Register::Brightness => 0xD0,
            Register::Contrast => 0xD4,
            Register::DigitalZoom => 0x86,
            Register::Polarity => 0x52,
            Register::AgcMode => 0x51,
            Register::NucMode => 0x91,
            Register::Reticle => 0x66,
            Register::ReticleColour => 0x67,
            Register::FirmwareVersion => 0x10,
        }
    }

    /// Canonical lowercase lookup name.
    pub fn name(&self) -> &'static str {
        match self {
            Register::Brightness => "brightness",
            Register::Contrast => "contrast",
            Register::DigitalZoom => "digital_zoom",
            Register::Polarity => "polarity",
            Register::AgcMode => "agc_mode",
            Register::NucMode => "nuc_mode",
            Register::Reticle => "reticle",
            Register::ReticleColour => "reticle_colour",
            Register::FirmwareVersion => "firmware_version",
        }
    }

    /// Accepted value domain.
    pub fn domain(&self) -> ValueDomain {
        match self {
            Register::Brightness | Register::Contrast => ValueDomain::Range { min: 0, max: 255 },
            Register::DigitalZoom | Register::Polarity | Register::AgcMode | Register::NucMode => {
                ValueDomain::Choice(&[0, 1, 2])
            }
            Register::Reticle => ValueDomain::Choice(&[0, 1, 2, 3, 4, 5, 6]),
            Register::ReticleColour => ValueDomain::Choice(&[0, 1, 2, 3, 4, 5]),
            Register::FirmwareVersion => ValueDomain::ReadOnly,
        }
    }

    /// Device-side factory default. Seeds the panel UI; nothing substitutes
    /// it silently for a rejected write.
    pub fn default_value(&self) -> u8 {
        0
    }

    /// Whether the register accepts writes.
    pub fn is_writable(&self) -> bool {
        !matches!(self.domain(), ValueDomain::ReadOnly)
    }

    /// Whether the register's data bytes decode as dotted version components
    /// rather than a 32-bit integer.
    pub fn decodes_as_version(&self) -> bool {
        matches!(self, Register::FirmwareVersion)
    }

    /// Check a requested write value against the register's domain.
    ///
    /// Returns the value as a wire byte, or an error naming the accepted
    /// domain.
    pub fn validate_value(&self, raw: i64) -> Result<u8, ValueDomainError> {
        let domain = self.domain();
        if matches!(domain, ValueDomain::ReadOnly) {
            return Err(ValueDomainError::ReadOnly {
                register: self.name(),
            });
        }
        let in_domain = u8::try_from(raw)
            .map(|v| domain.contains(v))
            .unwrap_or(false);
        if !in_domain {
            return Err(ValueDomainError::OutOfDomain {
                register: self.name(),
                value: raw,
                domain,
            });
        }
        Ok(raw as u8)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Register {
    type Err = UnknownRegister;

    /// Resolve a logical parameter name. The short forms used by the legacy
    /// panel routes are accepted as aliases.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "brightness" => Ok(Register::Brightness),
            "contrast" => Ok(Register::Contrast),
            "digital_zoom" | "dzoom" => Ok(Register::DigitalZoom),
            "polarity" => Ok(Register::Polarity),
            "agc_mode" | "agc" => Ok(Register::AgcMode),
            "nuc_mode" | "nuc" => Ok(Register::NucMode),
            "reticle" => Ok(Register::Reticle),
            "reticle_colour" => Ok(Register::ReticleColour),
            "firmware_version" | "fw_version" => Ok(Register::FirmwareVersion),
            _ => Err(UnknownRegister(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        for register in Register::ALL {
            assert_eq!(register.name().parse::<Register>(), Ok(register));
        }
        assert_eq!("dzoom".parse::<Register>(), Ok(Register::DigitalZoom));
        assert_eq!("fw_version".parse::<Register>(), Ok(Register::FirmwareVersion));
        assert!("focus".parse::<Register>().is_err());
    }

    #[test]
    fn test_addresses() {
        assert_eq!(Register::Brightness.address(), 0xD0);
        assert_eq!(Register::Contrast.address(), 0xD4);
        assert_eq!(Register::DigitalZoom.address(), 0x86);
        assert_eq!(Register::FirmwareVersion.address(), 0x10);
    }

    #[test]
    fn test_validate_in_domain() {
        assert_eq!(Register::Brightness.validate_value(255), Ok(255));
        assert_eq!(Register::Contrast.validate_value(100), Ok(100));
        assert_eq!(Register::Reticle.validate_value(6), Ok(6));
    }

    #[test]
    fn test_out_of_domain_is_rejected_not_clamped() {
        // The legacy panel mapped digital zoom 9 to the default 0. That
        // substitution is gone: the value is rejected and the error spells
        // out the accepted selectors.
        let err = Register::DigitalZoom.validate_value(9).unwrap_err();
        assert_eq!(
            err,
            ValueDomainError::OutOfDomain {
                register: "digital_zoom",
                value: 9,
                domain: ValueDomain::Choice(&[0, 1, 2]),
            }
        );
        assert!(err.to_string().contains("{0, 1, 2}"));
    }

    #[test]
    fn test_negative_and_wide_values_rejected() {
        assert!(Register::Brightness.validate_value(-1).is_err());
        assert!(Register::Brightness.validate_value(256).is_err());
        assert!(Register::Polarity.validate_value(i64::MAX).is_err());
    }

    #[test]
    fn test_firmware_version_rejects_writes() {
        assert_eq!(
            Register::FirmwareVersion.validate_value(1),
            Err(ValueDomainError::ReadOnly {
                register: "firmware_version"
            })
        );
    }
}
