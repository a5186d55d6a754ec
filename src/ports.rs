//! Hub generations and their logical-role to physical-port layouts.
//!
//! A DUPLO hub exposes four devices on fixed port ids, but the ids are not
//! guaranteed to be the same across hub generations. [`PortRegistry`] keeps one
//! [`PortMap`] per [`HardwareVariant`] and answers "which port is the motor on
//! this hub?".
//!
//! # Example
//!
//! ```rust
//! use duplo_hub::ports::{HardwareVariant, PortRegistry, PortRole, RegistryError};
//!
//! let registry = PortRegistry::standard();
//! assert_eq!(registry.resolve(HardwareVariant::OLD, PortRole::ColorSensor), Ok(0x12));
//!
//! // The newer hub has no confirmed layout yet.
//! assert_eq!(
//!     registry.resolve(HardwareVariant::NEW, PortRole::Motor),
//!     Err(RegistryError::UnsupportedVariant(HardwareVariant::NEW)),
//! );
//! ```

use heapless::Vec as HVec;
use thiserror::Error;

/// Maximum number of hub layouts a registry can hold.
pub const MAX_VARIANTS: usize = 4;

/// Logical device on the hub.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PortRole {
    /// Drive motor.
    Motor,
    /// Front RGB light.
    Lights,
    /// Sound player.
    Speaker,
    /// Downward-facing color sensor.
    ColorSensor,
}

impl PortRole {
    /// All roles, in a stable order.
    pub const ALL: [PortRole; 4] = [
        PortRole::Motor,
        PortRole::Lights,
        PortRole::Speaker,
        PortRole::ColorSensor,
    ];

    /// Short label used in log lines and port reports.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            PortRole::Motor => "motor",
            PortRole::Lights => "lights",
            PortRole::Speaker => "speaker",
            PortRole::ColorSensor => "color_sensor",
        }
    }
}

/// Hub generation, identified by the LWP3 system type id it advertises.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardwareVariant(pub u8);

impl HardwareVariant {
    /// First-generation DUPLO train hub.
    pub const OLD: HardwareVariant = HardwareVariant(0x20);
    /// Second-generation DUPLO train hub.
    pub const NEW: HardwareVariant = HardwareVariant(0x21);

    /// Raw id used when scanning for the hub.
    #[inline]
    pub const fn id(&self) -> u8 {
        self.0
    }

    /// Parse a variant from its model name (`"old"` / `"new"`).
    ///
    /// ```
    /// use duplo_hub::ports::HardwareVariant;
    ///
    /// assert_eq!(HardwareVariant::from_name("old"), Some(HardwareVariant::OLD));
    /// assert_eq!(HardwareVariant::from_name(" NEW "), Some(HardwareVariant::NEW));
    /// assert_eq!(HardwareVariant::from_name("classic"), None);
    /// ```
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("old") {
            Some(Self::OLD)
        } else if s.eq_ignore_ascii_case("new") {
            Some(Self::NEW)
        } else {
            None
        }
    }
}

/// Failure to map a role onto a physical port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No layout is registered for this hub generation.
    #[error("no port layout registered for hardware variant {:#04x}", .0.id())]
    UnsupportedVariant(HardwareVariant),
    /// The layout exists but has no port for the role.
    #[error("hardware variant {:#04x} has no {} port", .variant.id(), .role.as_str())]
    UnsupportedRole {
        /// Variant that was looked up.
        variant: HardwareVariant,
        /// Role missing from its layout.
        role: PortRole,
    },
}

/// Role to port id layout for one hub generation.
///
/// Roles that don't exist on a given hub are left as `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortMap {
    /// Motor port id.
    pub motor: Option<u8>,
    /// Light port id.
    pub lights: Option<u8>,
    /// Speaker port id.
    pub speaker: Option<u8>,
    /// Color sensor port id.
    pub color_sensor: Option<u8>,
}

impl PortMap {
    /// Layout of the first-generation hub.
    pub const OLD_HUB: PortMap = PortMap {
        motor: Some(0x29),
        lights: Some(0x11),
        speaker: Some(0x01),
        color_sensor: Some(0x12),
    };

    /// Port id for a role, if the hub has that device.
    #[inline]
    pub const fn port(&self, role: PortRole) -> Option<u8> {
        match role {
            PortRole::Motor => self.motor,
            PortRole::Lights => self.lights,
            PortRole::Speaker => self.speaker,
            PortRole::ColorSensor => self.color_sensor,
        }
    }

    /// Reverse lookup: which role sits on `port`.
    pub fn role_of(&self, port: u8) -> Option<PortRole> {
        PortRole::ALL
            .into_iter()
            .find(|role| self.port(*role) == Some(port))
    }

    /// Set the port for a role.
    pub fn with_port(mut self, role: PortRole, port: u8) -> Self {
        match role {
            PortRole::Motor => self.motor = Some(port),
            PortRole::Lights => self.lights = Some(port),
            PortRole::Speaker => self.speaker = Some(port),
            PortRole::ColorSensor => self.color_sensor = Some(port),
        }
        self
    }
}

/// Immutable set of hub layouts keyed by [`HardwareVariant`].
#[derive(Clone, Debug, Default)]
pub struct PortRegistry {
    maps: HVec<(HardwareVariant, PortMap), MAX_VARIANTS>,
}

impl PortRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every layout confirmed on hardware.
    ///
    /// Only the first-generation hub is registered: the second generation's
    /// layout has not been confirmed and is not assumed to match.
    pub fn standard() -> Self {
        Self::new().with_map(HardwareVariant::OLD, PortMap::OLD_HUB)
    }

    /// Add (or replace) the layout for a variant.
    ///
    /// Layouts beyond [`MAX_VARIANTS`] are ignored.
    pub fn with_map(mut self, variant: HardwareVariant, map: PortMap) -> Self {
        if let Some(slot) = self.maps.iter_mut().find(|(v, _)| *v == variant) {
            slot.1 = map;
        } else {
            let _ = self.maps.push((variant, map));
        }
        self
    }

    /// Layout for a variant.
    pub fn map(&self, variant: HardwareVariant) -> Result<&PortMap, RegistryError> {
        self.maps
            .iter()
            .find(|(v, _)| *v == variant)
            .map(|(_, m)| m)
            .ok_or(RegistryError::UnsupportedVariant(variant))
    }

    /// Physical port id for `role` on `variant`.
    pub fn resolve(&self, variant: HardwareVariant, role: PortRole) -> Result<u8, RegistryError> {
        self.map(variant)?
            .port(role)
            .ok_or(RegistryError::UnsupportedRole { variant, role })
    }

    /// Whether a layout is registered for `variant`.
    pub fn supports(&self, variant: HardwareVariant) -> bool {
        self.map(variant).is_ok()
    }
}
