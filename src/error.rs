//! Error types
//!
//! Configuration errors are raised while building a simulation and always
//! abort before the tick loop starts. Numerical degeneracy inside a tick is
//! never an error; it is absorbed locally as a zero force.

use std::fmt;

/// Invalid simulation configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Perimeter point count outside the supported range
    PerimeterCount { count: usize, min: usize, max: usize },
    /// Rim rest length is zero, negative or not finite
    DegenerateRestLength(f64),
    /// Point mass is zero, negative or not finite
    InvalidMass(f64),
    /// Point radius is negative or not finite
    InvalidRadius(f64),
    /// Spring stiffness is negative or not finite
    InvalidStiffness(f64),
    /// Explicit initial positions do not match the perimeter count
    InitialPositionCount { expected: usize, got: usize },
    /// A physics parameter is not finite (or out of its valid range)
    InvalidParameter { name: &'static str, value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerimeterCount { count, min, max } => {
                write!(f, "perimeter point count {count} is outside {min}..={max}")
            }
            Self::DegenerateRestLength(length) => {
                write!(f, "rim rest length must be positive and finite, got {length}")
            }
            Self::InvalidMass(mass) => write!(f, "point mass must be positive and finite, got {mass}"),
            Self::InvalidRadius(radius) => {
                write!(f, "point radius must be non-negative and finite, got {radius}")
            }
            Self::InvalidStiffness(k) => {
                write!(f, "spring stiffness must be non-negative and finite, got {k}")
            }
            Self::InitialPositionCount { expected, got } => {
                write!(f, "expected {expected} initial positions, got {got}")
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "physics parameter `{name}` has invalid value {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors loading or validating settings
#[derive(Debug)]
pub enum SettingsError {
    /// Failed to read or write the settings file
    Io(std::io::Error),
    /// Settings file is not valid JSON for [`crate::Settings`]
    Parse(serde_json::Error),
    /// Settings parsed but describe an invalid simulation
    Config(ConfigError),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to access settings file: {e}"),
            Self::Parse(e) => write!(f, "failed to parse settings: {e}"),
            Self::Config(e) => write!(f, "invalid settings: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<ConfigError> for SettingsError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Errors controlling the tick loop
#[derive(Debug)]
pub enum DriverError {
    /// The driver was already started (it runs at most once)
    AlreadyStarted,
    /// The tick thread could not be spawned
    Spawn(std::io::Error),
    /// The tick thread panicked
    ThreadPanicked,
    /// The simulation was already handed back by an earlier join
    AlreadyJoined,
    /// Pacing options rejected before the thread was spawned
    Config(ConfigError),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyStarted => write!(f, "simulation driver was already started"),
            Self::Spawn(e) => write!(f, "failed to spawn simulation thread: {e}"),
            Self::ThreadPanicked => write!(f, "simulation thread panicked"),
            Self::AlreadyJoined => write!(f, "simulation driver was already joined"),
            Self::Config(e) => write!(f, "invalid driver options: {e}"),
        }
    }
}

impl From<ConfigError> for DriverError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}
