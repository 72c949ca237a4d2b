//! Common types for iRMC access

use std::time::Duration;

/// Power state of a server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// Server is powered on
    On,
    /// Server is powered off
    Off,
    /// Power state is unknown
    Unknown,
}

impl PowerState {
    /// Parse the Redfish `PowerState` property
    pub fn from_redfish(value: &str) -> Self {
        match value {
            "On" => PowerState::On,
            "Off" => PowerState::Off,
            _ => PowerState::Unknown,
        }
    }
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerState::On => write!(f, "On"),
            PowerState::Off => write!(f, "Off"),
            PowerState::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Reset types accepted by the iRMC system reset action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetType {
    /// Power on
    PowerOn,
    /// Hard power off
    PowerOff,
    /// Power off then on
    PowerCycle,
    /// ACPI shutdown
    GracefulPowerOff,
    /// Hard reset
    ImmediateReset,
    /// Reboot through the operating system
    GracefulReset,
    /// Pulse the non-maskable interrupt
    PulseNmi,
    /// Press the power button
    PressPowerButton,
}

impl ResetType {
    /// All reset types
    pub const ALL: [ResetType; 8] = [
        ResetType::PowerOn,
        ResetType::PowerOff,
        ResetType::PowerCycle,
        ResetType::GracefulPowerOff,
        ResetType::ImmediateReset,
        ResetType::GracefulReset,
        ResetType::PulseNmi,
        ResetType::PressPowerButton,
    ];

    /// Value of the `FTSResetType` property
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetType::PowerOn => "PowerOn",
            ResetType::PowerOff => "PowerOff",
            ResetType::PowerCycle => "PowerCycle",
            ResetType::GracefulPowerOff => "GracefulPowerOff",
            ResetType::ImmediateReset => "ImmediateReset",
            ResetType::GracefulReset => "GracefulReset",
            ResetType::PulseNmi => "PulseNmi",
            ResetType::PressPowerButton => "PressPowerButton",
        }
    }

    /// Whether a server in `state` is already where this reset would leave it
    pub fn is_satisfied_by(&self, state: PowerState) -> bool {
        matches!(
            (self, state),
            (ResetType::PowerOn, PowerState::On)
                | (ResetType::PowerOff | ResetType::GracefulPowerOff, PowerState::Off)
        )
    }
}

impl std::fmt::Display for ResetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResetType::ALL
            .into_iter()
            .find(|reset| reset.as_str() == s)
            .ok_or_else(|| format!("unknown reset type '{}'", s))
    }
}

/// iRMC connection configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host name or address of the iRMC (no scheme)
    pub host: String,
    /// Username
    pub username: String,
    /// Password
    pub password: String,
    /// Verify TLS certificates
    pub validate_certs: bool,
    /// Attempts per request on connection errors
    pub retries: u32,
    /// Delay before the first retry, doubled on each further one
    pub backoff: Duration,
    /// Interval between session status polls
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Create new config
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            validate_certs: true,
            retries: 5,
            backoff: Duration::from_millis(100),
            poll_interval: Duration::from_secs(10),
        }
    }

    /// Enable or disable certificate verification
    pub fn with_validate_certs(mut self, validate: bool) -> Self {
        self.validate_certs = validate;
        self
    }

    /// Set retry count and initial backoff
    pub fn with_retries(mut self, retries: u32, backoff: Duration) -> Self {
        self.retries = retries;
        self.backoff = backoff;
        self
    }

    /// Set the session poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// URL of the SCCI configuration endpoint
    pub fn scci_url(&self) -> String {
        format!("http://{}/config", self.host)
    }

    /// URL of a RESTful resource
    pub fn rest_url(&self, uri: &str) -> String {
        format!("https://{}/{}", self.host, uri.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_state() {
        assert_eq!(PowerState::from_redfish("On"), PowerState::On);
        assert_eq!(PowerState::from_redfish("Off"), PowerState::Off);
        assert_eq!(PowerState::from_redfish("PoweringOn"), PowerState::Unknown);
        assert_eq!(PowerState::On.to_string(), "On");
    }

    #[test]
    fn test_reset_type_parse() {
        for reset in ResetType::ALL {
            assert_eq!(reset.as_str().parse::<ResetType>().unwrap(), reset);
        }
        assert!("Reboot".parse::<ResetType>().is_err());
    }

    #[test]
    fn test_reset_type_satisfied() {
        assert!(ResetType::PowerOn.is_satisfied_by(PowerState::On));
        assert!(ResetType::GracefulPowerOff.is_satisfied_by(PowerState::Off));
        assert!(!ResetType::PowerCycle.is_satisfied_by(PowerState::On));
        assert!(!ResetType::PowerOn.is_satisfied_by(PowerState::Off));
    }

    #[test]
    fn test_client_config() {
        let config = ClientConfig::new("irmc.local", "admin", "secret");

        assert!(config.validate_certs);
        assert_eq!(config.retries, 5);
        assert_eq!(config.scci_url(), "http://irmc.local/config");
        assert_eq!(
            config.rest_url("/redfish/v1/Systems/0/"),
            "https://irmc.local/redfish/v1/Systems/0/"
        );

        let config = config
            .with_validate_certs(false)
            .with_poll_interval(Duration::from_secs(1));
        assert!(!config.validate_certs);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }
}
