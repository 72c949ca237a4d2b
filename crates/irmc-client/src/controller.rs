//! BMC controller trait and the iRMC implementation

use async_trait::async_trait;
use irmc_scci::{ScciCommand, ScciRequest};
use serde_json::{json, Value};
use tracing::info;

use crate::error::{ClientError, Result};
use crate::redfish::{json_path, RedfishClient};
use crate::scci::ScciClient;
use crate::types::{ClientConfig, PowerState, ResetType};

/// Redfish system resource of the server
pub const SYSTEM_URI: &str = "redfish/v1/Systems/0/";

/// OEM reset action of the server
pub const RESET_ACTION_URI: &str = "redfish/v1/Systems/0/Actions/Oem/FTSComputerSystem.Reset";

/// Opcode extension sent with the SCCI power commands
pub const POWER_OPCODE_EXT: u16 = 0x200;

const RESET_ACTION: &str =
    "http://ts.fujitsu.com/redfish-schemas/v1/FTSSchema.v1_0_0#FTSComputerSystem.Reset";

/// Trait for BMC power management operations
#[async_trait]
pub trait BmcController: Send + Sync {
    /// Power on the machine
    async fn power_on(&self) -> Result<()>;

    /// Power off the machine (hard shutdown)
    async fn power_off(&self) -> Result<()>;

    /// Power cycle the machine (off then on)
    async fn power_cycle(&self) -> Result<()>;

    /// Hard reset
    async fn reset(&self) -> Result<()>;

    /// Shut down through the operating system
    async fn graceful_shutdown(&self) -> Result<()>;

    /// Reboot through the operating system
    async fn graceful_reboot(&self) -> Result<()>;

    /// Get current power state
    async fn get_power_state(&self) -> Result<PowerState>;
}

/// iRMC controller
///
/// Power actions go through the SCCI scripting interface, the power state
/// and OEM resets through Redfish.
#[derive(Debug, Clone)]
pub struct IrmcController {
    scci: ScciClient,
    redfish: RedfishClient,
}

impl IrmcController {
    /// Create a controller using the `reqwest` transport
    pub fn new(config: ClientConfig) -> Result<Self> {
        let scci = ScciClient::new(&config)?;
        let redfish = RedfishClient::new(config)?;
        Ok(Self::with_clients(scci, redfish))
    }

    /// Create a controller from existing clients
    pub fn with_clients(scci: ScciClient, redfish: RedfishClient) -> Self {
        Self { scci, redfish }
    }

    async fn command(&self, command: ScciCommand) -> Result<()> {
        info!(command = command.name(), "sending power command");
        self.scci
            .execute(&ScciRequest::new(command, POWER_OPCODE_EXT))
            .await?;
        Ok(())
    }

    async fn system(&self) -> Result<Value> {
        self.redfish.get_json(SYSTEM_URI).await
    }

    /// Apply an OEM reset
    ///
    /// Returns `false` without doing anything when the server is already in
    /// the requested state.
    pub async fn set_power_state(&self, reset: ResetType) -> Result<bool> {
        let system = self.system().await?;
        let current = power_state_of(&system)?;
        if reset.is_satisfied_by(current) {
            info!(state = %current, "server already in requested state");
            return Ok(false);
        }

        let allowed = json_path(
            &system,
            &["Actions", "Oem", RESET_ACTION, "FTSResetType@Redfish.AllowableValues"],
        )?;
        let offered = allowed
            .as_array()
            .is_some_and(|values| values.iter().any(|v| v == reset.as_str()));
        if !offered {
            return Err(ClientError::Unsupported {
                requested: reset.to_string(),
                allowed: allowed.to_string(),
            });
        }

        info!(reset = %reset, "requesting reset");
        let body = json!({ "FTSResetType": reset.as_str() });
        self.redfish.post(RESET_ACTION_URI, &body.to_string()).await?;
        Ok(true)
    }
}

fn power_state_of(system: &Value) -> Result<PowerState> {
    let state = json_path(system, &["PowerState"])?;
    Ok(PowerState::from_redfish(state.as_str().unwrap_or_default()))
}

#[async_trait]
impl BmcController for IrmcController {
    async fn power_on(&self) -> Result<()> {
        self.command(ScciCommand::PowerOn).await
    }

    async fn power_off(&self) -> Result<()> {
        self.command(ScciCommand::PowerOff).await
    }

    async fn power_cycle(&self) -> Result<()> {
        self.command(ScciCommand::PowerCycle).await
    }

    async fn reset(&self) -> Result<()> {
        self.command(ScciCommand::Reset).await
    }

    async fn graceful_shutdown(&self) -> Result<()> {
        self.command(ScciCommand::GracefulShutdown).await
    }

    async fn graceful_reboot(&self) -> Result<()> {
        self.command(ScciCommand::GracefulReboot).await
    }

    async fn get_power_state(&self) -> Result<PowerState> {
        power_state_of(&self.system().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::transport::{Exchange, HttpRequest, Method, Transport};

    const SYSTEM: &str = r#"{
        "PowerState": "Off",
        "Actions": {"Oem": {
            "http://ts.fujitsu.com/redfish-schemas/v1/FTSSchema.v1_0_0#FTSComputerSystem.Reset": {
                "FTSResetType@Redfish.AllowableValues": ["PowerOn", "PowerOff", "PowerCycle"]
            }
        }}
    }"#;

    const SCCI_OK: &str = r#"<Status><Value>0</Value><CMD OE="200" OI="0"><STATUS>0</STATUS></CMD></Status>"#;

    /// Fake iRMC answering Redfish GETs with a system resource
    struct FakeIrmc {
        sent: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait]
    impl Transport for FakeIrmc {
        async fn send(&self, request: HttpRequest) -> Exchange {
            let body = match request.method {
                Method::Get => SYSTEM,
                _ if request.url.ends_with("/config") => SCCI_OK,
                _ => "",
            };
            let status = if request.method == Method::Post && body.is_empty() { 204 } else { 200 };
            let exchange = Exchange::completed(&request, status, body);
            self.sent.lock().unwrap().push(request);
            exchange
        }
    }

    fn controller() -> (IrmcController, Arc<FakeIrmc>) {
        let transport = Arc::new(FakeIrmc {
            sent: Mutex::new(Vec::new()),
        });
        let config = ClientConfig::new("irmc.local", "admin", "admin");
        let controller = IrmcController::with_clients(
            ScciClient::with_transport(&config, transport.clone()),
            RedfishClient::with_transport(config, transport.clone()),
        );
        (controller, transport)
    }

    #[tokio::test]
    async fn test_get_power_state() {
        let (controller, _) = controller();
        assert_eq!(controller.get_power_state().await.unwrap(), PowerState::Off);
    }

    #[tokio::test]
    async fn test_power_on_uses_scci() {
        let (controller, transport) = controller();

        controller.power_on().await.unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].url, "http://irmc.local/config");
        let body = sent[0].body.as_deref().unwrap();
        assert!(body.contains(r#"OC="0111" OE="200" OI="0" CA="-1" Type="SET""#));
    }

    #[tokio::test]
    async fn test_set_power_state_posts_reset() {
        let (controller, transport) = controller();

        assert!(controller.set_power_state(ResetType::PowerOn).await.unwrap());

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[1].url,
            "https://irmc.local/redfish/v1/Systems/0/Actions/Oem/FTSComputerSystem.Reset"
        );
        assert_eq!(sent[1].body.as_deref(), Some(r#"{"FTSResetType":"PowerOn"}"#));
    }

    #[tokio::test]
    async fn test_set_power_state_already_in_state() {
        let (controller, transport) = controller();

        assert!(!controller.set_power_state(ResetType::GracefulPowerOff).await.unwrap());
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_set_power_state_not_offered() {
        let (controller, _) = controller();

        let err = controller.set_power_state(ResetType::PulseNmi).await.unwrap_err();
        assert_eq!(err.status(), 11);
        assert_eq!(
            err.to_string(),
            r#"Invalid parameter 'PulseNmi'. Allowed: ["PowerOn","PowerOff","PowerCycle"]"#
        );
    }
}
