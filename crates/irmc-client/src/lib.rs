//! iRMC client
//!
//! This crate talks to a Fujitsu iRMC over HTTP.
//!
//! # Interfaces
//!
//! - **SCCI**: XML command sequences posted to `http://<host>/config`, used
//!   for ConfigSpace reads/writes and power commands
//! - **Redfish**: the RESTful interface at `https://<host>/`, used for the
//!   system resource, OEM resets and session tracking
//!
//! # Example
//!
//! ```no_run
//! use irmc_client::{BmcController, ClientConfig, IrmcController, ResetType};
//!
//! # async fn example() -> irmc_client::Result<()> {
//! let config = ClientConfig::new("irmc.example.com", "admin", "admin")
//!     .with_validate_certs(false);
//! let controller = IrmcController::new(config)?;
//!
//! println!("server is {}", controller.get_power_state().await?);
//!
//! // Graceful power off through the OEM reset action
//! if !controller.set_power_state(ResetType::GracefulPowerOff).await? {
//!     println!("already off");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Testing
//!
//! Clients are built on a [`Transport`]; tests substitute their own
//! implementation with [`ScciClient::with_transport`] or
//! [`RedfishClient::with_transport`].

pub mod controller;
pub mod error;
pub mod redfish;
pub mod scci;
pub mod session;
pub mod transport;
pub mod types;

pub use controller::{BmcController, IrmcController};
pub use error::{ClientError, Result};
pub use redfish::{json_path, RedfishClient};
pub use scci::ScciClient;
pub use session::{wait_for_session, SessionOutcome, SESSION_ERROR_STATUS};
pub use transport::{Exchange, HttpRequest, Method, ReqwestTransport, Transport};
pub use types::{ClientConfig, PowerState, ResetType};
