//! iRMC profile comparison
//!
//! Profiles are the hierarchical JSON documents the iRMC exports through its
//! RESTful interface. This crate loads them and compares two of them,
//! reporting every structural and value difference.
//!
//! # Example
//!
//! ```
//! use irmc_profile::compare;
//! use serde_json::json;
//!
//! let intended = json!({"Server": {"Ntp": ["ntp1", "ntp2"]}});
//! let actual = json!({"Server": {"Ntp": ["ntp1"]}});
//!
//! let result = compare(&intended, &actual);
//! assert!(!result.equal);
//! assert_eq!(
//!     result.messages(),
//!     vec![
//!         "'Server.Ntp': list len '2' != list len '1'",
//!         "'Server.Ntp[1]': only on 'original' side",
//!     ]
//! );
//! ```

pub mod diff;
pub mod error;
pub mod load;

pub use diff::{compare, Comparison, Difference, Side};
pub use error::{ProfileError, Result};
pub use load::{load, ProfileSlot};
