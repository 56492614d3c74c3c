//! A small Rust client for the NOAA Chesapeake Bay Interpretive Buoy
//! System (CBIBS) API.
//!
//! This crate wraps the public buoy-telemetry service at
//! `mw.buoybay.noaa.gov`: fetch the current readings for every station, or
//! for a single station identified by its short code, in JSON or XML.
//!
//! ## Quick start
//! - Configure the API key via [`Client::new`], or via environment
//!   variables (`CBIBS_API_KEY`, `CBIBS_URL`, `CBIBS_FORMAT`) or a
//!   `.cbibsrc` file (supported in the current directory and in your home
//!   directory) with [`Client::from_env`].
//! - Call [`Client::current_readings`] or [`Client::station_readings`].
//!
//! ```no_run
//! use cbibs::{Client, Payload};
//!
//! fn main() -> cbibs::Result<()> {
//!     let client = Client::from_env()?;
//!     if let Payload::Json(readings) = client.station_readings("AN")? {
//!         println!("{readings}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Calls that share connections can run inside a scoped session:
//!
//! ```no_run
//! use cbibs::Client;
//!
//! fn main() -> cbibs::Result<()> {
//!     let mut client = Client::new("my-key");
//!     client.with_session(|c| {
//!         let _all = c.current_readings()?;
//!         let _one = c.station_readings("SN")?;
//!         Ok(())
//!     })
//! }
//! ```
//!
//! One service quirk worth knowing: in JSON mode CBIBS answers HTTP 200
//! even for a bad API key, so the client probes the payload and reports
//! [`Error::Auth`] explicitly. In XML mode no such signal exists.

#![forbid(unsafe_code)]

mod client;
mod config;
mod error;
mod response;
mod station;

pub use client::{Client, ClientConfig, DEFAULT_BASE_URL, ResponseFormat};
pub use error::{Error, Result};
pub use response::Payload;
pub use station::Station;
