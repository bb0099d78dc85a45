//! Check-in and command-report dispatch for an MDM server.
//!
//! Devices talk to the server through two endpoints. Check-in bodies carry a
//! `MessageType` and are routed to one method of a [`service::Checkin`]
//! implementation. Command reports carry the outcome of the previous command
//! and are answered with the next queued command, if any.
//!
//! [`checkin_request`] and [`command_and_report_results_request`] perform the
//! decode and route steps. Their errors tag malformed bodies with
//! `400 Bad Request` and leave every other status to the host, which renders
//! them through a [`ResponsePolicy`]. [`bootstrap_with`] wires configuration,
//! telemetry and that policy into a [`DispatchHost`].

mod bootstrap;
mod dispatch;
pub mod mdm;
mod response;
pub mod service;
mod telemetry;

pub use bootstrap::{
    BootstrapError, ConfigLoader, DispatchHost, StaticConfigLoader, SystemConfigLoader,
    bootstrap_with,
};
pub use dispatch::{
    BoxError, DispatchError, PayloadError, StatusError, checkin_request,
    command_and_report_results_request, find_status,
};
pub use response::{Response, ResponsePolicy, ResponsePolicyError};
pub use telemetry::{TelemetryError, TelemetryHandle, initialise as initialise_telemetry};

#[cfg(test)]
mod tests;
