//! Host bootstrap: configuration, telemetry and the response policy.
//!
//! A transport layer embeds the dispatchers through [`DispatchHost`], which
//! pairs each dispatcher with the configured [`ResponsePolicy`] so HTTP
//! handlers only have to move bytes and status codes.

use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;
use tracing::info;

use mdm_config::Config;

use crate::dispatch::{checkin_request, command_and_report_results_request};
use crate::mdm::Request;
use crate::response::{Response, ResponsePolicy, ResponsePolicyError};
use crate::service::{Checkin, CommandAndReportResults};
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Tracing target for bootstrap operations.
const BOOTSTRAP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bootstrap");

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the host configuration.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader returning a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Creates a loader that always yields `config`.
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        #[source]
        source: TelemetryError,
    },
    /// The configured response policy is invalid.
    #[error("invalid response policy: {source}")]
    ResponsePolicy {
        #[source]
        source: ResponsePolicyError,
    },
}

/// Bootstrapped host state shared by every request.
#[derive(Debug, Clone)]
pub struct DispatchHost {
    config: Config,
    policy: ResponsePolicy,
    telemetry: TelemetryHandle,
}

impl DispatchHost {
    /// Resolved configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Policy used to render responses.
    pub fn policy(&self) -> ResponsePolicy {
        self.policy
    }

    /// Telemetry handle kept alive for the host's lifetime.
    pub fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Dispatches a check-in body and renders the transport response.
    pub fn handle_checkin<S>(&self, service: &S, request: &Request, body: &[u8]) -> Response
    where
        S: Checkin + ?Sized,
    {
        self.policy
            .render(checkin_request(service, request, body))
    }

    /// Dispatches a command report body and renders the transport response.
    pub fn handle_command_report<S>(
        &self,
        service: &S,
        request: &Request,
        body: &[u8],
    ) -> Response
    where
        S: CommandAndReportResults + ?Sized,
    {
        self.policy
            .render(command_and_report_results_request(service, request, body))
    }
}

/// Loads configuration, initialises telemetry and builds the response
/// policy.
///
/// # Errors
///
/// Returns [`BootstrapError`] when any stage fails.
pub fn bootstrap_with(loader: &dyn ConfigLoader) -> Result<DispatchHost, BootstrapError> {
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let policy = ResponsePolicy::from_config(&config)
        .map_err(|source| BootstrapError::ResponsePolicy { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;

    info!(
        target: BOOTSTRAP_TARGET,
        log_format = %config.log_format(),
        unclassified_status = policy.unclassified().as_u16(),
        "dispatch host ready"
    );

    Ok(DispatchHost {
        config,
        policy,
        telemetry,
    })
}
