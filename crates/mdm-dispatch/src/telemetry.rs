//! Structured telemetry initialisation for dispatch hosts.
//!
//! Dispatch and response events are emitted under the
//! `mdm-dispatch::dispatch` and `mdm-dispatch::response` targets. Rejected
//! and failed requests carry the rendered `status` as a numeric field, so the
//! JSON format can be filtered on it without parsing the message.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, MakeWriter};

use mdm_config::{Config, LogFormat};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Configures the global tracing subscriber when invoked for the first time.
///
/// Repeated calls are idempotent: the first successful invocation installs
/// the global subscriber and later calls return a fresh [`TelemetryHandle`]
/// without touching global state.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured filter does not
/// parse and [`TelemetryError::Subscriber`] when another subscriber is
/// already installed.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(config))
        .map(|_| TelemetryHandle)
}

fn install_subscriber(config: &Config) -> Result<(), TelemetryError> {
    // Colour only on interactive terminals.
    let subscriber = build_subscriber(config, io::stderr, io::stderr().is_terminal())?;
    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}

fn build_subscriber<W>(
    config: &Config,
    writer: W,
    ansi: bool,
) -> Result<Box<dyn Subscriber + Send + Sync>, TelemetryError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(config.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    Ok(match config.log_format() {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex, PoisonError};

    use http::StatusCode;

    use super::*;
    use crate::mdm::Request;
    use crate::tests::support::MockCheckinService;
    use crate::{ResponsePolicy, checkin_request};

    #[derive(Clone, Default)]
    struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

    impl CapturedOutput {
        fn contents(&self) -> String {
            let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }

    impl io::Write for CapturedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'writer> MakeWriter<'writer> for CapturedOutput {
        type Writer = Self;

        fn make_writer(&'writer self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn rejects_invalid_filter_before_installing() {
        let config = Config {
            log_filter: String::from("mdm_dispatch=[unclosed"),
            ..Config::default()
        };
        let error = install_subscriber(&config).expect_err("invalid filter");
        assert!(matches!(error, TelemetryError::Filter(_)));
    }

    #[test]
    fn json_events_carry_the_rendered_status() {
        let output = CapturedOutput::default();
        let config = Config {
            log_format: LogFormat::Json,
            ..Config::default()
        };
        let subscriber = build_subscriber(&config, output.clone(), false).expect("subscriber");

        let response = tracing::subscriber::with_default(subscriber, || {
            let service = MockCheckinService::new();
            ResponsePolicy::default().render(checkin_request(&service, &Request::new(), b""))
        });
        assert_eq!(response.status, StatusCode::BAD_REQUEST);

        let logged = output.contents();
        let line = logged
            .lines()
            .find(|line| line.contains("dispatch rejected"))
            .expect("response event logged");
        let event: serde_json::Value = serde_json::from_str(line).expect("json event");
        assert_eq!(event["target"], "mdm-dispatch::response");
        assert_eq!(event["level"], "WARN");
        assert_eq!(event["status"], 400);
    }

    #[test]
    fn filter_excludes_dispatch_events_when_set_to_error() {
        let output = CapturedOutput::default();
        let config = Config {
            log_filter: String::from("error"),
            log_format: LogFormat::Compact,
            ..Config::default()
        };
        let subscriber = build_subscriber(&config, output.clone(), false).expect("subscriber");

        tracing::subscriber::with_default(subscriber, || {
            let service = MockCheckinService::new();
            ResponsePolicy::default().render(checkin_request(&service, &Request::new(), b""))
        });
        assert!(!output.contents().contains("dispatch rejected"));
    }
}
