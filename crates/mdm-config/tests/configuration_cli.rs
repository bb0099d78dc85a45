//! Command-line layering for [`Config`].

use std::ffi::OsString;

use mdm_config::{Config, DEFAULT_UNCLASSIFIED_STATUS};
use ortho_config::OrthoConfig;
use rstest::rstest;

fn args(extra: &[&str]) -> Vec<OsString> {
    std::iter::once("mdm-dispatch")
        .chain(extra.iter().copied())
        .map(OsString::from)
        .collect()
}

#[test]
fn cli_flags_override_defaults() {
    let config = Config::load_from_iter(args(&["--log-filter", "mdm_dispatch=debug"]))
        .expect("configuration loads");
    assert_eq!(config.log_filter(), "mdm_dispatch=debug");
    assert_eq!(config.unclassified_status(), DEFAULT_UNCLASSIFIED_STATUS);
}

#[test]
fn cli_sets_unclassified_status() {
    let config = Config::load_from_iter(args(&["--unclassified-status", "503"]))
        .expect("configuration loads");
    assert_eq!(config.unclassified_status(), 503);
}

#[rstest]
#[case::not_a_number("not-a-number")]
#[case::negative("-1")]
#[case::overflow("70000")]
fn malformed_status_fails_to_load(#[case] value: &str) {
    let result = Config::load_from_iter(args(&["--unclassified-status", value]));
    assert!(result.is_err(), "expected {value:?} to be rejected");
}
