use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::handler::{DeviceStateRequestHandler, RequestHandler, StallOnlyRequestHandler};
use crate::mux::RequestHandlerMultiplexer;
use crate::protocol::{RequestKind, SetupPacket, StandardRequest};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid replay configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Handlers to register, in registration order.
///
/// # Examples
/// ```
/// use ssreq_core::{HandlerSpec, ReplayConfig, StallRule};
///
/// let config: ReplayConfig = serde_json::from_str(
///     r#"{"handlers": [{"kind": "stall_only", "stall_when": {"rule": "request", "code": 6}}]}"#,
/// )?;
/// assert_eq!(
///     config.handlers,
///     vec![HandlerSpec::StallOnly { stall_when: StallRule::Request { code: 6 } }]
/// );
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayConfig {
    pub handlers: Vec<HandlerSpec>,
}

/// Variants carry braces even when empty: serde only rejects unknown keys for
/// struct variants of an internally tagged enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum HandlerSpec {
    DeviceState {},
    StallOnly { stall_when: StallRule },
}

/// Predicate deciding which requests a stall-only handler rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case", deny_unknown_fields)]
pub enum StallRule {
    Always {},
    Never {},
    /// Class, vendor and reserved request kinds.
    NonStandard {},
    /// A specific `bRequest` code, regardless of kind.
    Request { code: u8 },
    /// Anything but a standard SET_ADDRESS or SET_CONFIGURATION.
    NotHandled {},
}

impl StallRule {
    pub fn matches(&self, setup: &SetupPacket) -> bool {
        match self {
            StallRule::Always {} => true,
            StallRule::Never {} => false,
            StallRule::NonStandard {} => setup.kind() != RequestKind::Standard,
            StallRule::Request { code } => setup.request == *code,
            StallRule::NotHandled {} => !matches!(
                setup.standard_request(),
                Some(StandardRequest::SetAddress | StandardRequest::SetConfiguration)
            ),
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            handlers: vec![
                HandlerSpec::DeviceState {},
                HandlerSpec::StallOnly {
                    stall_when: StallRule::NotHandled {},
                },
            ],
        }
    }
}

impl ReplayConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn build_multiplexer(&self) -> RequestHandlerMultiplexer {
        let mut builder = RequestHandlerMultiplexer::builder();
        for spec in &self.handlers {
            builder.add_boxed_interface(spec.build());
        }
        builder.build()
    }
}

impl HandlerSpec {
    pub fn build(&self) -> Box<dyn RequestHandler> {
        match *self {
            HandlerSpec::DeviceState {} => Box::new(DeviceStateRequestHandler::new()),
            HandlerSpec::StallOnly { stall_when } => Box::new(StallOnlyRequestHandler::new(
                move |setup: &SetupPacket| stall_when.matches(setup),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses_from_json() {
        let json = r#"{"handlers": [
            {"kind": "device_state"},
            {"kind": "stall_only", "stall_when": {"rule": "not_handled"}}
        ]}"#;
        let config: ReplayConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config, ReplayConfig::default());
        assert_eq!(config.build_multiplexer().len(), 2);
    }

    #[test]
    fn unknown_top_level_field_is_rejected() {
        let err = serde_json::from_str::<ReplayConfig>(r#"{"handlers": [], "extra": 1}"#);
        assert!(err.is_err());
    }

    #[test]
    fn unknown_handler_field_is_rejected() {
        let misplaced_rule =
            r#"{"handlers": [{"kind": "device_state", "stall_when": {"rule": "always"}}]}"#;
        assert!(serde_json::from_str::<ReplayConfig>(misplaced_rule).is_err());
    }

    #[test]
    fn unknown_rule_field_is_rejected() {
        let stray_code =
            r#"{"handlers": [{"kind": "stall_only", "stall_when": {"rule": "never", "code": 6}}]}"#;
        assert!(serde_json::from_str::<ReplayConfig>(stray_code).is_err());

        let request = r#"{"handlers": [{"kind": "stall_only", "stall_when": {"rule": "request", "code": 6}}]}"#;
        let config: ReplayConfig = serde_json::from_str(request).unwrap();
        assert_eq!(
            config.handlers,
            vec![HandlerSpec::StallOnly {
                stall_when: StallRule::Request { code: 6 }
            }]
        );
    }

    #[test]
    fn empty_variants_serialize_as_bare_tags() {
        let json = serde_json::to_string(&ReplayConfig::default()).unwrap();
        assert_eq!(
            json,
            r#"{"handlers":[{"kind":"device_state"},{"kind":"stall_only","stall_when":{"rule":"not_handled"}}]}"#
        );
    }

    #[test]
    fn stall_rules() {
        let set_address = SetupPacket::from_words(0x0012_0500, 0);
        let get_descriptor = SetupPacket::from_words(0x0100_0680, 0x0012_0000);
        let vendor = SetupPacket::from_words(0x0000_01c0, 0x0040_0000);

        assert!(!StallRule::NotHandled {}.matches(&set_address));
        assert!(StallRule::NotHandled {}.matches(&get_descriptor));
        assert!(StallRule::NotHandled {}.matches(&vendor));
        assert!(StallRule::NonStandard {}.matches(&vendor));
        assert!(!StallRule::NonStandard {}.matches(&get_descriptor));
        assert!(StallRule::Request { code: 6 }.matches(&get_descriptor));
        assert!(StallRule::Always {}.matches(&set_address));
        assert!(!StallRule::Never {}.matches(&vendor));
    }
}
