use tracing::debug;

use super::{HandlerInputs, HandlerOutputs, RequestHandler};
use crate::protocol::{Recipient, StandardRequest};

/// Answers `SET_ADDRESS` and `SET_CONFIGURATION` at their status stage.
///
/// The change request and the ACK are raised together on the
/// `status_requested` strobe. Every other request is left to other handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceStateRequestHandler;

impl DeviceStateRequestHandler {
    pub fn new() -> Self {
        Self
    }
}

impl RequestHandler for DeviceStateRequestHandler {
    fn outputs(&self, inputs: &HandlerInputs) -> HandlerOutputs {
        let mut outputs = HandlerOutputs::default();
        if !inputs.status_requested || inputs.setup.recipient() != Recipient::Device {
            return outputs;
        }

        match inputs.setup.standard_request() {
            Some(StandardRequest::SetAddress) => {
                debug!(address = inputs.setup.value, "SET_ADDRESS status stage");
                outputs.change_address(inputs.setup.value as u8);
                outputs.ack();
            }
            Some(StandardRequest::SetConfiguration) => {
                debug!(config = inputs.setup.value, "SET_CONFIGURATION status stage");
                outputs.change_config(inputs.setup.value as u8);
                outputs.ack();
            }
            _ => {}
        }
        outputs
    }

    fn name(&self) -> &'static str {
        "device_state"
    }
}
