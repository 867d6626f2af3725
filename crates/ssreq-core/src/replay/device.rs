use crate::DeviceStateSummary;
use crate::handler::HandlerOutputs;

/// Device address and configuration as changed by the shared interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DeviceState {
    pub address: u8,
    pub configuration: u8,
}

impl DeviceState {
    pub(crate) fn apply(&mut self, shared: &HandlerOutputs) {
        if shared.address_changed {
            self.address = shared.new_address;
        }
        if shared.config_changed {
            self.configuration = shared.new_config;
        }
    }

    pub(crate) fn summary(&self) -> DeviceStateSummary {
        DeviceStateSummary {
            address: self.address,
            configuration: self.configuration,
        }
    }
}
