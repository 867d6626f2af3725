//! N-to-1 composition of request handlers onto one shared interface.
//!
//! Registration happens once, through [`MultiplexerBuilder`]. A built
//! [`RequestHandlerMultiplexer`] has a fixed, ordered set of handlers; there
//! is no way to add or remove one afterwards.
//!
//! Each [`RequestHandlerMultiplexer::step`]:
//! 1. broadcasts the shared inputs to every handler unchanged,
//! 2. samples every handler's outputs,
//! 3. folds them through the arbitration table (see [`arbitration`]),
//! 4. clocks every handler.

pub mod arbitration;

pub use arbitration::{
    Arbitration, ArbitrationPolicy, SignalGroup, arbitrate, policy_for, resolve,
};

use tracing::trace;

use crate::handler::{HandlerInputs, HandlerOutputs, RequestHandler, RequestHandlerInterface};

/// Collects handlers in registration order before the bus goes live.
#[derive(Default)]
pub struct MultiplexerBuilder {
    handlers: Vec<Box<dyn RequestHandler>>,
}

impl MultiplexerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler. Earlier registrations win priority-encoded groups;
    /// later registrations win the transmit and handshake groups.
    ///
    /// No arbitration token is involved: at most one handler is expected to
    /// drive its outputs in any step.
    pub fn add_interface<H>(&mut self, handler: H) -> &mut Self
    where
        H: RequestHandler + 'static,
    {
        self.handlers.push(Box::new(handler));
        self
    }

    /// [`add_interface`](Self::add_interface) for handlers already boxed,
    /// e.g. when the handler set comes from configuration.
    pub fn add_boxed_interface(&mut self, handler: Box<dyn RequestHandler>) -> &mut Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn build(self) -> RequestHandlerMultiplexer {
        let handlers = self.handlers.into_boxed_slice();
        let outputs = vec![HandlerOutputs::default(); handlers.len()].into_boxed_slice();
        RequestHandlerMultiplexer {
            handlers,
            outputs,
            shared: RequestHandlerInterface::default(),
        }
    }
}

pub struct RequestHandlerMultiplexer {
    handlers: Box<[Box<dyn RequestHandler>]>,
    outputs: Box<[HandlerOutputs]>,
    shared: RequestHandlerInterface,
}

impl RequestHandlerMultiplexer {
    pub fn builder() -> MultiplexerBuilder {
        MultiplexerBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// The post-multiplexer interface as of the last step.
    pub fn shared(&self) -> &RequestHandlerInterface {
        &self.shared
    }

    /// What handler `index` saw and drove during the last step.
    pub fn interface(&self, index: usize) -> Option<RequestHandlerInterface> {
        let outputs = *self.outputs.get(index)?;
        Some(RequestHandlerInterface {
            inputs: self.shared.inputs,
            outputs,
        })
    }

    /// Run one step and return the shared outputs.
    pub fn step(&mut self, inputs: HandlerInputs) -> HandlerOutputs {
        self.step_resolved(inputs).shared
    }

    /// Like [`step`](Self::step), but also reports which handler won each
    /// signal group.
    pub fn step_resolved(&mut self, inputs: HandlerInputs) -> Arbitration {
        self.shared.inputs = inputs;
        for (handler, outputs) in self.handlers.iter().zip(self.outputs.iter_mut()) {
            *outputs = handler.outputs(&inputs);
        }

        let arbitration = resolve(&self.outputs);
        for group in [
            SignalGroup::AddressChange,
            SignalGroup::ConfigChange,
            SignalGroup::Transmit,
            SignalGroup::HandshakeOut,
        ] {
            if let Some(index) = arbitration.winner(group) {
                trace!(
                    ?group,
                    index,
                    handler = self.handlers[index].name(),
                    "arbitration winner"
                );
            }
        }

        for handler in self.handlers.iter_mut() {
            handler.clock(&inputs);
        }
        self.shared.outputs = arbitration.shared;
        arbitration
    }
}
