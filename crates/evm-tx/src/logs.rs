//! Multi-interface log extraction
//!
//! Logs are visited in receipt order. Each log is offered to the interfaces
//! in the order given by the caller, and the first interface that decodes
//! it claims it. Logs no interface understands are skipped.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Log};
use gyro_core::MonetaryAmount;

use crate::interface::{DecodedLog, InterfaceSet};

/// A log successfully decoded by one of the interfaces
#[derive(Debug, Clone, PartialEq)]
pub struct EventMatch {
    /// Position of the decoding interface in the [`InterfaceSet`]
    pub interface_index: usize,
    /// Contract that emitted the log
    pub address: Address,
    pub event_name: String,
    pub args: Vec<(String, DynSolValue)>,
}

impl EventMatch {
    fn new(interface_index: usize, address: Address, decoded: DecodedLog) -> Self {
        Self {
            interface_index,
            address,
            event_name: decoded.name,
            args: decoded.args,
        }
    }

    pub fn arg(&self, name: &str) -> Option<&DynSolValue> {
        self.args
            .iter()
            .find(|(arg_name, _)| arg_name == name)
            .map(|(_, value)| value)
    }
}

/// Decode a single log against each interface in turn
pub fn decode_log(log: &Log, interfaces: &InterfaceSet) -> Option<EventMatch> {
    for (index, decoder) in interfaces.iter().enumerate() {
        match decoder.parse_log(log) {
            Ok(decoded) => return Some(EventMatch::new(index, log.address, decoded)),
            Err(failure) => {
                tracing::trace!(
                    interface = decoder.name(),
                    address = %log.address,
                    %failure,
                    "Log not decoded by interface"
                );
            }
        }
    }
    None
}

/// Lazily decode `logs`, yielding only logs some interface understands
pub fn decode_logs<'a>(
    logs: &'a [Log],
    interfaces: &'a InterfaceSet,
) -> impl Iterator<Item = EventMatch> + 'a {
    logs.iter().filter_map(move |log| decode_log(log, interfaces))
}

/// All successfully decoded logs, in receipt order
pub fn parse_logs(logs: &[Log], interfaces: &InterfaceSet) -> Vec<EventMatch> {
    decode_logs(logs, interfaces).collect()
}

/// First decoded event named `event_name`
pub fn find_event(logs: &[Log], event_name: &str, interfaces: &InterfaceSet) -> Option<EventMatch> {
    decode_logs(logs, interfaces).find(|event| event.event_name == event_name)
}

/// First decoded event named `event_name` emitted by `address`
pub fn find_event_from(
    logs: &[Log],
    address: Address,
    event_name: &str,
    interfaces: &InterfaceSet,
) -> Option<EventMatch> {
    decode_logs(logs, interfaces)
        .find(|event| event.address == address && event.event_name == event_name)
}

/// Value of argument `arg_name` of the first `event_name` event, or
/// `default` when no log decodes to that event.
pub fn extract_event_value(
    logs: &[Log],
    event_name: &str,
    arg_name: &str,
    default: DynSolValue,
    interfaces: &InterfaceSet,
) -> DynSolValue {
    let Some(event) = find_event(logs, event_name, interfaces) else {
        tracing::debug!(event = event_name, "Event not found in receipt, using default");
        return default;
    };

    match event.arg(arg_name) {
        Some(value) => value.clone(),
        None => {
            tracing::warn!(
                event = event_name,
                arg = arg_name,
                "Event has no such argument, using default"
            );
            default
        }
    }
}

/// Like [`extract_event_value`] for a `uint` argument, wrapped as an amount
/// with `decimals`. Defaults to zero.
pub fn extract_event_amount(
    logs: &[Log],
    event_name: &str,
    arg_name: &str,
    decimals: u32,
    interfaces: &InterfaceSet,
) -> MonetaryAmount {
    let value = extract_event_value(
        logs,
        event_name,
        arg_name,
        DynSolValue::Uint(Default::default(), 256),
        interfaces,
    );

    match value.as_uint() {
        Some((raw, _)) => MonetaryAmount::from_u256(raw, decimals),
        None => {
            tracing::warn!(
                event = event_name,
                arg = arg_name,
                "Event argument is not an unsigned integer, using zero"
            );
            MonetaryAmount::zero(decimals)
        }
    }
}
