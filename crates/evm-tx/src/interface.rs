//! Contract interfaces used to decode event logs
//!
//! A [`ContractInterface`] knows the events of one contract, given as
//! human-readable Solidity signatures. Decoding is fallible by nature: most
//! logs in a receipt belong to some other contract, so a [`DecodeFailure`]
//! is an ordinary outcome rather than an error to surface.

use std::fmt;
use std::sync::Arc;

use alloy::dyn_abi::{DynSolValue, EventExt};
use alloy::json_abi::Event;
use alloy::primitives::Log;
use thiserror::Error;

/// Why a log could not be decoded by one interface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeFailure {
    #[error("log has no topics")]
    NoTopics,

    #[error("no event with selector {selector} in {interface}")]
    UnknownSelector { interface: String, selector: String },

    #[error("failed to decode {event}: {message}")]
    Abi { event: String, message: String },
}

/// Invalid event signature given to [`ContractInterface::parse`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid event signature `{signature}`: {message}")]
pub struct InterfaceError {
    pub signature: String,
    pub message: String,
}

/// An event decoded by one interface
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLog {
    pub name: String,
    /// Arguments in declaration order
    pub args: Vec<(String, DynSolValue)>,
}

/// Something able to recognize and parse a contract's event logs
pub trait LogDecoder: Send + Sync {
    /// Human-readable name, used in traces
    fn name(&self) -> &str;

    fn parse_log(&self, log: &Log) -> Result<DecodedLog, DecodeFailure>;
}

/// Event definitions of a single contract
#[derive(Debug, Clone)]
pub struct ContractInterface {
    name: String,
    events: Vec<Event>,
}

impl ContractInterface {
    /// Build an interface from event signatures such as
    /// `"event Transfer(address indexed from, address indexed to, uint256 value)"`
    pub fn parse<'a>(
        name: impl Into<String>,
        signatures: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, InterfaceError> {
        let events = signatures
            .into_iter()
            .map(|signature| {
                Event::parse(signature).map_err(|e| InterfaceError {
                    signature: signature.to_string(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_events(name, events))
    }

    pub fn from_events(name: impl Into<String>, events: Vec<Event>) -> Self {
        Self {
            name: name.into(),
            events,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.name == name)
    }
}

impl LogDecoder for ContractInterface {
    fn name(&self) -> &str {
        &self.name
    }

    fn parse_log(&self, log: &Log) -> Result<DecodedLog, DecodeFailure> {
        let topic0 = log.data.topics().first().ok_or(DecodeFailure::NoTopics)?;

        let event = self
            .events
            .iter()
            .find(|event| !event.anonymous && event.selector() == *topic0)
            .ok_or_else(|| DecodeFailure::UnknownSelector {
                interface: self.name.clone(),
                selector: topic0.to_string(),
            })?;

        let abi_failure = |message: String| DecodeFailure::Abi {
            event: event.name.clone(),
            message,
        };

        let decoded = event
            .decode_log(&log.data)
            .map_err(|e| abi_failure(e.to_string()))?;

        // Indexed values come from topics, the rest from data; zip them back
        // with the parameter names in declaration order.
        let mut indexed = decoded.indexed.into_iter();
        let mut body = decoded.body.into_iter();
        let args = event
            .inputs
            .iter()
            .map(|param| {
                let value = if param.indexed {
                    indexed.next()
                } else {
                    body.next()
                };
                value.map(|value| (param.name.clone(), value))
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| abi_failure("argument count mismatch".to_string()))?;

        Ok(DecodedLog {
            name: event.name.clone(),
            args,
        })
    }
}

/// Ordered list of decoders to try against each log.
///
/// Order is a tie-break: a log whose selector matches several interfaces is
/// attributed to the first one that decodes it.
#[derive(Clone, Default)]
pub struct InterfaceSet {
    decoders: Vec<Arc<dyn LogDecoder>>,
}

impl InterfaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, decoder: impl LogDecoder + 'static) -> Self {
        self.push(decoder);
        self
    }

    pub fn push(&mut self, decoder: impl LogDecoder + 'static) {
        self.decoders.push(Arc::new(decoder));
    }

    pub fn push_shared(&mut self, decoder: Arc<dyn LogDecoder>) {
        self.decoders.push(decoder);
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn LogDecoder> {
        self.decoders.iter().map(|decoder| decoder.as_ref())
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl fmt::Debug for InterfaceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.decoders.iter().map(|decoder| decoder.name()))
            .finish()
    }
}

impl FromIterator<ContractInterface> for InterfaceSet {
    fn from_iter<I: IntoIterator<Item = ContractInterface>>(iter: I) -> Self {
        let mut set = Self::new();
        for interface in iter {
            set.push(interface);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use alloy::primitives::{Address, U256};

    #[test]
    fn test_parse_rejects_bad_signature() {
        let err = ContractInterface::parse("Broken", ["event Mint(address indexed"]).unwrap_err();
        assert_eq!(err.signature, "event Mint(address indexed");
    }

    #[test]
    fn test_decode_indexed_and_body_arguments() {
        let erc20 = erc20_interface();
        let from = Address::repeat_byte(0x01);
        let to = Address::repeat_byte(0x02);
        let log = transfer_log(Address::repeat_byte(0xaa), from, to, 500);

        let decoded = erc20.parse_log(&log).unwrap();
        assert_eq!(decoded.name, "Transfer");
        assert_eq!(
            decoded.args,
            vec![
                ("from".to_string(), DynSolValue::Address(from)),
                ("to".to_string(), DynSolValue::Address(to)),
                ("value".to_string(), DynSolValue::Uint(U256::from(500u64), 256)),
            ]
        );
    }

    #[test]
    fn test_decode_unknown_selector() {
        let erc20 = erc20_interface();
        let failure = erc20.parse_log(&unrelated_log()).unwrap_err();
        assert!(matches!(failure, DecodeFailure::UnknownSelector { .. }));
    }

    #[test]
    fn test_decode_without_topics() {
        let erc20 = erc20_interface();
        let log = Log::new_unchecked(Address::ZERO, vec![], Default::default());
        assert_eq!(erc20.parse_log(&log).unwrap_err(), DecodeFailure::NoTopics);
    }

    #[test]
    fn test_decode_layout_mismatch() {
        // Same selector as the indexed-amount Mint, but the amount is
        // expected in data, which is empty.
        let body_mint = body_mint_interface();
        let log = mint_log(Address::repeat_byte(0xbb), Address::repeat_byte(0x01), 42);
        assert!(matches!(
            body_mint.parse_log(&log),
            Err(DecodeFailure::Abi { .. })
        ));
    }

    #[test]
    fn test_interface_set_order() {
        let set: InterfaceSet = [gyro_lib_interface(), erc20_interface()]
            .into_iter()
            .collect();
        let names: Vec<&str> = set.iter().map(|decoder| decoder.name()).collect();
        assert_eq!(names, vec!["GyroLib", "ERC20"]);
        assert_eq!(format!("{set:?}"), r#"["GyroLib", "ERC20"]"#);
    }
}
