//! Log fixtures shared by the unit tests

use alloy::primitives::{keccak256, Address, Bytes, Log, B256, U256};

use crate::interface::ContractInterface;

pub const MINT_EVENT: &str = "event Mint(address indexed minter, uint256 indexed amount)";
pub const TRANSFER_EVENT: &str =
    "event Transfer(address indexed from, address indexed to, uint256 value)";

pub fn gyro_lib_interface() -> ContractInterface {
    ContractInterface::parse(
        "GyroLib",
        [
            MINT_EVENT,
            "event Redeem(address indexed redeemer, uint256 indexed amount)",
        ],
    )
    .unwrap()
}

pub fn erc20_interface() -> ContractInterface {
    ContractInterface::parse(
        "ERC20",
        [
            TRANSFER_EVENT,
            "event Approval(address indexed owner, address indexed spender, uint256 value)",
        ],
    )
    .unwrap()
}

/// `Mint` with the same selector as [`MINT_EVENT`] but a non-indexed amount
pub fn body_mint_interface() -> ContractInterface {
    ContractInterface::parse("BodyMint", ["event Mint(address indexed minter, uint256 amount)"])
        .unwrap()
}

fn word(value: u64) -> B256 {
    B256::from(U256::from(value).to_be_bytes::<32>())
}

pub fn mint_log(emitter: Address, minter: Address, amount: u64) -> Log {
    Log::new_unchecked(
        emitter,
        vec![
            keccak256("Mint(address,uint256)"),
            minter.into_word(),
            word(amount),
        ],
        Bytes::new(),
    )
}

pub fn body_mint_log(emitter: Address, minter: Address, amount: u64) -> Log {
    Log::new_unchecked(
        emitter,
        vec![keccak256("Mint(address,uint256)"), minter.into_word()],
        Bytes::from(word(amount).to_vec()),
    )
}

pub fn redeem_log(emitter: Address, redeemer: Address, amount: u64) -> Log {
    Log::new_unchecked(
        emitter,
        vec![
            keccak256("Redeem(address,uint256)"),
            redeemer.into_word(),
            word(amount),
        ],
        Bytes::new(),
    )
}

pub fn transfer_log(emitter: Address, from: Address, to: Address, value: u64) -> Log {
    Log::new_unchecked(
        emitter,
        vec![
            keccak256("Transfer(address,address,uint256)"),
            from.into_word(),
            to.into_word(),
        ],
        Bytes::from(word(value).to_vec()),
    )
}

/// A log no test interface knows about
pub fn unrelated_log() -> Log {
    Log::new_unchecked(
        Address::repeat_byte(0xee),
        vec![keccak256("Sync(uint112,uint112)")],
        Bytes::from(vec![0u8; 64]),
    )
}
