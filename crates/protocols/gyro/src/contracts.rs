//! Gyro contract bindings
//!
//! Typed bindings are used for calls and log filters. Receipt decoding goes
//! through [`ContractInterface`]s built from the same event signatures, so
//! that logs can be tried against several contracts in a fixed order.

use alloy::sol;
use evm_tx::{ContractInterface, InterfaceError, InterfaceSet};

sol! {
    #[sol(rpc)]
    contract GyroLib {
        event Mint(address indexed minter, uint256 indexed amount);
        event Redeem(address indexed redeemer, uint256 indexed amount);

        function mintFromUnderlyingTokens(address[] memory tokensIn, uint256[] memory amountsIn, uint256 minAmountOut) external returns (uint256);
        function redeemToUnderlyingTokens(address[] memory tokensOut, uint256[] memory amountsOut, uint256 maxAmountIn) external returns (uint256);
        function estimateMintedGyro(address[] memory tokensIn, uint256[] memory amountsIn) external view returns (uint256);
        function estimateRedeemedGyro(address[] memory tokensOut, uint256[] memory amountsOut) external view returns (uint256);
        function getSupportedTokens() external view returns (address[] memory);
        function getReserveValues() external view returns (uint64 errorCode, address[] memory addresses, uint256[] memory amounts);
    }
}

sol! {
    #[sol(rpc)]
    contract GyroFundV1 {
        event Mint(address minter, uint256 indexed amount);
        event Redeem(address redeemer, uint256 indexed amount);
        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);

        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

sol! {
    #[sol(rpc)]
    contract ERC20 {
        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);

        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

sol! {
    #[sol(rpc)]
    contract BPool {
        event LOG_SWAP(address indexed caller, address indexed tokenIn, address indexed tokenOut, uint256 tokenAmountIn, uint256 tokenAmountOut);
        event LOG_JOIN(address indexed caller, address indexed tokenIn, uint256 tokenAmountIn);

        function getFinalTokens() external view returns (address[] memory);
    }
}

sol! {
    #[sol(rpc)]
    contract MetaFaucet {
        function mint() external returns (bool);
    }
}

sol! {
    #[sol(rpc)]
    contract GyroPriceOracle {
        function setTransactions(bytes32 firstTx, bytes32 secondTx) external;
    }
}

sol! {
    #[sol(rpc)]
    contract DSProxyRegistry {
        function proxies(address owner) external view returns (address);
    }
}

/// Event signatures of the library contract
pub const GYRO_LIB_EVENTS: [&str; 2] = [
    "event Mint(address indexed minter, uint256 indexed amount)",
    "event Redeem(address indexed redeemer, uint256 indexed amount)",
];

/// Event signatures of the fund contract, which is also the Gyro ERC20
pub const GYRO_FUND_EVENTS: [&str; 4] = [
    "event Mint(address minter, uint256 indexed amount)",
    "event Redeem(address redeemer, uint256 indexed amount)",
    "event Transfer(address indexed from, address indexed to, uint256 value)",
    "event Approval(address indexed owner, address indexed spender, uint256 value)",
];

pub fn gyro_lib_interface() -> Result<ContractInterface, InterfaceError> {
    ContractInterface::parse("GyroLib", GYRO_LIB_EVENTS)
}

pub fn gyro_fund_interface() -> Result<ContractInterface, InterfaceError> {
    ContractInterface::parse("GyroFundV1", GYRO_FUND_EVENTS)
}

/// Decoders for extracting receipt amounts, in tie-break order
#[derive(Debug, Clone)]
pub struct GyroInterfaces {
    pub mint: InterfaceSet,
    pub redeem: InterfaceSet,
    /// Decodes the USDC `Transfer` logs inspected by arbitrage verification
    pub usdc: InterfaceSet,
}

impl GyroInterfaces {
    pub fn load() -> Result<Self, InterfaceError> {
        let lib = gyro_lib_interface()?;
        let fund = gyro_fund_interface()?;

        let library_first = InterfaceSet::new().with(lib).with(fund.clone());
        Ok(Self {
            mint: library_first.clone(),
            redeem: library_first,
            usdc: InterfaceSet::new().with(fund),
        })
    }
}
