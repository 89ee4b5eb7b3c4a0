//! Gyro protocol client
//!
//! Orchestrates calls against the deployed contracts: approvals and
//! mint/redeem submissions, estimates and read-only getters.

use alloy::primitives::{Address, TxHash, B256, U256};
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::Filter;
use alloy::sol_types::SolEvent;
use evm_node_client::{AlloyPendingTransaction, NodeClient};
use evm_tx::{find_event_from, PendingTransaction, TxReceipt};
use futures::future::{try_join, try_join3, try_join_all};
use gyro_core::constants::{approve_future_amount, DECIMALS};
use gyro_core::{
    AppConfig, ContractAddresses, Error, GasConfig, MonetaryAmount, Network, ProtocolError,
    Reserve, Result, Token, TokenRef, TokenWithAmount,
};

use crate::constants::{deployment, KOVAN_DS_PROXY_REGISTRY};
use crate::contracts::{
    BPool, DSProxyRegistry, GyroFundV1, GyroInterfaces, GyroLib, GyroPriceOracle, MetaFaucet,
    ERC20,
};
use crate::responses::{MintTransactionResponse, RedeemTransactionResponse};

/// Main entrypoint to the Gyro protocol
#[derive(Debug, Clone)]
pub struct Gyro {
    client: NodeClient,
    network: Network,
    contracts: ContractAddresses,
    account: Address,
    gas: GasConfig,
    fund: Address,
    lib: Address,
    interfaces: GyroInterfaces,
}

impl Gyro {
    /// Resolve the deployment for the node's chain and bind to `account`,
    /// defaulting to the signer or the node's first account.
    pub async fn create(
        client: NodeClient,
        config: &AppConfig,
        account: Option<Address>,
    ) -> Result<Self> {
        let chain_id = client.chain_id().await?;
        let network = Network::from_chain_id(chain_id)?;

        let account = match account {
            Some(account) => account,
            None => client
                .default_account()
                .await?
                .ok_or_else(|| ProtocolError::InvalidInput {
                    message: "no account available: configure a private key or an account"
                        .to_string(),
                })?,
        };

        let contracts = config.deployments.for_network(network).clone();
        let gyro = Self::new(client, network, contracts, account, config.gas)?;

        tracing::info!(
            %network,
            chain_id,
            account = %gyro.account,
            fund = %gyro.fund,
            lib = %gyro.lib,
            "Gyro client ready"
        );
        Ok(gyro)
    }

    /// Build a client from an already resolved deployment
    pub fn new(
        client: NodeClient,
        network: Network,
        contracts: ContractAddresses,
        account: Address,
        gas: GasConfig,
    ) -> Result<Self> {
        let fund = require_contract(&contracts, deployment::GYRO_PROXY)?;
        let lib = require_contract(&contracts, deployment::GYRO_LIB)?;
        let interfaces =
            GyroInterfaces::load().map_err(|e| Error::Serialization(e.to_string()))?;

        Ok(Self {
            client,
            network,
            contracts,
            account,
            gas,
            fund,
            lib,
            interfaces,
        })
    }

    pub fn address(&self) -> Address {
        self.account
    }

    /// Address of the fund contract, which is also the Gyro token
    pub fn fund_address(&self) -> Address {
        self.fund
    }

    pub fn lib_address(&self) -> Address {
        self.lib
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn contract_addresses(&self) -> &ContractAddresses {
        &self.contracts
    }

    pub fn node(&self) -> &NodeClient {
        &self.client
    }

    /// Act as another account for subsequent calls
    pub fn change_account(&mut self, address: Address) {
        tracing::debug!(from = %self.account, to = %address, "Changing account");
        self.account = address;
    }

    fn provider(&self) -> DynProvider {
        self.client.provider().clone()
    }

    fn fund(&self) -> GyroFundV1::GyroFundV1Instance<DynProvider> {
        GyroFundV1::new(self.fund, self.provider())
    }

    fn gyro_lib(&self) -> GyroLib::GyroLibInstance<DynProvider> {
        GyroLib::new(self.lib, self.provider())
    }

    fn erc20(&self, token: Address) -> ERC20::ERC20Instance<DynProvider> {
        ERC20::new(token, self.provider())
    }

    fn contract(&self, name: &str) -> Result<Address> {
        Ok(require_contract(&self.contracts, name)?)
    }

    fn pending(&self, tx_hash: TxHash) -> Box<dyn PendingTransaction> {
        Box::new(self.client.pending(tx_hash))
    }

    /// Mint at least `min_minted` Gyro (zero by default) from `inputs`.
    ///
    /// Inputs whose allowance is too low are approved first. With
    /// `approve_future` the approval is large enough for future mints,
    /// otherwise it covers exactly the input amount.
    pub async fn mint(
        &self,
        inputs: &[TokenWithAmount],
        min_minted: Option<MonetaryAmount>,
        approve_future: bool,
    ) -> Result<MintTransactionResponse> {
        let approve_txs = self.approve_tokens_for_lib(inputs, approve_future).await?;
        let (tokens_in, amounts_in) = split_inputs(inputs)?;
        let min_minted = min_minted
            .map(|amount| amount.to_u256())
            .transpose()?
            .unwrap_or(U256::ZERO);

        let lib = self.gyro_lib();
        let call = lib
            .mintFromUnderlyingTokens(tokens_in, amounts_in, min_minted)
            .from(self.account)
            .gas(self.gas.limit)
            .gas_price(self.gas.price);
        let tx = self.client.request(call.send()).await?;
        let tx_hash = *tx.tx_hash();

        tracing::debug!(
            %tx_hash,
            inputs = inputs.len(),
            approvals = approve_txs.len(),
            %min_minted,
            "Submitted mint"
        );

        Ok(MintTransactionResponse::new(
            self.pending(tx_hash),
            approve_txs,
            self.interfaces.mint.clone(),
        ))
    }

    /// Redeem at most `max_redeemed` Gyro (zero by default) into `outputs`
    pub async fn redeem(
        &self,
        outputs: &[TokenWithAmount],
        max_redeemed: Option<MonetaryAmount>,
        approve_future: bool,
    ) -> Result<RedeemTransactionResponse> {
        let max_redeemed = max_redeemed
            .map(|amount| amount.to_u256())
            .transpose()?
            .unwrap_or(U256::ZERO);

        let fund = self.fund();
        let approved = self
            .client
            .request(fund.allowance(self.account, self.lib).call())
            .await?;

        let approve_tx = if needs_approval(approved, max_redeemed) {
            let amount = approval_amount(max_redeemed, approve_future);
            let call = fund.approve(self.lib, amount).from(self.account);
            let tx = self.client.request(call.send()).await?;
            tracing::debug!(tx_hash = %tx.tx_hash(), %amount, "Submitted Gyro approval");
            Some(self.pending(*tx.tx_hash()))
        } else {
            None
        };

        let (tokens_out, amounts_out) = split_inputs(outputs)?;
        let lib = self.gyro_lib();
        let call = lib
            .redeemToUnderlyingTokens(tokens_out, amounts_out, max_redeemed)
            .from(self.account)
            .gas(self.gas.limit)
            .gas_price(self.gas.price);
        let tx = self.client.request(call.send()).await?;
        let tx_hash = *tx.tx_hash();

        tracing::debug!(%tx_hash, outputs = outputs.len(), %max_redeemed, "Submitted redeem");

        Ok(RedeemTransactionResponse::new(
            self.pending(tx_hash),
            approve_tx,
            self.interfaces.redeem.clone(),
        ))
    }

    /// Expected amount of Gyro minted for `inputs`
    pub async fn estimate_minted(&self, inputs: &[TokenWithAmount]) -> Result<MonetaryAmount> {
        let (tokens_in, amounts_in) = split_inputs(inputs)?;
        let lib = self.gyro_lib();
        let amount = self
            .client
            .request(lib.estimateMintedGyro(tokens_in, amounts_in).call())
            .await?;
        Ok(MonetaryAmount::from_u256(amount, DECIMALS))
    }

    /// Expected amount of Gyro redeemed for `outputs`
    pub async fn estimate_redeemed(&self, outputs: &[TokenWithAmount]) -> Result<MonetaryAmount> {
        let (tokens_out, amounts_out) = split_inputs(outputs)?;
        let lib = self.gyro_lib();
        let amount = self
            .client
            .request(lib.estimateRedeemedGyro(tokens_out, amounts_out).call())
            .await?;
        Ok(MonetaryAmount::from_u256(amount, DECIMALS))
    }

    /// Gyro balance of the current account
    pub async fn balance(&self) -> Result<MonetaryAmount> {
        let fund = self.fund();
        let balance = self
            .client
            .request(fund.balanceOf(self.account).call())
            .await?;
        Ok(MonetaryAmount::from_u256(balance, DECIMALS))
    }

    /// Total supply of Gyro in circulation
    pub async fn total_supply(&self) -> Result<MonetaryAmount> {
        let fund = self.fund();
        let supply = self.client.request(fund.totalSupply().call()).await?;
        Ok(MonetaryAmount::from_u256(supply, DECIMALS))
    }

    /// Balance of `token` held by `owner` (the current account by default).
    /// Decimals are read from the token unless already known.
    pub async fn token_balance(
        &self,
        token: impl Into<TokenRef>,
        owner: Option<Address>,
    ) -> Result<MonetaryAmount> {
        let token = token.into();
        let owner = owner.unwrap_or(self.account);
        let contract = self.erc20(token.address());

        let decimals = match &token {
            TokenRef::Token(token) => token.decimals,
            TokenRef::Address(_) => self.client.request(contract.decimals().call()).await?,
        };
        let balance = self
            .client
            .request(contract.balanceOf(owner).call())
            .await?;
        Ok(MonetaryAmount::from_u256(balance, u32::from(decimals)))
    }

    pub async fn supported_tokens_addresses(&self) -> Result<Vec<Address>> {
        let lib = self.gyro_lib();
        Ok(self.client.request(lib.getSupportedTokens().call()).await?)
    }

    /// Supported tokens with their metadata, fetched concurrently
    pub async fn supported_tokens(&self) -> Result<Vec<Token>> {
        let addresses = self.supported_tokens_addresses().await?;

        let tokens = try_join_all(addresses.into_iter().map(|address| async move {
            let contract = self.erc20(address);
            let (name, symbol, decimals) = try_join3(
                self.client.request(contract.name().call()),
                self.client.request(contract.symbol().call()),
                self.client.request(contract.decimals().call()),
            )
            .await?;
            Ok::<_, Error>(Token {
                address,
                name,
                symbol,
                decimals,
            })
        }))
        .await?;

        Ok(tokens)
    }

    /// Value held in each reserve pool, with the pool's tokens
    pub async fn reserve_values(&self) -> Result<Vec<Reserve>> {
        let lib = self.gyro_lib();
        let values = self.client.request(lib.getReserveValues().call()).await?;
        let error_code = values.errorCode;

        let reserves = try_join_all(values.addresses.into_iter().zip(values.amounts).map(
            |(address, amount)| async move {
                let pool = BPool::new(address, self.provider());
                let tokens = self.client.request(pool.getFinalTokens().call()).await?;
                let token_symbols = try_join_all(tokens.iter().map(|token| async move {
                    let contract = self.erc20(*token);
                    self.client.request(contract.symbol().call()).await
                }))
                .await?;

                Ok::<_, Error>(Reserve {
                    error_code,
                    address,
                    amount: MonetaryAmount::from_u256(amount, DECIMALS),
                    tokens,
                    token_symbols,
                })
            },
        ))
        .await?;

        Ok(reserves)
    }

    /// Ask the test faucet for underlying tokens
    pub async fn meta_mint_underlying(&self) -> Result<AlloyPendingTransaction> {
        let faucet = MetaFaucet::new(self.contract(deployment::META_FAUCET)?, self.provider());
        let call = faucet.mint().from(self.account);
        let tx = self.client.request(call.send()).await?;
        tracing::debug!(tx_hash = %tx.tx_hash(), "Submitted faucet mint");
        Ok(self.client.pending(*tx.tx_hash()))
    }

    /// DSProxy of the current account, used for Balancer interactions
    pub async fn balancer_proxy_address(&self) -> Result<Address> {
        let registry = DSProxyRegistry::new(KOVAN_DS_PROXY_REGISTRY, self.provider());
        Ok(self
            .client
            .request(registry.proxies(self.account).call())
            .await?)
    }

    pub async fn has_provided_gyd_to_samm(&self) -> Result<bool> {
        let proxy = self.balancer_proxy_address().await?;
        let filter = Filter::new()
            .address(self.contract(deployment::GYD_USDC_POOL)?)
            .event_signature(BPool::LOG_JOIN::SIGNATURE_HASH)
            .topic1(proxy.into_word())
            .topic2(self.fund.into_word());
        self.has_logs(filter).await
    }

    pub async fn has_swapped_from_gyd_in_samm(&self) -> Result<bool> {
        let proxy = self.balancer_proxy_address().await?;
        let filter = Filter::new()
            .address(self.contract(deployment::GYD_USDC_POOL)?)
            .event_signature(BPool::LOG_SWAP::SIGNATURE_HASH)
            .topic1(proxy.into_word())
            .topic2(self.fund.into_word());
        self.has_logs(filter).await
    }

    pub async fn has_swapped_to_gyd_in_samm(&self) -> Result<bool> {
        let proxy = self.balancer_proxy_address().await?;
        let filter = Filter::new()
            .address(self.contract(deployment::GYD_USDC_POOL)?)
            .event_signature(BPool::LOG_SWAP::SIGNATURE_HASH)
            .topic1(proxy.into_word())
            .topic3(self.fund.into_word());
        self.has_logs(filter).await
    }

    pub async fn has_minted_gyro(&self) -> Result<bool> {
        let filter = Filter::new()
            .address(self.lib)
            .event_signature(GyroLib::Mint::SIGNATURE_HASH)
            .topic1(self.account.into_word());
        self.has_logs(filter).await
    }

    pub async fn has_redeemed_gyro(&self) -> Result<bool> {
        let filter = Filter::new()
            .address(self.lib)
            .event_signature(GyroLib::Redeem::SIGNATURE_HASH)
            .topic1(self.account.into_word());
        self.has_logs(filter).await
    }

    async fn has_logs(&self, filter: Filter) -> Result<bool> {
        let filter = filter.from_block(0u64);
        let logs = self
            .client
            .request(self.client.provider().get_logs(&filter))
            .await?;
        tracing::trace!(matches = logs.len(), "Queried logs");
        Ok(!logs.is_empty())
    }

    /// Record the user's arbitrage transactions with the price oracle
    pub async fn set_user_transactions(
        &self,
        first_tx: B256,
        second_tx: B256,
    ) -> Result<AlloyPendingTransaction> {
        let oracle = GyroPriceOracle::new(
            self.contract(deployment::GYRO_PRICE_ORACLE)?,
            self.provider(),
        );
        let call = oracle.setTransactions(first_tx, second_tx).from(self.account);
        let tx = self.client.request(call.send()).await?;
        tracing::debug!(tx_hash = %tx.tx_hash(), %first_tx, %second_tx, "Submitted user transactions");
        Ok(self.client.pending(*tx.tx_hash()))
    }

    /// USDC transferred in the first transaction of a receipt, zero if none
    pub fn usdc_value(&self, receipt: &TxReceipt) -> Result<U256> {
        let usdc = self.contract(deployment::USDC_TOKEN)?;
        Ok(usdc_transfer_value(receipt, usdc, &self.interfaces))
    }

    /// Whether the second transaction moved more USDC than the first, which
    /// moved some. Unknown transactions verify as `false`.
    pub async fn verify_arbitrage(&self, first_tx: TxHash, second_tx: TxHash) -> Result<bool> {
        let (first, second) = try_join(
            self.client.get_receipt(first_tx),
            self.client.get_receipt(second_tx),
        )
        .await?;

        let (Some(first), Some(second)) = (first, second) else {
            tracing::debug!(%first_tx, %second_tx, "Arbitrage receipts not found");
            return Ok(false);
        };

        let usdc_in = self.usdc_value(&first)?;
        let usdc_out = self.usdc_value(&second)?;
        tracing::debug!(%usdc_in, %usdc_out, "Arbitrage USDC values");
        Ok(is_profitable_arbitrage(usdc_in, usdc_out))
    }

    /// Approve the library for every input whose allowance is too low.
    /// Allowances are read concurrently, approvals submitted in input order.
    async fn approve_tokens_for_lib(
        &self,
        inputs: &[TokenWithAmount],
        approve_future: bool,
    ) -> Result<Vec<Box<dyn PendingTransaction>>> {
        let (account, lib) = (self.account, self.lib);
        let ercs: Vec<_> = inputs.iter().map(|input| self.erc20(input.token)).collect();

        let allowances = try_join_all(ercs.iter().map(|erc| async move {
            self.client.request(erc.allowance(account, lib).call()).await
        }))
        .await?;

        let mut approve_txs = Vec::new();
        for ((erc, input), allowance) in ercs.iter().zip(inputs).zip(allowances) {
            let amount = input.amount.to_u256()?;
            if !needs_approval(allowance, amount) {
                continue;
            }

            let approve_amount = approval_amount(amount, approve_future);
            let call = erc
                .approve(lib, approve_amount)
                .from(account)
                .gas_price(self.gas.price);
            let tx = self.client.request(call.send()).await?;
            tracing::debug!(
                token = %erc.address(),
                tx_hash = %tx.tx_hash(),
                %allowance,
                %approve_amount,
                "Submitted approval"
            );
            approve_txs.push(self.pending(*tx.tx_hash()));
        }

        Ok(approve_txs)
    }
}

fn require_contract(
    contracts: &ContractAddresses,
    name: &str,
) -> std::result::Result<Address, ProtocolError> {
    contracts
        .get(name)
        .copied()
        .ok_or_else(|| ProtocolError::MissingContract {
            name: name.to_string(),
        })
}

/// Token addresses and raw ABI amounts, in input order
fn split_inputs(inputs: &[TokenWithAmount]) -> Result<(Vec<Address>, Vec<U256>)> {
    let tokens = inputs.iter().map(|input| input.token).collect();
    let amounts = inputs
        .iter()
        .map(|input| input.amount.to_u256())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((tokens, amounts))
}

/// An approval is needed when the current allowance is below the amount
pub fn needs_approval(allowance: U256, amount: U256) -> bool {
    allowance < amount
}

/// Allowance to grant: `10^50` for future operations, else exactly `amount`
pub fn approval_amount(amount: U256, approve_future: bool) -> U256 {
    if approve_future {
        approve_future_amount()
    } else {
        amount
    }
}

pub fn is_profitable_arbitrage(usdc_in: U256, usdc_out: U256) -> bool {
    usdc_in > U256::ZERO && usdc_out > usdc_in
}

fn usdc_transfer_value(receipt: &TxReceipt, usdc: Address, interfaces: &GyroInterfaces) -> U256 {
    find_event_from(receipt.logs(), usdc, "Transfer", &interfaces.usdc)
        .and_then(|event| event.arg("value").and_then(|value| value.as_uint()))
        .map(|(value, _)| value)
        .unwrap_or(U256::ZERO)
}
