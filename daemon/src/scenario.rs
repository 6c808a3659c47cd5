//! The sink-factory walkthrough run by `blackhole demo`.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{ensure, Context};
use serde::Serialize;
use tracing::info;

use blackhole_crypto::{blake2b_256_multi, derive_address, keypair_from_seed};
use blackhole_token::Ed25519Recovery;
use blackhole_types::{Address, ChainId, Clock, KeyPair, NativeAmount, SystemClock, TokenAmount};
use blackhole_universe::{SinkTriggered, World};

use crate::config::DaemonConfig;

const ACCOUNT_SEED_TAG: &[u8] = b"blackhole/named-account";

/// Permits issued during the walkthrough stay valid for an hour.
const PERMIT_LIFETIME_SECS: u64 = 3_600;

/// Deterministic key pair for a configured account name.
pub fn account_keypair(name: &str) -> KeyPair {
    keypair_from_seed(&blake2b_256_multi(&[ACCOUNT_SEED_TAG, name.as_bytes()]))
}

pub fn account_address(name: &str) -> Address {
    derive_address(&account_keypair(name).public)
}

#[derive(Debug, Serialize)]
pub struct AccountReport {
    pub address: Address,
    pub native: NativeAmount,
    pub token: TokenAmount,
}

#[derive(Debug, Serialize)]
pub struct PermitReport {
    pub owner: Address,
    pub spender: Address,
    pub value: TokenAmount,
    pub nonce_after: u64,
    pub signature: String,
}

#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub chain_id: ChainId,
    pub token: Address,
    pub factory: Address,
    pub sink: SinkTriggered,
    pub total_supply: TokenAmount,
    pub destroyed: NativeAmount,
    pub permit: Option<PermitReport>,
    pub accounts: BTreeMap<String, AccountReport>,
}

/// Deploy a ledger and factory, hand ledger ownership to the factory and
/// send `value` from `sender` into it.
///
/// With a `spender`, the sender then signs a permit for its whole credit and
/// the spender pulls it with `transfer_from`.
pub fn run_demo(
    config: &DaemonConfig,
    sender: &str,
    value: NativeAmount,
    spender: Option<&str>,
) -> anyhow::Result<DemoReport> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut world = World::new(config.chain_id, clock);

    for account in &config.accounts {
        let amount = NativeAmount::from_whole(account.native_balance)
            .with_context(|| format!("native balance of `{}` is too large", account.name))?;
        world.fund(&account_address(&account.name), amount)?;
    }

    let deployer = account_address(&config.account(&config.deployer)?.name);
    let token = world.deploy_ledger(&deployer, config.token.clone());
    let factory = world.deploy_factory(&deployer, &token)?;
    world.ledger_mut(&token)?.transfer_ownership(&deployer, factory)?;
    info!(%token, %factory, "factory now owns the ledger");

    let sender_keys = account_keypair(&config.account(sender)?.name);
    let sender_address = derive_address(&sender_keys.public);
    let sink = world
        .send_value(&sender_address, &factory, value)?
        .context("factory send did not trigger a sink")?;
    let credit = world.token_balance(&token, &sender_address);
    ensure!(
        credit == TokenAmount::from(value),
        "credit {credit} does not match value {value}"
    );

    let permit = match spender {
        Some(name) => {
            let spender_address = account_address(&config.account(name)?.name);
            let deadline = world.now().plus_secs(PERMIT_LIFETIME_SECS);
            let digest = world
                .ledger(&token)
                .context("ledger disappeared")?
                .permit_digest(&sender_address, &spender_address, credit, deadline);
            let signature = Ed25519Recovery::sign(&digest, &sender_keys);
            world.permit(&token, &sender_address, &spender_address, credit, deadline, &signature)?;

            let ledger = world.ledger_mut(&token)?;
            ledger.transfer_from(&spender_address, &sender_address, &spender_address, credit)?;
            info!(owner = %sender_address, spender = %spender_address, %credit, "permit spent");
            Some(PermitReport {
                owner: sender_address,
                spender: spender_address,
                value: credit,
                nonce_after: ledger.nonces(&sender_address),
                signature: hex::encode(&signature),
            })
        }
        None => None,
    };

    let ledger = world.ledger(&token).context("ledger disappeared")?;
    let accounts = config
        .accounts
        .iter()
        .map(|account| {
            let address = account_address(&account.name);
            let report = AccountReport {
                address,
                native: world.native_balance(&address),
                token: ledger.balance_of(&address),
            };
            (account.name.clone(), report)
        })
        .collect();

    Ok(DemoReport {
        chain_id: world.chain_id(),
        token,
        factory,
        sink,
        total_supply: ledger.total_supply(),
        destroyed: world.bank().destroyed(),
        permit,
        accounts,
    })
}
