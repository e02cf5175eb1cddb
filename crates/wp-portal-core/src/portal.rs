use futures::future::abortable;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use wp_api_types::{Address, PortalConfig, Submission, TxHash, TxReceipt};
use wp_chain_client::{BlockTag, ChainError, Eip1193Provider, WavePortalContract};

use crate::feed::{FeedGuard, WaveFeed};
use crate::host::Host;
use crate::state::AppState;
use crate::status::{SubmissionStatus, SubmitFailure};
use crate::validate::{BLANK_INPUT_ALERT, validate_message};

pub const NO_WALLET_ALERT: &str = "Get MetaMask first!";

/// How a click on the share button ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    Blank,
    Invalid,
    Confirmed(TxHash),
    Cancelled(SubmitFailure),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("no wallet provider is available")]
    NoProvider,
    #[error("no wallet account is connected")]
    NotConnected,
    #[error("wallet is on chain {actual}, expected {expected}")]
    WrongNetwork { expected: u64, actual: u64 },
    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// The portal: one per page.
///
/// State lives behind a `RefCell` that is never held across an await, so the
/// flows may interleave freely on a single-threaded executor.
pub struct Portal<P, H> {
    config: PortalConfig,
    contract: Option<WavePortalContract<P>>,
    host: H,
    state: RefCell<AppState>,
    feed: RefCell<Option<FeedGuard>>,
}

impl<P, H> Portal<P, H>
where
    P: Eip1193Provider + 'static,
    H: Host + 'static,
{
    /// `provider` is `None` when no wallet is injected.
    pub fn new(config: PortalConfig, provider: Option<P>, host: H) -> Rc<Self> {
        let contract = provider
            .map(|provider| WavePortalContract::new(provider, config.contract_address.clone()));
        Rc::new(Self {
            config,
            contract,
            host,
            state: RefCell::default(),
            feed: RefCell::default(),
        })
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn has_provider(&self) -> bool {
        self.contract.is_some()
    }

    pub fn with<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn render(&self) {
        self.host.render(&self.state.borrow());
    }

    fn update<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let out = f(&mut self.state.borrow_mut());
        self.render();
        out
    }

    pub fn set_message(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|state| state.message = message);
    }

    /// Adopt an already-authorized account without prompting.
    pub async fn check_wallet(self: &Rc<Self>) {
        let Some(contract) = &self.contract else {
            debug!("no wallet provider injected");
            return;
        };

        match contract.client().accounts().await {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(account) => {
                    info!(%account, "found an authorized account");
                    self.adopt(account).await;
                }
                None => info!("no authorized account found"),
            },
            Err(err) => warn!(error = %err, "could not list wallet accounts"),
        }
    }

    /// Ask the wallet for authorization. A declined prompt leaves the session
    /// empty.
    pub async fn connect_wallet(self: &Rc<Self>) -> Option<Address> {
        let Some(contract) = &self.contract else {
            self.host.alert(NO_WALLET_ALERT);
            return None;
        };

        let account = match contract.client().request_accounts().await {
            Ok(accounts) => accounts.into_iter().next(),
            Err(err) => {
                warn!(error = %err, "wallet authorization failed");
                return None;
            }
        };
        let Some(account) = account else {
            info!("wallet authorized no accounts");
            return None;
        };

        info!(%account, "connected");
        self.adopt(account.clone()).await;
        Some(account)
    }

    async fn adopt(self: &Rc<Self>, account: Address) {
        self.update(|state| state.session = Some(account));
        if let Err(err) = self.refresh().await {
            warn!(error = %err, "could not load wave history");
        }
    }

    /// Recompute the field error for the current message. Returns whether
    /// the message is acceptable.
    pub fn verify_input(&self) -> bool {
        let error = self.with(|state| validate_message(&state.message));
        self.update(|state| state.validation_error = error.map(str::to_owned));
        error.is_none()
    }

    pub async fn share_link(&self) -> ShareOutcome {
        let message = self.with(|state| state.message.clone());
        if message.trim().is_empty() {
            self.host.alert(BLANK_INPUT_ALERT);
            return ShareOutcome::Blank;
        }
        if !self.verify_input() {
            return ShareOutcome::Invalid;
        }

        match self.submit(&message).await {
            Ok(hash) => ShareOutcome::Confirmed(hash),
            Err(failure) => ShareOutcome::Cancelled(failure),
        }
    }

    /// Send `wave(message)` and wait for it to be mined. Always ends with
    /// `loading` lowered and a terminal status.
    pub async fn submit(&self, message: &str) -> Result<TxHash, SubmitFailure> {
        let result = self.send_and_confirm(message).await;
        self.update(|state| {
            state.loading = false;
            match &result {
                Ok(hash) => {
                    state.status = SubmissionStatus::Confirmed(hash.clone());
                    state.message.clear();
                }
                Err(failure) => state.status = SubmissionStatus::Cancelled(failure.clone()),
            }
        });
        result
    }

    async fn send_and_confirm(&self, message: &str) -> Result<TxHash, SubmitFailure> {
        let contract = self.contract.as_ref().ok_or(SubmitFailure::NoProvider)?;
        let from = self
            .with(|state| state.session.clone())
            .ok_or(SubmitFailure::NotConnected)?;

        log_total_waves(contract).await;
        self.update(|state| {
            state.loading = true;
            state.status = SubmissionStatus::AwaitingConfirmation;
        });

        let hash = contract.wave(&from, message, self.config.gas_limit).await?;
        info!(tx = %hash, "mining");
        self.update(|state| state.status = SubmissionStatus::Pending(hash.clone()));

        let receipt = self.wait_for_receipt(contract, &hash).await?;
        if !receipt.succeeded() {
            warn!(tx = %hash, "transaction reverted");
            return Err(SubmitFailure::Reverted(hash));
        }

        info!(tx = %hash, block = ?receipt.block_number, "mined");
        log_total_waves(contract).await;
        Ok(hash)
    }

    async fn wait_for_receipt(
        &self,
        contract: &WavePortalContract<P>,
        hash: &TxHash,
    ) -> Result<TxReceipt, SubmitFailure> {
        let interval = Duration::from_millis(self.config.receipt_poll_interval_ms);
        loop {
            if let Some(receipt) = contract.client().transaction_receipt(hash).await? {
                return Ok(receipt);
            }
            self.host.sleep(interval).await;
        }
    }

    /// Load the full history and follow new waves from there.
    ///
    /// Any previous feed is released first. On the wrong network the list is
    /// left untouched and the network error is raised.
    pub async fn refresh(self: &Rc<Self>) -> Result<usize, ReadError> {
        self.release_feed();

        let contract = self.contract.as_ref().ok_or(ReadError::NoProvider)?;
        if !self.with(AppState::is_connected) {
            return Err(ReadError::NotConnected);
        }

        let chain_id = contract.client().chain_id().await?;
        if chain_id != self.config.chain_id {
            warn!(chain_id, expected = self.config.chain_id, "wallet is on the wrong network");
            let notice = self.config.network_error();
            self.update(|state| state.network_error = Some(notice));
            return Err(ReadError::WrongNetwork {
                expected: self.config.chain_id,
                actual: chain_id,
            });
        }

        let head = contract.client().block_number().await?;
        let history: Vec<Submission> = contract
            .all_waves(BlockTag::Number(head))
            .await?
            .into_iter()
            .map(Submission::from)
            .collect();
        let count = history.len();
        info!(count, head, "loaded wave history");

        self.update(|state| {
            state.submissions = history;
            state.network_error = None;
        });
        self.subscribe(head);
        Ok(count)
    }

    fn subscribe(self: &Rc<Self>, head: u64) {
        let (task, handle) = abortable(follow(Rc::downgrade(self), WaveFeed::after(head)));
        // Replacing the guard aborts whatever feed was running before.
        *self.feed.borrow_mut() = Some(FeedGuard::new(handle));
        self.host.spawn(Box::pin(async move {
            if task.await.is_err() {
                debug!("wave feed stopped");
            }
        }));
    }

    pub fn release_feed(&self) {
        if self.feed.borrow_mut().take().is_some() {
            debug!("released wave feed");
        }
    }

    pub fn is_following(&self) -> bool {
        self.feed.borrow().is_some()
    }

    /// One feed step. Returns how many waves were appended.
    pub async fn poll_feed(&self, feed: &mut WaveFeed) -> usize {
        let Some(contract) = &self.contract else {
            return 0;
        };

        match feed.poll(contract).await {
            Ok(waves) if waves.is_empty() => 0,
            Ok(waves) => {
                for wave in &waves {
                    info!(from = %wave.sender, timestamp_ms = wave.timestamp_ms, "NewWave");
                }
                let count = waves.len();
                self.update(|state| state.submissions.extend(waves));
                count
            }
            Err(err) => {
                warn!(error = %err, "wave feed poll failed");
                0
            }
        }
    }
}

async fn log_total_waves<P: Eip1193Provider>(contract: &WavePortalContract<P>) {
    match contract.total_waves(BlockTag::Latest).await {
        Ok(total) => info!(total, "retrieved total wave count"),
        Err(err) => debug!(error = %err, "could not read total wave count"),
    }
}

// Holds only a weak handle so a dropped portal ends the loop.
async fn follow<P, H>(portal: Weak<Portal<P, H>>, mut feed: WaveFeed)
where
    P: Eip1193Provider + 'static,
    H: Host + 'static,
{
    loop {
        let pause = match portal.upgrade() {
            Some(strong) => strong
                .host
                .sleep(Duration::from_millis(strong.config.feed_poll_interval_ms)),
            None => return,
        };
        pause.await;

        let Some(strong) = portal.upgrade() else {
            return;
        };
        strong.poll_feed(&mut feed).await;
    }
}
