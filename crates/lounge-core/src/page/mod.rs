//! ============================================================================
//! Page Controller - the member lounge home page
//! ============================================================================
//! Owns the wallet session, the membership flag, the lounge-entry state and
//! the user-visible notices. All external work goes through the injected
//! collaborators:
//! - WalletConnector / MessageSigner: the wallet
//! - TokenBalanceReader: read-only NFT balance
//! - NonceSource: the site's access API
//! - Navigator: route changes
//!
//! Membership is an effect keyed on session identity: it re-runs when the
//! connected account changes, never on render.
//! ============================================================================

mod query;
mod view;

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::access::{
    MembershipOutcome, MembershipQuery, MembershipStatus, MembershipTracker, TokenBalanceReader,
};
use crate::config::LoungeConfig;
use crate::lounge::{EntryState, LoungeEntry, Navigator, NonceSource};
use crate::types::{ConnectError, LoungeError, Notice, NoticeKind, WalletSession};
use crate::wallet::{MessageSigner, WalletConnector};

pub use query::HomeQuery;
pub use view::{
    HomeView, Requirement, WalletPanel, ACCESS_DENIED, ENTER_LABEL, INVITE_TEXT,
    MARKETPLACE_LABEL, PAGE_HEADING, PAGE_INTRO, PAGE_TITLE,
};

/// Home page controller
pub struct PageController {
    config: LoungeConfig,
    connector: Arc<dyn WalletConnector>,
    signer: Arc<dyn MessageSigner>,
    balances: Arc<dyn TokenBalanceReader>,
    nonces: Arc<dyn NonceSource>,
    navigator: Arc<dyn Navigator>,
    session: Option<WalletSession>,
    membership: MembershipTracker,
    entry: LoungeEntry,
    notices: Vec<Notice>,
}

impl PageController {
    /// Create a controller; `wallet` serves both as connector and signer
    pub fn new<W>(
        config: LoungeConfig,
        wallet: Arc<W>,
        balances: Arc<dyn TokenBalanceReader>,
        nonces: Arc<dyn NonceSource>,
        navigator: Arc<dyn Navigator>,
    ) -> Self
    where
        W: WalletConnector + MessageSigner + 'static,
    {
        Self {
            config,
            connector: wallet.clone(),
            signer: wallet,
            balances,
            nonces,
            navigator,
            session: None,
            membership: MembershipTracker::new(),
            entry: LoungeEntry::new(),
            notices: Vec::new(),
        }
    }

    // ========================================================================
    // Wallet Connection
    // ========================================================================

    /// User clicked "Connect Wallet"
    pub async fn connect(&mut self) -> Result<(), ConnectError> {
        if let Some(session) = &self.session {
            debug!("Already connected as {}", session.address);
            return Ok(());
        }

        match self.connector.activate().await {
            Ok(session) => {
                self.clear_notice(NoticeKind::Connection);
                self.on_session_changed(Some(session)).await;
                Ok(())
            }
            Err(e) => {
                warn!("Wallet connection failed: {}", e);
                self.raise_notice(NoticeKind::Connection, e.to_string());
                Err(e)
            }
        }
    }

    /// User disconnected the wallet
    pub async fn disconnect(&mut self) {
        self.connector.deactivate().await;
        self.on_session_changed(None).await;
        info!("Wallet disconnected");
    }

    /// Session changed (connect, disconnect or an account/chain switch reported
    /// by the wallet). A session on any chain but the configured one is dropped
    /// with a connection notice. Re-runs the membership effect only when the
    /// account changed.
    pub async fn on_session_changed(&mut self, session: Option<WalletSession>) {
        let session = match session {
            Some(s) if s.chain_id != self.config.chain_id => {
                let err = ConnectError::UnsupportedChain {
                    expected: self.config.chain_id,
                    actual: s.chain_id,
                };
                warn!("Dropping wallet session for {}: {}", s.address, err);
                self.raise_notice(NoticeKind::Connection, err.to_string());
                None
            }
            other => other,
        };

        let same_account = match (&self.session, &session) {
            (Some(old), Some(new)) => old.address == new.address,
            (None, None) => true,
            _ => false,
        };
        self.session = session;

        if same_account {
            return;
        }

        if self.session.is_none() {
            self.membership.reset();
            self.clear_notice(NoticeKind::Membership);
            return;
        }

        self.refresh_membership().await;
    }

    // ========================================================================
    // Membership
    // ========================================================================

    /// Start a membership query for the current session. Without a session
    /// the flag is reset and no query is issued.
    pub fn begin_membership_check(&mut self) -> Option<MembershipQuery> {
        let Some(session) = &self.session else {
            self.membership.reset();
            return None;
        };

        let tag = self.membership.begin(&session.address);
        Some(MembershipQuery::new(
            tag,
            self.balances.clone(),
            self.config.contract_address.clone(),
            session.address.clone(),
            self.config.token_id.clone(),
        ))
    }

    /// Apply a finished query. Stale results are dropped and return false.
    pub fn apply_membership_result(&mut self, outcome: MembershipOutcome) -> bool {
        if !self.membership.complete(&outcome, self.config.required_count) {
            return false;
        }

        match &outcome.result {
            Ok(_) => self.clear_notice(NoticeKind::Membership),
            Err(e) => self.raise_notice(
                NoticeKind::Membership,
                format!("Could not check membership: {}", e),
            ),
        }
        true
    }

    /// Run a membership check to completion
    pub async fn refresh_membership(&mut self) {
        if let Some(query) = self.begin_membership_check() {
            let outcome = query.run().await;
            self.apply_membership_result(outcome);
        }
    }

    // ========================================================================
    // Lounge Entry
    // ========================================================================

    /// User clicked "Attempt to Enter Private Lounge".
    /// Returns the navigation target on success.
    pub async fn enter_lounge(&mut self) -> Result<String, LoungeError> {
        let result = self
            .entry
            .enter(
                self.session.as_ref(),
                self.nonces.as_ref(),
                self.signer.as_ref(),
                self.navigator.as_ref(),
            )
            .await;

        match &result {
            Ok(_) => self.clear_notice(NoticeKind::LoungeEntry),
            Err(e) => self.raise_notice(NoticeKind::LoungeEntry, e.to_string()),
        }
        result
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn config(&self) -> &LoungeConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&WalletSession> {
        self.session.as_ref()
    }

    /// Display-only membership flag
    pub fn is_member(&self) -> bool {
        self.membership.is_member()
    }

    pub fn membership_status(&self) -> MembershipStatus {
        self.membership.status()
    }

    pub fn entry_state(&self) -> EntryState {
        self.entry.state()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn notice(&self, kind: NoticeKind) -> Option<&Notice> {
        self.notices.iter().find(|n| n.kind == kind)
    }

    /// Dismiss every notice
    pub fn clear_notices(&mut self) {
        self.notices.clear();
    }

    fn raise_notice(&mut self, kind: NoticeKind, message: String) {
        self.clear_notice(kind);
        self.notices.push(Notice::new(kind, message));
    }

    fn clear_notice(&mut self, kind: NoticeKind) {
        self.notices.retain(|n| n.kind != kind);
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render the home page for the given route query
    pub fn view(&self, query: &HomeQuery) -> HomeView {
        let wallet = match &self.session {
            Some(session) => WalletPanel::Connected {
                address: session.address.to_string(),
                entering: self.entry.is_pending(),
            },
            None => WalletPanel::Disconnected {
                connect_label: format!("Connect Wallet ({} only)", self.config.chain_name),
            },
        };

        HomeView {
            title: PAGE_TITLE.to_string(),
            heading: PAGE_HEADING.to_string(),
            intro: PAGE_INTRO.to_string(),
            requirement: Requirement {
                count: self.config.required_count,
                token_id: self.config.token_id.clone(),
                contract: self.config.contract_address.to_string(),
            },
            marketplace_url: self.config.marketplace_url.clone(),
            wallet,
            invite_url: self
                .is_member()
                .then(|| self.config.invite_url.clone()),
            access_denied: query.denied,
            notices: self.notices.iter().map(|n| n.message.clone()).collect(),
        }
    }
}
