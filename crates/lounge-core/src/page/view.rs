//! ============================================================================
//! Home View - rendered model of the lounge home page
//! ============================================================================
//! Built from controller state by `PageController::view`. Rendered either as
//! an HTML document or as terminal text (`Display`).
//! ============================================================================

use serde::Serialize;
use std::fmt;

pub const PAGE_TITLE: &str = "thirdweb membership gated content";
pub const PAGE_HEADING: &str = "Member Only Lounge";
pub const PAGE_INTRO: &str =
    "You need to own Membership NFT in order to get access to the lounge webpage.";
pub const MARKETPLACE_LABEL: &str = "View NFT on OpenSea";
pub const ENTER_LABEL: &str = "Attempt to Enter Private Lounge";
pub const ACCESS_DENIED: &str = "Access Denied";
pub const INVITE_TEXT: &str =
    "Only member can see this: heres the member only private discord invite link";

/// Token requirement shown under the heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub count: u64,
    pub token_id: String,
    pub contract: String,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You need to have at least {} of token id {} from NFT address {}",
            self.count, self.token_id, self.contract
        )
    }
}

/// Wallet box: connect action, or account plus lounge action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WalletPanel {
    Disconnected { connect_label: String },
    Connected { address: String, entering: bool },
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub title: String,
    pub heading: String,
    pub intro: String,
    pub requirement: Requirement,
    pub marketplace_url: String,
    pub wallet: WalletPanel,
    /// Present only for members
    pub invite_url: Option<String>,
    pub access_denied: bool,
    pub notices: Vec<String>,
}

impl HomeView {
    pub fn shows_invite(&self) -> bool {
        self.invite_url.is_some()
    }

    /// Standalone HTML document
    pub fn to_html(&self) -> String {
        let mut body = String::new();

        body.push_str(&format!("<h1>{}</h1>\n", escape(&self.heading)));
        body.push_str(&format!("<p>{}</p>\n", escape(&self.intro)));
        body.push_str(&format!(
            "<p>You need to have at least <b>{}</b> of token id <b>{}</b> from NFT address <b>{}</b></p>\n",
            self.requirement.count,
            escape(&self.requirement.token_id),
            escape(&self.requirement.contract)
        ));
        body.push_str(&format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>\n",
            escape(&self.marketplace_url),
            MARKETPLACE_LABEL
        ));

        match &self.wallet {
            WalletPanel::Disconnected { connect_label } => {
                body.push_str(&format!(
                    "<div class=\"wallet\"><button id=\"connect\">{}</button></div>\n",
                    escape(connect_label)
                ));
            }
            WalletPanel::Connected { address, entering } => {
                body.push_str(&format!(
                    "<div class=\"wallet\"><p>Wallet: {}</p>\n<p>Do you have access to the member only lounge? <button id=\"enter\"{}>{}</button></p></div>\n",
                    escape(address),
                    if *entering { " disabled" } else { "" },
                    ENTER_LABEL
                ));
            }
        }

        if let Some(invite) = &self.invite_url {
            body.push_str(&format!(
                "<p class=\"members\">{} <a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></p>\n",
                INVITE_TEXT,
                escape(invite),
                escape(invite)
            ));
        }

        for notice in &self.notices {
            body.push_str(&format!("<p class=\"notice\">{}</p>\n", escape(notice)));
        }

        if self.access_denied {
            body.push_str(&format!("<p class=\"denied\">{}</p>\n", ACCESS_DENIED));
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
            escape(&self.title),
            body
        )
    }
}

impl fmt::Display for HomeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.heading)?;
        writeln!(f, "{}", self.intro)?;
        writeln!(f)?;
        writeln!(f, "{}", self.requirement)?;
        writeln!(f, "{}: {}", MARKETPLACE_LABEL, self.marketplace_url)?;
        writeln!(f)?;

        match &self.wallet {
            WalletPanel::Disconnected { connect_label } => writeln!(f, "[ {} ]", connect_label)?,
            WalletPanel::Connected { address, entering } => {
                writeln!(f, "Wallet: {}", address)?;
                if *entering {
                    writeln!(f, "Entering the lounge...")?;
                } else {
                    writeln!(f, "Do you have access to the member only lounge? [ {} ]", ENTER_LABEL)?;
                }
            }
        }

        if let Some(invite) = &self.invite_url {
            writeln!(f)?;
            writeln!(f, "{} {}", INVITE_TEXT, invite)?;
        }

        for notice in &self.notices {
            writeln!(f, "! {}", notice)?;
        }

        if self.access_denied {
            writeln!(f)?;
            writeln!(f, "{}", ACCESS_DENIED)?;
        }
        Ok(())
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
