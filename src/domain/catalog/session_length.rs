//! Session length definitions.
//!
//! The three advisory session formats a mentor can sell.

use serde::{Deserialize, Serialize};

/// Advisory session length.
///
/// Determines session duration and which rate card entry prices it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionLength {
    /// Short format - a focused question-and-answer call.
    QuickChat,

    /// Standard format - a full advisory conversation.
    FullSession,

    /// Long format - an in-depth working session.
    DeepDive,
}

impl SessionLength {
    /// All session lengths, in ascending duration order.
    pub const ALL: [SessionLength; 3] = [
        SessionLength::QuickChat,
        SessionLength::FullSession,
        SessionLength::DeepDive,
    ];

    /// Returns the session duration in minutes.
    pub fn duration_minutes(&self) -> i32 {
        match self {
            SessionLength::QuickChat => 30,
            SessionLength::FullSession => 60,
            SessionLength::DeepDive => 90,
        }
    }

    /// Returns the stable product tag used in URLs and gateway metadata.
    pub fn product_id(&self) -> &'static str {
        match self {
            SessionLength::QuickChat => "quick-chat",
            SessionLength::FullSession => "full-session",
            SessionLength::DeepDive => "deep-dive",
        }
    }

    /// Parses a product tag back into a session length.
    pub fn from_product_id(tag: &str) -> Option<Self> {
        match tag {
            "quick-chat" => Some(SessionLength::QuickChat),
            "full-session" => Some(SessionLength::FullSession),
            "deep-dive" => Some(SessionLength::DeepDive),
            _ => None,
        }
    }

    /// Returns the display name for this session length.
    pub fn display_name(&self) -> &'static str {
        match self {
            SessionLength::QuickChat => "Quick Chat",
            SessionLength::FullSession => "Full Session",
            SessionLength::DeepDive => "Deep Dive",
        }
    }
}

impl std::fmt::Display for SessionLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.product_id())
    }
}
