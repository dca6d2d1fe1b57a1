use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a label string does not name any variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed set of snake_case labels.
///
/// Parsing trims and lower-cases the input before matching, so `"Positive "`
/// and `"positive"` name the same variant.
macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(UnknownLabel {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_enum! {
    Sentiment as "sentiment" {
        Positive => "positive",
        Negative => "negative",
        Neutral => "neutral",
    }
}

label_enum! {
    /// Coarse urgency; `Medium` and `High` flag the conversation for a human agent.
    AlertLevel as "alert level" {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

label_enum! {
    RevenueRisk as "revenue risk" {
        Safe => "safe",
        AtRisk => "at_risk",
        HighRisk => "high_risk",
        Critical => "critical",
    }
}

label_enum! {
    CustomerValueTier as "customer value tier" {
        LowValue => "low_value",
        MediumValue => "medium_value",
        HighValue => "high_value",
        Vip => "vip",
    }
}

label_enum! {
    RetentionAction as "retention action" {
        None => "none",
        FollowUp => "follow_up",
        DiscountOffer => "discount_offer",
        ManagerCall => "manager_call",
        UrgentIntervention => "urgent_intervention",
    }
}

label_enum! {
    ResponseTime as "response time" {
        Immediate => "immediate",
        WithinOneHour => "within_1_hour",
        WithinDay => "within_24_hours",
    }
}

label_enum! {
    Likelihood as "likelihood" {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

label_enum! {
    /// WhatsApp Business conversation category. `Service` is free, `Utility`
    /// and `Marketing` are billed per conversation.
    ConversationCategory as "conversation category" {
        Service => "service",
        Utility => "utility",
        Marketing => "marketing",
        Authentication => "authentication",
    }
}

impl AlertLevel {
    pub fn requires_alert(&self) -> bool {
        matches!(self, AlertLevel::Medium | AlertLevel::High)
    }
}

impl CustomerValueTier {
    pub fn is_high_value(&self) -> bool {
        matches!(self, CustomerValueTier::HighValue | CustomerValueTier::Vip)
    }
}
