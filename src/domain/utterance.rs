// ============================================================
// Layer 3 — Utterance and Role
// ============================================================
// A dialogue is an ordered list of turns that alternate
// between the user's prompt and the model's response:
//
//   index:  0        1          2        3
//   role:   Prompt   Response   Prompt   Response ...
//
// The role is stored explicitly on every turn instead of
// being recomputed from index parity later on. The encoder
// derives the loss mask from the role alone.
//
// Reference: Rust Book §6 (Enums and Pattern Matching)

use serde::{Deserialize, Serialize};

/// Who produced a turn of the dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User / instruction side — never contributes to the loss
    Prompt,
    /// Model side — its tokens and terminating eos are trained on
    Response,
}

impl Role {
    /// The role of the turn that follows this one
    pub fn next(self) -> Self {
        match self {
            Role::Prompt   => Role::Response,
            Role::Response => Role::Prompt,
        }
    }

    /// Target-mask value for every token of a turn with this role
    pub fn mask_value(self) -> u8 {
        match self {
            Role::Prompt   => 0,
            Role::Response => 1,
        }
    }
}

/// One turn of a dialogue with its role tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub role: Role,
    pub text: String,
}

impl Utterance {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self { role, text: text.into() }
    }
}

/// Tag a sequence of turn texts with alternating roles,
/// starting from `Prompt`.
///
/// If the number of turns is odd the last one is dropped, so the
/// result always ends on a `Response` (or is empty). A trailing
/// prompt has no answer to train on.
pub fn pair_turns<I, S>(turns: I) -> Vec<Utterance>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut role = Role::Prompt;
    let mut out: Vec<Utterance> = turns
        .into_iter()
        .map(|text| {
            let u = Utterance::new(role, text);
            role = role.next();
            u
        })
        .collect();

    if out.len() % 2 == 1 {
        out.pop();
    }
    out
}
