//! Strategy selection.
//!
//! The strategy is picked once per benchmark session from the capability
//! descriptor, then reused for every round:
//!
//! ```text
//! Capabilities.accelerated  CPU really has it  Strategy
//! ────────────────────────  ─────────────────  ───────────
//! true                      yes                Accelerated
//! true                      no                 Scalar (warn)
//! false                     -                  Scalar
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use acubench_core::{Capabilities, Expirable, Outcome};

use crate::{accelerated, scalar};

/// Kernel path used for every multiply of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Scalar,
    Accelerated,
}

impl Strategy {
    /// Choose the fastest path `caps` allows.
    pub fn select(caps: &Capabilities) -> Self {
        if !caps.accelerated() {
            return Strategy::Scalar;
        }
        if accelerated::is_available() {
            Strategy::Accelerated
        } else {
            tracing::warn!(
                "capabilities report accelerated int8 support the CPU does not provide; using scalar path"
            );
            Strategy::Scalar
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Scalar => "scalar",
            Strategy::Accelerated => "accelerated",
        }
    }

    /// Run `out = a · b_tᵗ` on this path.
    pub fn multiply<E>(
        self,
        a: &[i8],
        b_t: &[i8],
        out: &mut [i32],
        n: usize,
        deadline: &E,
    ) -> Outcome
    where
        E: Expirable + ?Sized,
    {
        match self {
            Strategy::Scalar => scalar::multiply(a, b_t, out, n, deadline),
            Strategy::Accelerated => accelerated::multiply(a, b_t, out, n, deadline),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Multiply with the path `caps` selects.
///
/// Sessions running many rounds should call [`Strategy::select`] once and
/// reuse the result.
pub fn multiply<E>(
    a: &[i8],
    b_t: &[i8],
    out: &mut [i32],
    n: usize,
    deadline: &E,
    caps: &Capabilities,
) -> Outcome
where
    E: Expirable + ?Sized,
{
    Strategy::select(caps).multiply(a, b_t, out, n, deadline)
}
