// Keystash — Item classes
//
// The closed set of item categories a secure store scopes its records by.
// Each class maps to exactly one native class constant and back.

use std::fmt;
use std::str::FromStr;

/// Category of a stored secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemClass {
    /// Generic password / opaque secret.
    Generic,
    Certificate,
    /// Cryptographic key material.
    CryptoKey,
    /// Certificate paired with its private key.
    Identity,
}

impl ItemClass {
    /// Every class, in the order `delete_all` walks them.
    pub const ALL: [ItemClass; 4] = [
        ItemClass::Generic,
        ItemClass::Certificate,
        ItemClass::CryptoKey,
        ItemClass::Identity,
    ];

    /// The native class constant the store indexes by.
    pub fn native(self) -> &'static str {
        match self {
            ItemClass::Generic => "genp",
            ItemClass::Certificate => "cert",
            ItemClass::CryptoKey => "keys",
            ItemClass::Identity => "idnt",
        }
    }

    /// Resolve a native class constant. Unknown constants yield `None`.
    pub fn from_native(constant: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.native() == constant)
    }

    /// Name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ItemClass::Generic => "generic",
            ItemClass::Certificate => "certificate",
            ItemClass::CryptoKey => "crypto-key",
            ItemClass::Identity => "identity",
        }
    }
}

impl fmt::Display for ItemClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.name() == s)
            .ok_or_else(|| {
                format!(
                    "unknown item class '{}' (expected generic, certificate, crypto-key or identity)",
                    s
                )
            })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
