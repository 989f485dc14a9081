// Keystash — Attribute schema
//
// Which attributes each item class accepts. Anything outside a class's set
// is rejected with `NO_SUCH_ATTR`.

use crate::item::{attr, ItemClass};

const COMMON: &[&str] = &[
    attr::CLASS,
    attr::ACCOUNT,
    attr::LABEL,
    attr::DESCRIPTION,
    attr::ACCESS_GROUP,
    attr::CREATION_DATE,
    attr::MODIFICATION_DATE,
    attr::VALUE_DATA,
    attr::RETURN_ATTRIBUTES,
    attr::RETURN_DATA,
];

const GENERIC: &[&str] = &[attr::SERVICE, attr::GENERIC];

const CERTIFICATE: &[&str] = &[attr::CERTIFICATE_TYPE, attr::ISSUER, attr::SERIAL_NUMBER];

const CRYPTO_KEY: &[&str] = &[
    attr::KEY_CLASS,
    attr::APPLICATION_LABEL,
    attr::KEY_TYPE,
    attr::KEY_SIZE,
];

/// Whether `name` may appear in a query or payload for `class`.
pub fn is_valid_for(class: ItemClass, name: &str) -> bool {
    if COMMON.contains(&name) {
        return true;
    }
    match class {
        ItemClass::Generic => GENERIC.contains(&name),
        ItemClass::Certificate => CERTIFICATE.contains(&name),
        ItemClass::CryptoKey => CRYPTO_KEY.contains(&name),
        ItemClass::Identity => CERTIFICATE.contains(&name) || CRYPTO_KEY.contains(&name),
    }
}

/// Attributes maintained by the vault; they can be matched but not written.
pub fn is_read_only(name: &str) -> bool {
    name == attr::CREATION_DATE || name == attr::MODIFICATION_DATE
}

pub fn is_return_flag(name: &str) -> bool {
    name == attr::RETURN_ATTRIBUTES || name == attr::RETURN_DATA
}
