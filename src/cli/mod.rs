// Keystash — CLI Module
//
// Command-line interface using clap derive macros.
// Subcommands: init, read, save, update, upsert, delete, wipe, destroy.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::item::ItemClass;

pub use commands::execute;

/// Keystash — typed items in an encrypted, keyring-unlocked vault.
#[derive(Parser, Debug)]
#[command(name = "keystash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the vault database (default: <data dir>/keystash/items.db).
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Identity and scope shared by every item command.
#[derive(clap::Args, Debug)]
pub struct ItemArgs {
    /// Item class: generic, certificate, crypto-key or identity.
    pub class: ItemClass,

    /// The item key.
    pub key: String,

    /// Extra attribute as NAME=VALUE (repeatable). Overrides base attributes.
    #[arg(long = "attr", value_name = "NAME=VALUE")]
    pub attrs: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the vault master secret and the encrypted vault.
    Init,

    /// Print an item's value as JSON.
    Read {
        #[command(flatten)]
        item: ItemArgs,
    },

    /// Create a new item. Fails if it already exists.
    Save {
        #[command(flatten)]
        item: ItemArgs,

        /// The value, as JSON.
        value: String,
    },

    /// Replace the value of an existing item.
    Update {
        #[command(flatten)]
        item: ItemArgs,

        /// The value, as JSON.
        value: String,
    },

    /// Update the item if it exists, otherwise create it.
    Upsert {
        #[command(flatten)]
        item: ItemArgs,

        /// The value, as JSON.
        value: String,
    },

    /// Delete an item. Deleting a missing item succeeds.
    Delete {
        #[command(flatten)]
        item: ItemArgs,
    },

    /// Delete every item of every class.
    Wipe,

    /// Erase the master secret from the keyring and remove the vault file.
    Destroy {
        /// Confirm that the vault will be unrecoverable.
        #[arg(long)]
        yes: bool,
    },
}
