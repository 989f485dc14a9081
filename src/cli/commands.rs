// Keystash — CLI Command Handlers
//
// Each function handles one subcommand. Item commands unlock the vault with
// the keyring-held master secret and go through the typed `ItemStore`.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::enclave::{unlock, KeySource, KeyringSource};
use crate::error::{KeystashError, Result};
use crate::item::{AttributeMap, ItemStore};
use crate::store::{SqliteKeychain, StoreError, Vault};

use super::{Cli, Commands, ItemArgs};

/// Default directory for Keystash data files.
fn data_dir() -> PathBuf {
    let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("keystash")
}

fn default_vault_path() -> PathBuf {
    data_dir().join("items.db")
}

/// Parse repeated `--attr NAME=VALUE` arguments. No arguments means no extras.
fn parse_attrs(attrs: &[String]) -> Result<Option<AttributeMap>> {
    if attrs.is_empty() {
        return Ok(None);
    }
    let mut map = AttributeMap::new();
    for raw in attrs {
        let (name, value) = raw.split_once('=').ok_or_else(|| {
            KeystashError::Other(format!("Invalid attribute '{}', expected NAME=VALUE", raw))
        })?;
        if name.is_empty() {
            return Err(KeystashError::Other(format!(
                "Invalid attribute '{}', name is empty",
                raw
            )));
        }
        map.insert(name, value);
    }
    Ok(Some(map))
}

/// Execute the parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    let path = cli.vault.unwrap_or_else(default_vault_path);

    match cli.command {
        Commands::Init => cmd_init(&path),
        Commands::Read { item } => cmd_read(&path, item),
        Commands::Save { item, value } => cmd_write(&path, item, &value, WriteMode::Save),
        Commands::Update { item, value } => cmd_write(&path, item, &value, WriteMode::Update),
        Commands::Upsert { item, value } => cmd_write(&path, item, &value, WriteMode::Upsert),
        Commands::Delete { item } => cmd_delete(&path, item),
        Commands::Wipe => cmd_wipe(&path),
        Commands::Destroy { yes } => cmd_destroy(&path, yes),
    }
}

// ─── Init ────────────────────────────────────────────────────────────────────

fn cmd_init(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let key = unlock(&KeyringSource::new(), true)?;
    let _vault = Vault::open(path, &key)?;

    println!("✓ Keystash vault initialized");
    println!("  Vault: {}", path.display());
    println!("  Master secret stored in platform keyring");
    Ok(())
}

// ─── Items ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum WriteMode {
    Save,
    Update,
    Upsert,
}

fn cmd_read(path: &Path, item: ItemArgs) -> Result<()> {
    let extra = parse_attrs(&item.attrs)?;
    let vault = open_vault(path)?;
    let items = ItemStore::new(SqliteKeychain::new(&vault));

    let value: Value = items.read(item.class, &item.key, extra.as_ref())?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn cmd_write(path: &Path, item: ItemArgs, raw: &str, mode: WriteMode) -> Result<()> {
    let value: Value = serde_json::from_str(raw)?;
    let extra = parse_attrs(&item.attrs)?;
    let vault = open_vault(path)?;
    let items = ItemStore::new(SqliteKeychain::new(&vault));

    match mode {
        WriteMode::Save => items.save(&value, item.class, &item.key, extra.as_ref())?,
        WriteMode::Update => items.update(&value, item.class, &item.key, extra.as_ref())?,
        WriteMode::Upsert => items.upsert(&value, item.class, &item.key, extra.as_ref())?,
    }

    println!("✓ {} {} stored", item.class, item.key);
    Ok(())
}

fn cmd_delete(path: &Path, item: ItemArgs) -> Result<()> {
    let extra = parse_attrs(&item.attrs)?;
    let vault = open_vault(path)?;
    let items = ItemStore::new(SqliteKeychain::new(&vault));

    items.delete(item.class, &item.key, extra.as_ref())?;
    println!("✓ {} {} deleted", item.class, item.key);
    Ok(())
}

fn cmd_wipe(path: &Path) -> Result<()> {
    let vault = open_vault(path)?;
    ItemStore::new(SqliteKeychain::new(&vault)).delete_all()?;
    println!("✓ All items deleted");
    Ok(())
}

// ─── Destroy ─────────────────────────────────────────────────────────────────

fn cmd_destroy(path: &Path, confirmed: bool) -> Result<()> {
    if !confirmed {
        return Err(KeystashError::Other(
            "Destroying the vault is irreversible; pass --yes to confirm".to_string(),
        ));
    }

    if KeyringSource::new().erase()? {
        tracing::warn!("Vault master secret erased from keyring");
    }
    if path.exists() {
        std::fs::remove_file(path)?;
    }

    println!("✓ Vault destroyed");
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Unlock and open an existing vault.
fn open_vault(path: &Path) -> Result<Vault> {
    if !path.exists() {
        return Err(StoreError::NotInitialized.into());
    }
    let key = unlock(&KeyringSource::new(), false)?;
    Ok(Vault::open(path, &key)?)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
