//! # Identity Store Service
//!
//! Owns the in-memory catalog, the credential index and every file behind
//! them. All mutable state sits behind one mutex; callers share the store
//! through an `Arc`.
//!
//! ## Startup
//!
//! 1. Lock the data directory, create the directories
//! 2. Per file: new → stamp it; existing → check the stamp, then load
//! 3. Undecryptable, malformed or duplicate lines are logged and skipped
//!
//! A stamp mismatch refuses startup. An existing file with no stamp is only
//! accepted while it is still empty.
//!
//! ## Registration
//!
//! `register` writes certificate, catalog line and credential line in that
//! order. A failure at any step undoes the earlier ones, so the three exist
//! together or not at all.

use crate::adapters::{CertificateVault, FileKeyCipher, HmacFileStamp, LineFile, StoreLock};
use crate::domain::codec;
use crate::domain::config::StoreConfig;
use crate::domain::entities::{Availability, CredentialLine, IdentityRecord};
use crate::domain::errors::StoreError;
use crate::ports::outbound::{IntegrityStamp, LineCipher, StampStatus};
use parking_lot::Mutex;
use shared_crypto::{Certificate, Ed25519PublicKey, FileKey};
use shared_types::UserId;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Mutable store state. Only touched with the store mutex held.
struct CatalogState {
    records: Vec<IdentityRecord>,
    record_index: HashMap<UserId, usize>,
    credentials: Vec<CredentialLine>,
    credential_index: HashMap<UserId, usize>,
}

impl CatalogState {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            record_index: HashMap::new(),
            credentials: Vec::new(),
            credential_index: HashMap::new(),
        }
    }

    fn push_record(&mut self, record: IdentityRecord) {
        self.record_index
            .insert(record.user_id().clone(), self.records.len());
        self.records.push(record);
    }

    fn push_credential(&mut self, credential: CredentialLine) {
        self.credential_index
            .insert(credential.user_id.clone(), self.credentials.len());
        self.credentials.push(credential);
    }

    fn record(&self, user_id: &str) -> Option<&IdentityRecord> {
        self.record_index.get(user_id).map(|&i| &self.records[i])
    }

    fn credential(&self, user_id: &str) -> Option<&CredentialLine> {
        self.credential_index
            .get(user_id)
            .map(|&i| &self.credentials[i])
    }
}

/// The identity catalog, its credential file and the certificate vault.
pub struct IdentityStore {
    config: StoreConfig,
    cipher: Box<dyn LineCipher>,
    stamp: Box<dyn IntegrityStamp>,
    catalog: LineFile,
    credential_file: LineFile,
    vault: CertificateVault,
    state: Mutex<CatalogState>,
    _lock: StoreLock,
}

impl std::fmt::Debug for IdentityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityStore")
            .field("data_dir", &self.config.data_dir)
            .field("users", &self.user_count())
            .finish_non_exhaustive()
    }
}

impl IdentityStore {
    /// Open the store with the file-key cipher and HMAC stamps.
    pub fn open(config: StoreConfig, file_key: FileKey) -> Result<Self, StoreError> {
        let cipher = FileKeyCipher::new(file_key.clone());
        let stamp = HmacFileStamp::new(file_key);
        Self::open_with(config, Box::new(cipher), Box::new(stamp))
    }

    /// Open the store with explicit cipher and stamp services.
    pub fn open_with(
        config: StoreConfig,
        cipher: Box<dyn LineCipher>,
        stamp: Box<dyn IntegrityStamp>,
    ) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&config.data_dir)
            .map_err(|e| StoreError::io(&config.data_dir, e))?;
        std::fs::create_dir_all(&config.cert_dir)
            .map_err(|e| StoreError::io(&config.cert_dir, e))?;

        let lock = StoreLock::acquire(&config.data_dir)?;

        let catalog = Self::open_stamped(stamp.as_ref(), config.catalog_path())?;
        let credential_file = Self::open_stamped(stamp.as_ref(), config.credentials_path())?;

        let mut state = CatalogState::empty();
        Self::load_catalog(cipher.as_ref(), &catalog, &mut state)?;
        Self::load_credentials(cipher.as_ref(), &credential_file, &mut state)?;

        info!(
            "[cm-02] identity store opened at {} ({} users, {} credentials)",
            config.data_dir.display(),
            state.records.len(),
            state.credentials.len()
        );

        let vault = CertificateVault::new(&config.cert_dir);
        Ok(Self {
            config,
            cipher,
            stamp,
            catalog,
            credential_file,
            vault,
            state: Mutex::new(state),
            _lock: lock,
        })
    }

    /// Open or create a line file and settle its stamp.
    fn open_stamped(
        stamp: &dyn IntegrityStamp,
        path: std::path::PathBuf,
    ) -> Result<LineFile, StoreError> {
        let (file, created) = LineFile::open_or_create(path)?;
        let contents = file.contents()?;

        if created {
            stamp.refresh(file.path(), &contents)?;
            return Ok(file);
        }

        match stamp.check(file.path(), &contents)? {
            StampStatus::Valid => Ok(file),
            StampStatus::Missing if contents.is_empty() => {
                warn!(
                    "[cm-02] {} has no stamp but is empty, stamping it",
                    file.path().display()
                );
                stamp.refresh(file.path(), &contents)?;
                Ok(file)
            }
            StampStatus::Missing | StampStatus::Mismatch => Err(StoreError::IntegrityMismatch {
                path: file.path().to_path_buf(),
            }),
        }
    }

    fn load_catalog(
        cipher: &dyn LineCipher,
        file: &LineFile,
        state: &mut CatalogState,
    ) -> Result<(), StoreError> {
        for (row, sealed) in file.read_lines()?.iter().enumerate() {
            let record = match cipher.open(sealed).and_then(|line| codec::decode_record(&line)) {
                Ok(record) => record,
                Err(e) => {
                    warn!("[cm-02] skipping catalog line {}: {}", row + 1, e);
                    continue;
                }
            };
            if state.record_index.contains_key(record.user_id()) {
                warn!(
                    "[cm-02] skipping catalog line {}: duplicate user {}",
                    row + 1,
                    record.user_id()
                );
                continue;
            }
            state.push_record(record);
        }
        Ok(())
    }

    fn load_credentials(
        cipher: &dyn LineCipher,
        file: &LineFile,
        state: &mut CatalogState,
    ) -> Result<(), StoreError> {
        for (row, sealed) in file.read_lines()?.iter().enumerate() {
            let credential =
                match cipher.open(sealed).and_then(|line| codec::decode_credential(&line)) {
                    Ok(credential) => credential,
                    Err(e) => {
                        warn!("[cm-02] skipping credential line {}: {}", row + 1, e);
                        continue;
                    }
                };
            if state.credential_index.contains_key(&credential.user_id) {
                warn!(
                    "[cm-02] skipping credential line {}: duplicate user {}",
                    row + 1,
                    credential.user_id
                );
                continue;
            }
            state.push_credential(credential);
        }
        Ok(())
    }

    // =========================================================================
    // LOOKUPS
    // =========================================================================

    /// The record for `user_id`, if any.
    pub fn get_by_name(&self, user_id: &str) -> Option<IdentityRecord> {
        self.state.lock().record(user_id).cloned()
    }

    /// The Ed25519 key in `user_id`'s stored certificate.
    ///
    /// Every failure along the way (unknown user, missing file, bad PEM,
    /// foreign key type) is `None`.
    pub fn get_public_key(&self, user_id: &str) -> Option<Ed25519PublicKey> {
        let file_name = {
            let state = self.state.lock();
            match state.record(user_id) {
                Some(record) => record.certificate_ref().to_owned(),
                None => {
                    debug!("[cm-02] no record for {}", user_id);
                    return None;
                }
            }
        };

        match self
            .vault
            .load(&file_name)
            .and_then(|cert| cert.public_key().map_err(StoreError::from))
        {
            Ok(key) => Some(key),
            Err(e) => {
                debug!("[cm-02] no usable key for {}: {}", user_id, e);
                None
            }
        }
    }

    /// Credential line for `user_id`, the handshake's register-vs-login test.
    pub fn credential_for(&self, user_id: &str) -> Option<CredentialLine> {
        let credential = self.state.lock().credential(user_id).cloned();
        debug!(
            "[cm-02] credential lookup for {}: {}",
            user_id,
            if credential.is_some() { "found" } else { "absent" }
        );
        credential
    }

    /// Read a certificate from the vault.
    pub fn load_certificate(&self, file_name: &str) -> Result<Certificate, StoreError> {
        self.vault.load(file_name)
    }

    /// Snapshot of all records in insertion order.
    pub fn records(&self) -> Vec<IdentityRecord> {
        self.state.lock().records.clone()
    }

    /// Number of catalog records.
    pub fn user_count(&self) -> usize {
        self.state.lock().records.len()
    }

    /// Number of credential lines.
    pub fn credential_count(&self) -> usize {
        self.state.lock().credentials.len()
    }

    /// File layout in use.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Create a catalog record with the starting balance.
    ///
    /// # Errors
    ///
    /// `UserExists` when the catalog already has `user_id`.
    pub fn add_user(&self, user_id: UserId) -> Result<IdentityRecord, StoreError> {
        let mut state = self.state.lock();
        if state.record_index.contains_key(&user_id) {
            return Err(StoreError::UserExists(user_id));
        }

        let record = self.new_record(user_id);
        self.append_sealed(&self.catalog, &codec::encode_record(&record)?)?;
        state.push_record(record.clone());

        info!("[cm-02] added user {}", record.user_id());
        Ok(record)
    }

    /// Persist a newly authenticated user: certificate, record, credential.
    ///
    /// # Errors
    ///
    /// `AlreadyRegistered` when `user_id` has a credential or a record. Any
    /// I/O or cipher failure after rollback of the partial writes.
    pub fn register(
        &self,
        user_id: UserId,
        certificate: &Certificate,
    ) -> Result<IdentityRecord, StoreError> {
        certificate.public_key()?;

        let mut state = self.state.lock();
        if state.credential_index.contains_key(&user_id)
            || state.record_index.contains_key(&user_id)
        {
            return Err(StoreError::AlreadyRegistered(user_id));
        }

        let record = self.new_record(user_id.clone());
        let credential = CredentialLine::for_user(user_id);
        let record_line = codec::encode_record(&record)?;
        let credential_line = codec::encode_credential(&credential);

        self.vault.store(record.certificate_ref(), certificate)?;

        let catalog_len = match self.append_sealed(&self.catalog, &record_line) {
            Ok(len) => len,
            Err(e) => {
                self.discard_certificate(record.certificate_ref());
                return Err(e);
            }
        };

        if let Err(e) = self.append_sealed(&self.credential_file, &credential_line) {
            self.rollback(&self.catalog, catalog_len);
            self.discard_certificate(record.certificate_ref());
            return Err(e);
        }

        state.push_record(record.clone());
        state.push_credential(credential);

        info!("[cm-02] registered {}", record.user_id());
        Ok(record)
    }

    fn new_record(&self, user_id: UserId) -> IdentityRecord {
        IdentityRecord::with_state(user_id, self.config.starting_balance, Availability::new())
    }

    /// Seal, append and re-stamp. Returns the pre-append length.
    fn append_sealed(&self, file: &LineFile, plaintext: &str) -> Result<u64, StoreError> {
        let sealed = self.cipher.seal(plaintext)?;
        let previous = file.append_line(&sealed)?;

        let restamp = file
            .contents()
            .and_then(|contents| self.stamp.refresh(file.path(), &contents));
        if let Err(e) = restamp {
            self.rollback(file, previous);
            return Err(e);
        }
        Ok(previous)
    }

    /// Truncate `file` to `len` and stamp what is left.
    fn rollback(&self, file: &LineFile, len: u64) {
        let result = file.truncate(len).and_then(|_| {
            let contents = file.contents()?;
            self.stamp.refresh(file.path(), &contents)
        });
        if let Err(e) = result {
            warn!(
                "[cm-02] rollback of {} failed: {}",
                file.path().display(),
                e
            );
        }
    }

    fn discard_certificate(&self, file_name: &str) {
        if let Err(e) = self.vault.remove(file_name) {
            warn!("[cm-02] could not remove {}: {}", file_name, e);
        }
    }
}
