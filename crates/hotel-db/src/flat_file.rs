//! # Flat-File Store
//!
//! Text-file backend: an aggregate snapshot, an append-only sale log and a
//! users file, all comma-delimited.
//!
//! ## Files
//! ```text
//! hotel_data.txt      name,price,quantity,sold            (snapshot)
//! customer_log.txt    timestamp,item,quantity,unitPrice,total,user   (log)
//! users.txt           username,role
//! hotel_data.journal  commit journal, present only mid-order
//! ```
//!
//! The snapshot is the stock aggregate, not an event log: startup reads the
//! counters straight from it and never replays the sale log. The log is
//! sale history for reporting only.
//!
//! ## Order Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. journal.tmp → journal    (log offset, log line, new snapshot)       │
//! │  2. snapshot.tmp → snapshot                                             │
//! │  3. truncate log to offset, append log line                             │
//! │  4. delete journal                                                      │
//! │                                                                         │
//! │  Crash before 1 completes  → no journal → pre-call state                │
//! │  Crash after 1             → open() replays the journal → post-call     │
//! │  I/O error in 2 or 3       → drop journal, restore snapshot, truncate   │
//! │                              log → pre-call state, error returned       │
//! │  I/O error in 4            → order stands; the next restock or rollover │
//! │                              removes the journal before writing         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Names and usernames must not contain commas; there is no escaping.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::archive::ArchiveSink;
use crate::error::{DbError, DbResult};
use crate::store::{drain_into_sink, PersistenceStore};
use hotel_core::{
    format_timestamp, parse_timestamp, Category, Item, ItemCatalog, Money,
    OrderRequest, Role, SaleRecord, StockEntry, StockLedger, StockRecord, User,
    DEFAULT_ADMIN_USERNAME,
};

pub const SNAPSHOT_FILE: &str = "hotel_data.txt";
pub const LOG_FILE: &str = "customer_log.txt";
pub const USERS_FILE: &str = "users.txt";
pub const JOURNAL_FILE: &str = "hotel_data.journal";

// =============================================================================
// Configuration
// =============================================================================

/// Locations of the flat files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatFileConfig {
    pub snapshot_path: PathBuf,
    pub log_path: PathBuf,
    pub users_path: PathBuf,
    pub journal_path: PathBuf,
}

impl FlatFileConfig {
    /// Standard file names inside `dir`.
    ///
    /// ## Example
    /// ```rust
    /// use hotel_db::FlatFileConfig;
    ///
    /// let config = FlatFileConfig::in_dir("/srv/hotel");
    /// assert!(config.snapshot_path.ends_with("hotel_data.txt"));
    /// ```
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        FlatFileConfig {
            snapshot_path: dir.join(SNAPSHOT_FILE),
            log_path: dir.join(LOG_FILE),
            users_path: dir.join(USERS_FILE),
            journal_path: dir.join(JOURNAL_FILE),
        }
    }
}

// =============================================================================
// Line Formats
// =============================================================================

fn render_snapshot(ledger: &StockLedger) -> String {
    ledger
        .entries()
        .iter()
        .map(|e| {
            format!(
                "{},{},{},{}\n",
                e.item.name,
                e.item.price.units(),
                e.stock.quantity(),
                e.stock.sold()
            )
        })
        .collect()
}

fn parse_int(field: &str, what: &str, line_no: usize) -> Result<i64, String> {
    field
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("line {line_no}: {what} '{field}' is not an integer"))
}

/// Parses snapshot text. Any bad line rejects the whole file.
fn parse_snapshot(text: &str) -> Result<StockLedger, String> {
    let defaults = ItemCatalog::default_catalog();
    let mut entries: Vec<StockEntry> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 4 {
            return Err(format!(
                "line {line_no}: expected 4 fields, found {}",
                fields.len()
            ));
        }

        let name = fields[0].trim();
        if name.is_empty() {
            return Err(format!("line {line_no}: empty item name"));
        }
        if entries.iter().any(|e| e.item.name == name) {
            return Err(format!("line {line_no}: duplicate item '{name}'"));
        }

        let price = parse_int(fields[1], "price", line_no)?;
        if price < 0 {
            return Err(format!("line {line_no}: negative price"));
        }
        let quantity = parse_int(fields[2], "quantity", line_no)?;
        let sold = parse_int(fields[3], "sold", line_no)?;
        let stock = StockRecord::new(name, quantity, sold)
            .map_err(|e| format!("line {line_no}: {e}"))?;

        let item = Item {
            name: name.to_string(),
            price: Money::from_units(price),
            category: defaults.category_for_name(name),
        };
        entries.push(StockEntry::new(item, stock));
    }

    if entries.is_empty() {
        return Err("no items".to_string());
    }
    Ok(StockLedger::new(entries))
}

fn render_log_line(record: &SaleRecord) -> String {
    format!(
        "{},{},{},{},{},{}",
        format_timestamp(record.sold_at),
        record.item,
        record.quantity,
        record.unit_price.units(),
        record.total.units(),
        record.user
    )
}

/// Parses one log line; `None` for anything malformed.
fn parse_log_line(line: &str, ledger: &StockLedger) -> Option<SaleRecord> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 6 {
        return None;
    }

    let sold_at = parse_timestamp(fields[0])?;
    let item = fields[1].trim().to_string();
    let quantity = fields[2].trim().parse::<i64>().ok()?;
    let unit_price = fields[3].trim().parse::<i64>().ok()?;
    let total = fields[4].trim().parse::<i64>().ok()?;
    let user = fields[5].trim().to_string();
    if item.is_empty() || quantity <= 0 || unit_price < 0 {
        return None;
    }
    let unit_price = Money::from_units(unit_price);
    let total = Money::from_units(total);
    if unit_price.checked_mul_quantity(quantity) != Some(total) {
        return None;
    }

    let category = ledger
        .get(&item)
        .map(|e| e.item.category)
        .unwrap_or_else(|_| ItemCatalog::default_catalog().category_for_name(&item));

    Some(SaleRecord {
        item,
        category,
        quantity,
        unit_price,
        total,
        user,
        sold_at,
    })
}

fn parse_users(text: &str) -> Vec<User> {
    let mut users: Vec<User> = Vec::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let parsed = line
            .split_once(',')
            .and_then(|(name, role)| Some((name.trim(), role.parse::<Role>().ok()?)));
        match parsed {
            Some((name, role)) if !name.is_empty() => users.push(User::new(name, role)),
            _ => warn!(line, "Skipping malformed users line"),
        }
    }
    users
}

fn render_users(users: &[User]) -> String {
    users
        .iter()
        .map(|u| format!("{},{}\n", u.username, u.role))
        .collect()
}

// =============================================================================
// Journal
// =============================================================================

/// Everything needed to redo an order commit after a crash.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Journal {
    /// Log length before the order's line was appended.
    log_offset: u64,
    log_line: String,
    snapshot: String,
}

impl Journal {
    fn render(&self) -> String {
        format!("{}\n{}\n{}", self.log_offset, self.log_line, self.snapshot)
    }

    fn parse(text: &str) -> Option<Journal> {
        let mut parts = text.splitn(3, '\n');
        let log_offset = parts.next()?.trim().parse::<u64>().ok()?;
        let log_line = parts.next()?.to_string();
        let snapshot = parts.next()?.to_string();
        if log_line.is_empty() || snapshot.is_empty() {
            return None;
        }
        Some(Journal {
            log_offset,
            log_line,
            snapshot,
        })
    }
}

// =============================================================================
// File Helpers
// =============================================================================

fn temp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.tmp", path.display()))
}

/// Replaces `path` with `contents` via write-temp-then-rename.
async fn write_atomic(path: &Path, contents: &str) -> DbResult<()> {
    let tmp = temp_path(path);
    let mut file = fs::File::create(&tmp).await?;
    file.write_all(contents.as_bytes()).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(&tmp, path).await?;
    Ok(())
}

async fn read_optional(path: &Path) -> DbResult<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

async fn remove_if_exists(path: &Path) -> DbResult<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

async fn file_len(path: &Path) -> DbResult<u64> {
    match fs::metadata(path).await {
        Ok(meta) => Ok(meta.len()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(0),
        Err(err) => Err(err.into()),
    }
}

/// Cuts the log back to `offset` (if longer) and appends `line`.
async fn write_log_tail(path: &Path, offset: u64, line: &str) -> DbResult<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .await?;
    let len = file.metadata().await?.len();
    let start = if len > offset { offset } else { len };
    file.set_len(start).await?;
    file.seek(SeekFrom::Start(start)).await?;
    file.write_all(format!("{line}\n").as_bytes()).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}

async fn truncate_log(path: &Path, offset: u64) -> DbResult<()> {
    if file_len(path).await? > offset {
        let file = fs::OpenOptions::new().write(true).open(path).await?;
        file.set_len(offset).await?;
        file.sync_all().await?;
    }
    Ok(())
}

async fn quarantine(path: &Path) -> DbResult<()> {
    let target = PathBuf::from(format!("{}.corrupt", path.display()));
    fs::rename(path, &target).await?;
    warn!(from = %path.display(), to = %target.display(), "Moved unreadable file aside");
    Ok(())
}

// =============================================================================
// Commit Steps
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitStep {
    Journal,
    Snapshot,
    Log,
    ClearJournal,
}

impl CommitStep {
    const SEQUENCE: [CommitStep; 4] = [
        CommitStep::Journal,
        CommitStep::Snapshot,
        CommitStep::Log,
        CommitStep::ClearJournal,
    ];
}

/// Injected failure for crash tests.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    /// Process dies before the step runs: no cleanup at all.
    Crash,
    /// The step fails with an I/O error: normal rollback runs.
    IoError,
}

// =============================================================================
// Flat-File Store
// =============================================================================

/// `PersistenceStore` over plain text files.
#[derive(Debug)]
pub struct FlatFileStore {
    config: FlatFileConfig,
    /// In-memory stock. The lock also serializes every mutation.
    ledger: Mutex<StockLedger>,
    #[cfg(test)]
    fault: std::sync::Mutex<Option<(CommitStep, Fault)>>,
    #[cfg(test)]
    fail_restore: std::sync::atomic::AtomicBool,
}

impl FlatFileStore {
    /// Opens the files described by `config`, recovering as needed.
    ///
    /// ## Startup
    /// 1. A leftover journal is rolled forward
    /// 2. A missing or empty snapshot is replaced by the default catalog
    /// 3. An unparsable or unreadable snapshot is moved to `*.corrupt` and
    ///    replaced the same way
    /// 4. A missing users file gets the default admin account
    pub async fn open(config: FlatFileConfig) -> DbResult<Self> {
        info!(snapshot = %config.snapshot_path.display(), "Opening flat-file store");

        if let Some(parent) = config.snapshot_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        recover_journal(&config).await?;
        let ledger = load_or_bootstrap(&config.snapshot_path).await;
        ensure_users_file(&config.users_path).await?;

        Ok(FlatFileStore {
            config,
            ledger: Mutex::new(ledger),
            #[cfg(test)]
            fault: std::sync::Mutex::new(None),
            #[cfg(test)]
            fail_restore: std::sync::atomic::AtomicBool::new(false),
        })
    }

    #[cfg(test)]
    fn inject(&self, step: CommitStep, fault: Fault) {
        if let Ok(mut slot) = self.fault.lock() {
            *slot = Some((step, fault));
        }
    }

    #[cfg(test)]
    fn fault_at(&self, step: CommitStep) -> Option<Fault> {
        let slot = self.fault.lock().ok()?;
        match *slot {
            Some((at, fault)) if at == step => Some(fault),
            _ => None,
        }
    }

    #[cfg(not(test))]
    fn fault_at(&self, _step: CommitStep) -> Option<Fault> {
        None
    }

    async fn run_step(&self, step: CommitStep, journal: &Journal) -> DbResult<()> {
        match step {
            CommitStep::Journal => {
                write_atomic(&self.config.journal_path, &journal.render()).await
            }
            CommitStep::Snapshot => {
                write_atomic(&self.config.snapshot_path, &journal.snapshot).await
            }
            CommitStep::Log => {
                write_log_tail(&self.config.log_path, journal.log_offset, &journal.log_line).await
            }
            CommitStep::ClearJournal => remove_if_exists(&self.config.journal_path).await,
        }
    }

    /// Runs the commit sequence, rolling back on failure.
    async fn commit_order(&self, journal: &Journal, previous_snapshot: &str) -> DbResult<()> {
        for step in CommitStep::SEQUENCE {
            let outcome = match self.fault_at(step) {
                Some(Fault::Crash) => {
                    return Err(DbError::PersistenceUnavailable(format!(
                        "simulated crash before {step:?}"
                    )))
                }
                Some(Fault::IoError) => Err(DbError::PersistenceUnavailable(format!(
                    "simulated I/O error at {step:?}"
                ))),
                None => self.run_step(step, journal).await,
            };

            let Err(err) = outcome else { continue };

            match step {
                CommitStep::Journal => {
                    // nothing applied yet
                    if let Err(cleanup) = remove_if_exists(&temp_path(&self.config.journal_path)).await {
                        debug!(error = %cleanup, "Could not remove journal temp file");
                    }
                    return Err(err);
                }
                CommitStep::ClearJournal => {
                    // snapshot and log are final; replaying the journal is idempotent
                    warn!(error = %err, "Order committed but journal not removed");
                    return Ok(());
                }
                CommitStep::Snapshot | CommitStep::Log => {
                    let partial = DbError::PartialWriteDetected(format!("{step:?}: {err}"));
                    warn!(error = %partial, "Rolling back order");
                    self.roll_back(journal.log_offset, previous_snapshot).await;
                    return Err(DbError::PersistenceUnavailable(err.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Undoes a failed order. The journal goes first: a failed order is never
    /// rolled forward, even when the restore below fails too.
    async fn roll_back(&self, log_offset: u64, previous_snapshot: &str) {
        if let Err(err) = remove_if_exists(&self.config.journal_path).await {
            error!(error = %err, "Journal of a failed order could not be removed");
        }

        let restored = match self.restore_fault() {
            Some(err) => Err(err),
            None => async {
                write_atomic(&self.config.snapshot_path, previous_snapshot).await?;
                truncate_log(&self.config.log_path, log_offset).await
            }
            .await,
        };

        if let Err(err) = restored {
            error!(error = %err, "Rollback incomplete; files differ from memory until the next write");
        }
    }

    #[cfg(test)]
    fn restore_fault(&self) -> Option<DbError> {
        self.fail_restore
            .load(std::sync::atomic::Ordering::SeqCst)
            .then(|| DbError::PersistenceUnavailable("simulated I/O error at restore".into()))
    }

    #[cfg(not(test))]
    fn restore_fault(&self) -> Option<DbError> {
        None
    }

    /// Removes a journal left behind by an order whose cleanup step failed.
    /// Must run before any other snapshot write, or the next open would roll
    /// that older journal forward over it.
    async fn clear_stale_journal(&self) -> DbResult<()> {
        if fs::try_exists(&self.config.journal_path).await? {
            warn!("Removing journal left by an earlier order");
            fs::remove_file(&self.config.journal_path).await?;
        }
        Ok(())
    }

    async fn read_users(&self) -> DbResult<Vec<User>> {
        Ok(read_optional(&self.config.users_path)
            .await?
            .map(|text| parse_users(&text))
            .unwrap_or_default())
    }
}

async fn recover_journal(config: &FlatFileConfig) -> DbResult<()> {
    remove_if_exists(&temp_path(&config.journal_path)).await?;

    let Some(text) = read_optional(&config.journal_path).await? else {
        return Ok(());
    };

    let Some(journal) = Journal::parse(&text) else {
        warn!("Discarding unreadable journal");
        return remove_if_exists(&config.journal_path).await;
    };

    let partial = DbError::PartialWriteDetected("order journal left by an interrupted commit".to_string());
    warn!(error = %partial, log_offset = journal.log_offset, "Rolling journal forward");

    write_atomic(&config.snapshot_path, &journal.snapshot).await?;
    write_log_tail(&config.log_path, journal.log_offset, &journal.log_line).await?;
    remove_if_exists(&config.journal_path).await?;

    info!("Journal replayed");
    Ok(())
}

async fn load_or_bootstrap(path: &Path) -> StockLedger {
    let parsed = match fs::read_to_string(path).await {
        Ok(text) if text.trim().is_empty() => None,
        Ok(text) => match parse_snapshot(&text) {
            Ok(ledger) => Some(ledger),
            Err(reason) => {
                warn!(reason = %reason, "Snapshot unreadable, starting from the default catalog");
                set_aside(path).await;
                None
            }
        },
        Err(err) if err.kind() == ErrorKind::NotFound => None,
        Err(err) => {
            warn!(error = %err, "Snapshot could not be read, starting from the default catalog");
            set_aside(path).await;
            None
        }
    };

    if let Some(ledger) = parsed {
        debug!(items = ledger.entries().len(), "Snapshot loaded");
        return ledger;
    }

    let ledger = StockLedger::bootstrap();
    match write_atomic(path, &render_snapshot(&ledger)).await {
        Ok(()) => info!("Default catalog written"),
        Err(err) => warn!(error = %err, "Default catalog kept in memory only"),
    }
    ledger
}

/// Quarantines `path`, logging instead of failing when even that is refused.
async fn set_aside(path: &Path) {
    if let Err(err) = quarantine(path).await {
        warn!(path = %path.display(), error = %err, "Could not move unreadable snapshot aside");
    }
}

async fn ensure_users_file(path: &Path) -> DbResult<()> {
    if read_optional(path).await?.is_none() {
        info!(username = DEFAULT_ADMIN_USERNAME, "Creating default admin user");
        write_atomic(
            path,
            &render_users(&[User::new(DEFAULT_ADMIN_USERNAME, Role::Admin)]),
        )
        .await?;
    }
    Ok(())
}

#[async_trait]
impl PersistenceStore for FlatFileStore {
    fn backend(&self) -> &'static str {
        "flat_file"
    }

    async fn load_catalog_and_stock(&self) -> DbResult<Vec<StockEntry>> {
        Ok(self.ledger.lock().await.entries().to_vec())
    }

    async fn atomic_order(&self, order: &OrderRequest) -> DbResult<SaleRecord> {
        let mut ledger = self.ledger.lock().await;

        let mut next = ledger.clone();
        let category: Category = next.debit(&order.item, order.quantity)?.item.category;
        let record = order.to_sale_record(category)?;

        let journal = Journal {
            log_offset: file_len(&self.config.log_path).await?,
            log_line: render_log_line(&record),
            snapshot: render_snapshot(&next),
        };
        self.commit_order(&journal, &render_snapshot(&ledger)).await?;

        let remaining = next.remaining(&order.item)?;
        *ledger = next;

        info!(
            item = %record.item,
            quantity = record.quantity,
            total = record.total.units(),
            remaining,
            user = %record.user,
            "Order committed"
        );
        Ok(record)
    }

    async fn sales_since(&self, start: DateTime<Utc>) -> DbResult<Vec<SaleRecord>> {
        let ledger = self.ledger.lock().await;
        let Some(text) = read_optional(&self.config.log_path).await? else {
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_log_line(line, &ledger) {
                Some(record) if record.sold_at >= start => records.push(record),
                Some(_) => {}
                None => warn!(line_no = idx + 1, "Skipping malformed log line"),
            }
        }

        records.sort_by_key(|r| r.sold_at);
        Ok(records)
    }

    async fn restock(&self, item: &str, new_quantity: i64) -> DbResult<StockEntry> {
        let mut ledger = self.ledger.lock().await;

        let mut next = ledger.clone();
        let entry = next.restock(item, new_quantity)?.clone();
        self.clear_stale_journal().await?;
        write_atomic(&self.config.snapshot_path, &render_snapshot(&next)).await?;
        *ledger = next;

        info!(item, quantity = new_quantity, "Item restocked");
        Ok(entry)
    }

    async fn rollover_period(
        &self,
        records: &[SaleRecord],
        sink: &mut (dyn ArchiveSink + Send),
    ) -> DbResult<usize> {
        let mut ledger = self.ledger.lock().await;

        let archived = drain_into_sink(records, sink)?;

        let mut next = ledger.clone();
        next.reset_all();
        self.clear_stale_journal().await?;
        write_atomic(&self.config.snapshot_path, &render_snapshot(&next)).await?;
        *ledger = next;

        info!(archived, "Period rolled over");
        Ok(archived)
    }

    async fn insert_user(&self, user: &User) -> DbResult<()> {
        let _ledger = self.ledger.lock().await;

        let mut users = self.read_users().await?;
        if users.iter().any(|u| u.username == user.username) {
            return Err(DbError::duplicate("username", &user.username));
        }
        users.push(user.clone());
        write_atomic(&self.config.users_path, &render_users(&users)).await?;

        debug!(username = %user.username, role = %user.role, "User added");
        Ok(())
    }

    async fn find_user(&self, username: &str) -> DbResult<Option<User>> {
        Ok(self
            .read_users()
            .await?
            .into_iter()
            .find(|u| u.username == username))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    fn burger_order(quantity: i64) -> OrderRequest {
        OrderRequest {
            item: "Burger".to_string(),
            quantity,
            unit_price: Money::from_units(120),
            user: "desk".to_string(),
            at: at(),
        }
    }

    async fn stocked_store(dir: &Path) -> FlatFileStore {
        let store = FlatFileStore::open(FlatFileConfig::in_dir(dir)).await.unwrap();
        store.restock("Burger", 10).await.unwrap();
        store
    }

    async fn burger(store: &FlatFileStore) -> StockRecord {
        store
            .load_catalog_and_stock()
            .await
            .unwrap()
            .into_iter()
            .find(|e| e.item.name == "Burger")
            .unwrap()
            .stock
    }

    fn log_lines(dir: &Path) -> usize {
        std::fs::read_to_string(dir.join(LOG_FILE))
            .map(|t| t.lines().filter(|l| !l.is_empty()).count())
            .unwrap_or(0)
    }

    #[test]
    fn test_parse_snapshot_rejects_bad_lines() {
        assert!(parse_snapshot("Room,1200,5,2\n").is_ok());
        assert!(parse_snapshot("Room,1200,5\n").is_err());
        assert!(parse_snapshot("Room,abc,5,2\n").is_err());
        assert!(parse_snapshot("Room,1200,2,5\n").is_err());
        assert!(parse_snapshot("Room,1200,5,2\nRoom,1200,5,2\n").is_err());
        assert!(parse_snapshot("Room,-1,5,2\n").is_err());
    }

    #[test]
    fn test_snapshot_text_round_trip() {
        let mut ledger = StockLedger::bootstrap();
        ledger.restock("Room", 8).unwrap();
        ledger.debit("Room", 3).unwrap();
        let text = render_snapshot(&ledger);
        assert!(text.starts_with("Room,1200,8,3\n"));
        assert_eq!(parse_snapshot(&text).unwrap(), ledger);
    }

    #[test]
    fn test_log_line_format() {
        let record = burger_order(3).to_sale_record(Category::Food).unwrap();
        let line = render_log_line(&record);
        assert_eq!(line, "2026-10-16 09:30:00,Burger,3,120,360,desk");
        assert_eq!(parse_log_line(&line, &StockLedger::bootstrap()), Some(record));
        assert_eq!(parse_log_line("garbage", &StockLedger::bootstrap()), None);
    }

    #[test]
    fn test_journal_parse() {
        let journal = Journal {
            log_offset: 42,
            log_line: "2026-10-16 09:30:00,Burger,3,120,360,desk".to_string(),
            snapshot: "Burger,120,10,3\n".to_string(),
        };
        assert_eq!(Journal::parse(&journal.render()), Some(journal));
        assert_eq!(Journal::parse("not a number\nx\ny"), None);
    }

    #[tokio::test]
    async fn test_crash_after_journal_rolls_forward() {
        for step in [CommitStep::Snapshot, CommitStep::Log, CommitStep::ClearJournal] {
            let dir = tempfile::tempdir().unwrap();
            let store = stocked_store(dir.path()).await;

            store.inject(step, Fault::Crash);
            assert!(store.atomic_order(&burger_order(3)).await.is_err());
            drop(store);

            let reopened = FlatFileStore::open(FlatFileConfig::in_dir(dir.path()))
                .await
                .unwrap();
            let stock = burger(&reopened).await;
            assert_eq!(stock.sold(), 3, "crash before {step:?}");
            assert_eq!(log_lines(dir.path()), 1, "crash before {step:?}");
            assert!(!dir.path().join(JOURNAL_FILE).exists());
        }
    }

    #[tokio::test]
    async fn test_crash_before_journal_keeps_pre_call_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = stocked_store(dir.path()).await;

        store.inject(CommitStep::Journal, Fault::Crash);
        assert!(store.atomic_order(&burger_order(3)).await.is_err());
        drop(store);

        // a torn journal write leaves only the temp file behind
        std::fs::write(
            temp_path(&dir.path().join(JOURNAL_FILE)),
            "12\n2026-10-16 09:30",
        )
        .unwrap();

        let reopened = FlatFileStore::open(FlatFileConfig::in_dir(dir.path()))
            .await
            .unwrap();
        assert_eq!(burger(&reopened).await.sold(), 0);
        assert_eq!(log_lines(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_io_error_rolls_back_in_process() {
        for step in [CommitStep::Snapshot, CommitStep::Log] {
            let dir = tempfile::tempdir().unwrap();
            let store = stocked_store(dir.path()).await;
            store.atomic_order(&burger_order(1)).await.unwrap();

            store.inject(step, Fault::IoError);
            let err = store.atomic_order(&burger_order(3)).await.unwrap_err();
            assert!(matches!(err, DbError::PersistenceUnavailable(_)));

            assert_eq!(burger(&store).await.sold(), 1, "io error at {step:?}");
            assert_eq!(log_lines(dir.path()), 1);
            assert!(!dir.path().join(JOURNAL_FILE).exists());

            drop(store);
            let reopened = FlatFileStore::open(FlatFileConfig::in_dir(dir.path()))
                .await
                .unwrap();
            assert_eq!(burger(&reopened).await.sold(), 1);
        }
    }

    #[tokio::test]
    async fn test_journal_failure_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = stocked_store(dir.path()).await;

        store.inject(CommitStep::Journal, Fault::IoError);
        assert!(store.atomic_order(&burger_order(3)).await.is_err());
        assert_eq!(burger(&store).await.sold(), 0);
        assert_eq!(log_lines(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_malformed_log_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = stocked_store(dir.path()).await;
        store.atomic_order(&burger_order(2)).await.unwrap();

        let mut log = std::fs::OpenOptions::new()
            .append(true)
            .open(dir.path().join(LOG_FILE))
            .unwrap();
        std::io::Write::write_all(&mut log, b"half a line,Burger\n").unwrap();

        let records = store.sales_since(at() - chrono::Duration::days(1)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, Category::Food);
    }

    #[tokio::test]
    async fn test_log_lines_with_wrong_totals_are_skipped() {
        let ledger = StockLedger::bootstrap();
        let huge = format!("2026-10-16 09:30:00,Burger,1,120,{},desk", i64::MAX);
        assert_eq!(parse_log_line(&huge, &ledger), None);
        assert_eq!(parse_log_line("2026-10-16 09:30:00,Burger,2,-120,-240,desk", &ledger), None);
        assert_eq!(parse_log_line("2026-10-16 09:30:00,Burger,2,120,250,desk", &ledger), None);

        let dir = tempfile::tempdir().unwrap();
        let store = stocked_store(dir.path()).await;
        store.atomic_order(&burger_order(2)).await.unwrap();
        let mut log = std::fs::OpenOptions::new()
            .append(true)
            .open(dir.path().join(LOG_FILE))
            .unwrap();
        std::io::Write::write_all(&mut log, format!("{huge}\n{huge}\n").as_bytes()).unwrap();

        let records = store.sales_since(at() - chrono::Duration::days(1)).await.unwrap();
        assert_eq!(records.len(), 1);
        let totals = hotel_core::report::aggregate_daily(&records, at().date_naive());
        assert_eq!(totals.total_revenue, Money::from_units(240));
    }

    #[tokio::test]
    async fn test_unreadable_snapshot_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(SNAPSHOT_FILE)).unwrap();

        let store = FlatFileStore::open(FlatFileConfig::in_dir(dir.path())).await.unwrap();
        assert_eq!(burger(&store).await.quantity(), 0);
        assert!(dir.path().join(format!("{SNAPSHOT_FILE}.corrupt")).is_dir());
        assert!(dir.path().join(SNAPSHOT_FILE).is_file());

        store.restock("Burger", 4).await.unwrap();
        drop(store);
        let reopened = FlatFileStore::open(FlatFileConfig::in_dir(dir.path())).await.unwrap();
        assert_eq!(burger(&reopened).await.quantity(), 4);
    }

    #[tokio::test]
    async fn test_stale_journal_is_cleared_before_restock() {
        let dir = tempfile::tempdir().unwrap();
        let store = stocked_store(dir.path()).await;

        store.inject(CommitStep::ClearJournal, Fault::IoError);
        store.atomic_order(&burger_order(3)).await.unwrap();
        assert!(dir.path().join(JOURNAL_FILE).exists());

        store.restock("Burger", 50).await.unwrap();
        assert!(!dir.path().join(JOURNAL_FILE).exists());
        drop(store);

        let reopened = FlatFileStore::open(FlatFileConfig::in_dir(dir.path())).await.unwrap();
        let stock = burger(&reopened).await;
        assert_eq!((stock.quantity(), stock.sold()), (50, 3));
        assert_eq!(log_lines(dir.path()), 1);
    }

    #[tokio::test]
    async fn test_stale_journal_is_cleared_before_rollover() {
        let dir = tempfile::tempdir().unwrap();
        let store = stocked_store(dir.path()).await;

        store.inject(CommitStep::ClearJournal, Fault::IoError);
        store.atomic_order(&burger_order(3)).await.unwrap();
        store.atomic_order(&burger_order(2)).await.unwrap();

        let records = store.sales_since(at() - chrono::Duration::days(1)).await.unwrap();
        let mut sink = crate::archive::MemoryArchive::default();
        assert_eq!(store.rollover_period(&records, &mut sink).await.unwrap(), 2);
        drop(store);

        let reopened = FlatFileStore::open(FlatFileConfig::in_dir(dir.path())).await.unwrap();
        let stock = burger(&reopened).await;
        assert_eq!((stock.quantity(), stock.sold()), (10, 0));
        assert_eq!(log_lines(dir.path()), 2);
    }

    #[tokio::test]
    async fn test_failed_restore_never_replays_the_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = stocked_store(dir.path()).await;

        store.inject(CommitStep::Snapshot, Fault::IoError);
        store.fail_restore.store(true, std::sync::atomic::Ordering::SeqCst);
        let err = store.atomic_order(&burger_order(3)).await.unwrap_err();
        assert!(matches!(err, DbError::PersistenceUnavailable(_)));
        assert!(!dir.path().join(JOURNAL_FILE).exists());
        drop(store);

        let reopened = FlatFileStore::open(FlatFileConfig::in_dir(dir.path())).await.unwrap();
        assert_eq!(burger(&reopened).await.sold(), 0);
        assert_eq!(log_lines(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_missing_users_file_gets_admin() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlatFileStore::open(FlatFileConfig::in_dir(dir.path())).await.unwrap();
        let text = std::fs::read_to_string(dir.path().join(USERS_FILE)).unwrap();
        assert_eq!(text, "admin,admin\n");
        assert!(store.find_user("admin").await.unwrap().unwrap().is_admin());
    }
}
