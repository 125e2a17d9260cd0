use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, Error as SqlError, ErrorCode, Row, params};

use crate::models::{JournalEntry, NewWrite, Receipt, TxStatus};

/// Local record of the transactions this client submitted, so a write that
/// is still in flight when the process exits can be settled later.
pub struct Journal {
    conn: Connection,
}

const ENTRY_COLUMNS: &str =
    "id, action, tx_hash, sender, value_wei, status, block_number, created_at";

impl Journal {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("ジャーナルを開けませんでした: path={path}"))?;
        let journal = Self { conn };
        journal.init_schema()?;
        Ok(journal)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS writes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                action TEXT NOT NULL,
                tx_hash TEXT NOT NULL UNIQUE,
                sender TEXT,
                value_wei TEXT NOT NULL DEFAULT '0',
                status TEXT NOT NULL DEFAULT 'waiting',
                block_number INTEGER,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                settled_at TEXT
            );
            ",
        )?;
        Ok(())
    }

    pub fn record_submitted(&self, write: &NewWrite) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO writes(action, tx_hash, sender, value_wei) VALUES(?1, ?2, ?3, ?4)",
                params![
                    write.action,
                    write.tx_hash.to_string(),
                    write.sender.map(|s| s.to_checksum(None)),
                    write.value.to_string(),
                ],
            )
            .map_err(map_unique_err)?;
        Ok(())
    }

    pub fn mark_settled(&self, receipt: &Receipt) -> Result<()> {
        let tx_hash = receipt.tx_hash.to_string();
        let updated = self.conn.execute(
            "
            UPDATE writes
            SET status = ?2, block_number = ?3, settled_at = CURRENT_TIMESTAMP
            WHERE tx_hash = ?1
            ",
            params![
                tx_hash,
                TxStatus::from(receipt).as_str(),
                receipt.block_number.map(|b| b as i64),
            ],
        )?;
        if updated == 0 {
            return Err(anyhow!("ジャーナルに存在しないTxです: {tx_hash}"));
        }
        Ok(())
    }

    pub fn waiting(&self) -> Result<Vec<JournalEntry>> {
        self.select(
            &format!("SELECT {ENTRY_COLUMNS} FROM writes WHERE status = 'waiting' ORDER BY id ASC"),
            [],
        )
    }

    pub fn recent(&self, limit: u32) -> Result<Vec<JournalEntry>> {
        self.select(
            &format!("SELECT {ENTRY_COLUMNS} FROM writes ORDER BY id DESC LIMIT ?1"),
            params![limit],
        )
    }

    fn select<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<JournalEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, read_entry)?;

        let mut entries = Vec::new();
        for row in rows {
            let (entry, status) = row?;
            entries.push(JournalEntry {
                status: status.parse()?,
                ..entry
            });
        }
        Ok(entries)
    }
}

fn read_entry(row: &Row<'_>) -> rusqlite::Result<(JournalEntry, String)> {
    let entry = JournalEntry {
        id: row.get(0)?,
        action: row.get(1)?,
        tx_hash: row.get(2)?,
        sender: row.get(3)?,
        value_wei: row.get(4)?,
        status: TxStatus::Waiting,
        block_number: row.get(6)?,
        created_at: row.get(7)?,
    };
    Ok((entry, row.get(5)?))
}

fn map_unique_err(err: SqlError) -> anyhow::Error {
    match err {
        SqlError::SqliteFailure(code, _) if code.code == ErrorCode::ConstraintViolation => {
            anyhow!("このTxは既にジャーナルに記録されています")
        }
        other => anyhow!(other),
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, U256, keccak256};
    use tempfile::NamedTempFile;

    use super::*;

    fn open_temp() -> (NamedTempFile, Journal) {
        let file = NamedTempFile::new().expect("tmp file");
        let journal = Journal::open(file.path().to_str().expect("path string")).expect("open");
        (file, journal)
    }

    fn write(seed: &[u8]) -> NewWrite {
        NewWrite {
            action: "buy-coffee".to_string(),
            tx_hash: keccak256(seed),
            sender: Some(Address::repeat_byte(0xbb)),
            value: U256::from(5_000_000_000_000_000u64),
        }
    }

    #[test]
    fn duplicate_hash_is_detected() {
        let (_file, journal) = open_temp();
        let tip = write(b"tx-1");

        journal.record_submitted(&tip).expect("first insert");
        assert!(journal.record_submitted(&tip).is_err());
        assert_eq!(journal.recent(10).expect("recent").len(), 1);
    }

    #[test]
    fn settled_entries_leave_the_waiting_list() {
        let (_file, journal) = open_temp();
        let first = write(b"tx-1");
        let second = write(b"tx-2");
        journal.record_submitted(&first).expect("insert");
        journal.record_submitted(&second).expect("insert");

        journal
            .mark_settled(&Receipt {
                tx_hash: first.tx_hash,
                success: false,
                block_number: Some(42),
            })
            .expect("settle");

        let waiting = journal.waiting().expect("waiting");
        assert_eq!(waiting.len(), 1);
        assert_eq!(waiting[0].tx_hash, second.tx_hash.to_string());

        let recent = journal.recent(10).expect("recent");
        assert_eq!(recent[1].status, TxStatus::Reverted);
        assert_eq!(recent[1].block_number, Some(42));
        assert_eq!(recent[1].value_wei, "5000000000000000");
    }

    #[test]
    fn settling_unknown_hash_fails() {
        let (_file, journal) = open_temp();
        let result = journal.mark_settled(&Receipt {
            tx_hash: keccak256(b"missing"),
            success: true,
            block_number: None,
        });
        assert!(result.is_err());
    }
}
