//! Scan log kept in the store, one entry per scan under
//! `scans:{check-in date}:{id}`. Each device with an open scan also has an
//! `open:{device}` entry holding that scan's key, whatever day it began.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use derive_more::{Display, From};
use futures::lock::Mutex;
use uuid::Uuid;

use super::{StorageError, Store};
use crate::model::scan::Scan;
use crate::utils::employee_id::validate_employee_id;

const SCANS_PREFIX: &str = "scans";
const OPEN_PREFIX: &str = "open";

#[derive(Debug, Display, From)]
pub enum ScanError {
    #[display(fmt = "invalid employee id: {}", _0)]
    #[from(ignore)]
    InvalidEmployee(String),
    #[display(fmt = "device {} is already checked in", _0)]
    #[from(ignore)]
    AlreadyCheckedIn(String),
    #[display(fmt = "device {} is not checked in", _0)]
    #[from(ignore)]
    NotCheckedIn(String),
    #[display(fmt = "{}", _0)]
    Storage(StorageError),
}

impl std::error::Error for ScanError {}

fn day_prefix(date: NaiveDate) -> String {
    format!("{}:{}:", SCANS_PREFIX, date.format("%Y-%m-%d"))
}

fn open_key(device: &str) -> String {
    format!("{}:{}", OPEN_PREFIX, device)
}

/// Check-in/check-out flow on top of a [`Store`].
///
/// Check-in and check-out each read then write, so they are serialized
/// through one lock per log.
#[derive(Debug, Clone)]
pub struct ScanLog {
    store: Arc<Store>,
    write_lock: Arc<Mutex<()>>,
}

impl ScanLog {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Entries for `date` as `(key, scan)`, ordered by check-in time.
    async fn entries_on(&self, date: NaiveDate) -> Result<Vec<(String, Scan)>, ScanError> {
        let keys = self.store.get_keys(&day_prefix(date)).await?;

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            // removed between listing and reading
            if let Some(scan) = self.store.get::<Scan>(&key).await? {
                entries.push((key, scan));
            }
        }
        entries.sort_by_key(|(_, scan)| scan.scanned_in);
        Ok(entries)
    }

    pub async fn scans_on(&self, date: NaiveDate) -> Result<Vec<Scan>, ScanError> {
        Ok(self
            .entries_on(date)
            .await?
            .into_iter()
            .map(|(_, scan)| scan)
            .collect())
    }

    /// Key and scan of the device's open scan, if any. An index entry whose
    /// scan is gone or already closed is dropped.
    async fn open_scan(&self, device: &str) -> Result<Option<(String, Scan)>, ScanError> {
        let index = open_key(device);
        let Some(key) = self.store.get::<String>(&index).await? else {
            return Ok(None);
        };

        match self.store.get::<Scan>(&key).await? {
            Some(scan) if scan.is_open() => Ok(Some((key, scan))),
            _ => {
                tracing::warn!(device, key = %key, "dropping stale open-scan entry");
                self.store.remove_item(&index).await?;
                Ok(None)
            }
        }
    }

    pub async fn check_in(
        &self,
        employee: &str,
        device: &str,
        at: NaiveDateTime,
    ) -> Result<Scan, ScanError> {
        if !validate_employee_id(employee) {
            return Err(ScanError::InvalidEmployee(employee.to_string()));
        }

        let _guard = self.write_lock.lock().await;

        if self.open_scan(device).await?.is_some() {
            return Err(ScanError::AlreadyCheckedIn(device.to_string()));
        }

        let scan = Scan::new(employee, device, at);
        let key = format!("{}{}", day_prefix(at.date()), Uuid::new_v4());
        self.store.set(&key, &scan).await?;
        self.store.set(&open_key(device), &key).await?;

        tracing::info!(employee, device, %at, "checked in");
        Ok(scan)
    }

    /// Close the device's open scan, even when it was checked in on an
    /// earlier day.
    pub async fn check_out(&self, device: &str, at: NaiveDateTime) -> Result<Scan, ScanError> {
        let _guard = self.write_lock.lock().await;

        let (key, mut scan) = self
            .open_scan(device)
            .await?
            .ok_or_else(|| ScanError::NotCheckedIn(device.to_string()))?;

        scan.scanned_out = Some(at);
        self.store.set(&key, &scan).await?;
        self.store.remove_item(&open_key(device)).await?;

        tracing::info!(employee = %scan.employee, device, %at, "checked out");
        Ok(scan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .unwrap()
    }

    fn log() -> ScanLog {
        ScanLog::new(Arc::new(Store::in_memory()))
    }

    #[actix_web::test]
    async fn check_in_then_out() {
        let log = log();

        let scan = log.check_in("f881234", "D1", jan(15, 9, 30)).await.unwrap();
        assert!(scan.is_open());

        let closed = log.check_out("D1", jan(15, 17, 0)).await.unwrap();
        assert_eq!(closed.employee, "f881234");
        assert_eq!(closed.scanned_out, Some(jan(15, 17, 0)));

        let day = log.scans_on(jan(15, 0, 0).date()).await.unwrap();
        assert_eq!(day, vec![closed]);
    }

    #[actix_web::test]
    async fn rejects_invalid_employee() {
        let err = log().check_in("x12", "D1", jan(15, 9, 0)).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidEmployee(id) if id == "x12"));
    }

    #[actix_web::test]
    async fn device_cannot_be_checked_in_twice() {
        let log = log();
        log.check_in("f1", "D1", jan(15, 9, 0)).await.unwrap();

        let err = log.check_in("f2", "D1", jan(15, 9, 5)).await.unwrap_err();
        assert!(matches!(err, ScanError::AlreadyCheckedIn(_)));

        log.check_out("D1", jan(15, 10, 0)).await.unwrap();
        log.check_in("f2", "D1", jan(15, 10, 5)).await.unwrap();
        assert_eq!(log.scans_on(jan(15, 0, 0).date()).await.unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn check_out_without_open_scan_fails() {
        let err = log().check_out("D9", jan(15, 9, 0)).await.unwrap_err();
        assert!(matches!(err, ScanError::NotCheckedIn(d) if d == "D9"));
    }

    #[actix_web::test]
    async fn scans_are_grouped_by_day_and_ordered() {
        let log = log();
        log.check_in("f2", "D2", jan(15, 11, 0)).await.unwrap();
        log.check_in("f1", "D1", jan(15, 8, 0)).await.unwrap();
        log.check_in("f3", "D3", jan(16, 8, 0)).await.unwrap();

        let day = log.scans_on(jan(15, 0, 0).date()).await.unwrap();
        let devices: Vec<_> = day.iter().map(|s| s.device.as_str()).collect();
        assert_eq!(devices, ["D1", "D2"]);
    }

    #[actix_web::test]
    async fn overnight_scan_checks_out_next_day() {
        let log = log();
        log.check_in("f1", "D1", jan(15, 23, 50)).await.unwrap();

        let err = log.check_in("f2", "D1", jan(16, 0, 10)).await.unwrap_err();
        assert!(matches!(err, ScanError::AlreadyCheckedIn(_)));

        let closed = log.check_out("D1", jan(16, 0, 10)).await.unwrap();
        assert_eq!(closed.employee, "f1");
        assert_eq!(closed.scanned_out, Some(jan(16, 0, 10)));

        // listed under the check-in day
        let day = log.scans_on(jan(15, 0, 0).date()).await.unwrap();
        assert_eq!(day, vec![closed]);
        assert!(log.scans_on(jan(16, 0, 0).date()).await.unwrap().is_empty());

        log.check_in("f2", "D1", jan(16, 0, 20)).await.unwrap();
    }

    #[actix_web::test]
    async fn stale_open_entry_does_not_block_check_in() {
        let log = log();
        log.store().set("open:D1", &"scans:2024-01-14:gone").await.unwrap();

        log.check_in("f1", "D1", jan(15, 8, 0)).await.unwrap();
        let closed = log.check_out("D1", jan(15, 9, 0)).await.unwrap();
        assert_eq!(closed.scanned_in, jan(15, 8, 0));
    }

    #[actix_web::test]
    async fn closed_store_surfaces_storage_error() {
        let log = log();
        log.store().close().await;

        let err = log.check_in("f1", "D1", jan(15, 8, 0)).await.unwrap_err();
        assert!(matches!(err, ScanError::Storage(StorageError::Closed)));
    }
}
