//! Content-addressed catalog versioning.
//!
//! The feed's `date` attribute tells the aggregator when the catalog last
//! changed. It moves only when the fingerprint of the offer set moves, so
//! polling an unchanged catalog never looks like an update.

use std::fmt::Write as _;
use std::sync::Mutex;

use chrono::{DateTime, FixedOffset, Local};
use sha2::{Digest, Sha256};

use crate::models::Offer;

/// Minute resolution with the UTC offset, e.g. `2026-10-16T14:05+03:00`.
pub const PUBLISHED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M%:z";

/// SHA-256 over the offers' visible fields, hex encoded.
///
/// Offers are ordered by id first, so the same content in a different order
/// yields the same fingerprint.
pub fn fingerprint(offers: &[Offer]) -> String {
    let mut sorted: Vec<&Offer> = offers.iter().collect();
    sorted.sort_by_key(|offer| offer.id);

    let mut hasher = Sha256::new();
    let mut line = String::new();
    for offer in sorted {
        line.clear();
        // Writing into a String cannot fail.
        let _ = write!(
            line,
            "{}|{}|{}|{}|{}|{}|{}|{}|",
            offer.id,
            offer.name,
            offer.description,
            offer.vendor,
            offer.price,
            offer.category_id,
            offer.currency,
            offer.url,
        );
        if !offer.short_description.is_empty() {
            let _ = write!(line, "{}|", offer.short_description);
        }
        hasher.update(line.as_bytes());
    }

    hex::encode(hasher.finalize())
}

/// The process-wide catalog version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogVersion {
    /// No feed has been produced since startup.
    #[default]
    Unversioned,
    Versioned {
        hash: String,
        published_at: DateTime<FixedOffset>,
    },
}

/// The version a single feed response carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Publication {
    pub published_at: DateTime<FixedOffset>,
    /// Whether this request moved the version
    pub changed: bool,
}

impl Publication {
    /// The `date` attribute value.
    pub fn date(&self) -> String {
        self.published_at.format(PUBLISHED_AT_FORMAT).to_string()
    }
}

/// Owns the current [`CatalogVersion`] behind one lock.
///
/// Compare and update happen in a single critical section, so two concurrent
/// requests with the same content can never publish two timestamps.
#[derive(Debug, Default)]
pub struct CatalogVersioner {
    state: Mutex<CatalogVersion>,
}

impl CatalogVersioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current version.
    pub fn current(&self) -> CatalogVersion {
        self.lock().clone()
    }

    /// Fingerprint `offers` and publish at the local time if they changed.
    pub fn observe(&self, offers: &[Offer]) -> Publication {
        self.publish(fingerprint(offers), Local::now().fixed_offset())
    }

    /// Record `hash` as current, stamping `now` only if it differs from the stored hash.
    pub fn publish(&self, hash: String, now: DateTime<FixedOffset>) -> Publication {
        let mut state = self.lock();
        if let CatalogVersion::Versioned {
            hash: current,
            published_at,
        } = &*state
        {
            if *current == hash {
                return Publication {
                    published_at: *published_at,
                    changed: false,
                };
            }
        }

        log::info!(
            "Catalog version updated: {} ({})",
            now.format(PUBLISHED_AT_FORMAT),
            &hash[..hash.len().min(12)]
        );
        *state = CatalogVersion::Versioned {
            hash,
            published_at: now,
        };
        Publication {
            published_at: now,
            changed: true,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CatalogVersion> {
        // The state is replaced wholesale, so a poisoned guard still holds a consistent value.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
