//! Feed pipeline stages.
//!
//! - `schedule`: weekday slots to a schedule sentence
//! - `offers`: rows to offers
//! - `version`: content fingerprint and publish date
//! - `feed`: offers to the YML document
//! - `export`: the stages above, run once per request

pub mod export;
pub mod feed;
pub mod offers;
pub mod schedule;
pub mod version;

pub use export::{ExportOutcome, run_export};
pub use feed::{FeedHeader, XML_HEADER, render_feed};
pub use offers::{LinkOverrides, OfferBuilder};
pub use schedule::merge_schedule;
pub use version::{CatalogVersion, CatalogVersioner, Publication, fingerprint};
