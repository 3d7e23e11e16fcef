//! One feed export: fetch, build, version, assemble.

use crate::error::Result;
use crate::models::CatalogConfig;
use crate::pipeline::feed::{FeedHeader, render_feed};
use crate::pipeline::offers::{LinkOverrides, OfferBuilder};
use crate::pipeline::version::{CatalogVersioner, Publication};
use crate::source::CatalogSource;

/// Summary of an export run.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    /// Complete XML document
    pub body: String,
    pub class_count: usize,
    pub offer_count: usize,
    pub publication: Publication,
}

/// Produce the feed for one request.
///
/// A fetch error fails the whole export; no partial feed is rendered. The
/// versioner lock is taken only after every offer is built.
pub async fn run_export(
    catalog: &CatalogConfig,
    source: &dyn CatalogSource,
    versioner: &CatalogVersioner,
    overrides: &LinkOverrides,
) -> Result<ExportOutcome> {
    let (classes, passes) = tokio::try_join!(source.fetch_classes(), source.fetch_passes())?;

    let builder = OfferBuilder::new(catalog, overrides);
    let offers = builder.build(&classes, &passes);
    let publication = versioner.observe(&offers);

    let date = publication.date();
    let categories = catalog.categories();
    let header = FeedHeader {
        shop_name: &catalog.shop_name,
        company_name: &catalog.company_name,
        date: &date,
        categories: &categories,
    };
    let body = render_feed(&header, &offers)?;

    log::debug!(
        "Exported {} offers ({} classes), version {}",
        offers.len(),
        classes.len(),
        date
    );

    Ok(ExportOutcome {
        body,
        class_count: classes.len(),
        offer_count: offers.len(),
        publication,
    })
}
