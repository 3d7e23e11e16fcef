//! Offer derivation from class and ticket-type rows.
//!
//! Two families share the same shaping rules: names and short descriptions
//! are bounded by [`CatalogConfig::max_text_len`], vendor and currency come
//! from configuration, and links may be overridden per request.

use std::collections::HashSet;

use crate::models::{CatalogConfig, CategoryConfig, ClassRow, CompletePass, Offer, PassRow};
use crate::pipeline::schedule::merge_schedule;
use crate::utils::inflect::{DAYS, GUEST_VISITS, LESSONS};
use crate::utils::{inflect, truncate};

/// Id of the synthetic trial-visit pass.
pub const TRIAL_VISIT_ID: i64 = 1;
/// Id of the synthetic single-visit pass.
pub const SINGLE_VISIT_ID: i64 = 2;
/// First id handed to ticket-type rows.
pub const FIRST_PASS_ID: i64 = 3;

const STUDIO_SEPARATOR: &str = " в студии ";
const FREEZE_SENTENCE: &str = "C возможностью заморозки на месяц.";

/// Link overrides supplied with one feed request.
///
/// Empty strings count as absent so `?passlink=` falls back to the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOverrides {
    pub pass_link: Option<String>,
    pub class_link: Option<String>,
}

impl LinkOverrides {
    pub fn new(pass_link: Option<String>, class_link: Option<String>) -> Self {
        let non_empty = |link: Option<String>| link.filter(|l| !l.trim().is_empty());
        Self {
            pass_link: non_empty(pass_link),
            class_link: non_empty(class_link),
        }
    }
}

/// Builds offers for one request.
pub struct OfferBuilder<'a> {
    catalog: &'a CatalogConfig,
    overrides: &'a LinkOverrides,
}

impl<'a> OfferBuilder<'a> {
    pub fn new(catalog: &'a CatalogConfig, overrides: &'a LinkOverrides) -> Self {
        Self { catalog, overrides }
    }

    /// Classes first, then passes.
    ///
    /// Class ids come straight from the table and may collide with pass ids;
    /// a collision is logged and both offers are kept.
    pub fn build(&self, classes: &[ClassRow], passes: &[PassRow]) -> Vec<Offer> {
        let mut offers = self.class_offers(classes);
        offers.extend(self.pass_offers(passes));
        warn_duplicate_ids(&offers);
        offers
    }

    pub fn class_offers(&self, rows: &[ClassRow]) -> Vec<Offer> {
        rows.iter().map(|row| self.class_offer(row)).collect()
    }

    /// Derive the offer for one class.
    pub fn class_offer(&self, row: &ClassRow) -> Offer {
        let max_len = self.catalog.max_text_len;

        let mut name = row.name.clone();
        if let Some(studio) = non_empty(row.studio_title.as_deref()) {
            name.push_str(STUDIO_SEPARATOR);
            name.push_str(studio);
        }

        let schedule = merge_schedule(row.schedule());
        let marketing =
            non_empty(row.description.as_deref()).or(non_empty(row.style_description.as_deref()));
        let description = [marketing, non_empty(Some(schedule.as_str()))]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("\n");

        // Schedule wins over marketing copy when space is tight.
        let short_description = if description.len() > max_len {
            truncate(&schedule, max_len)
        } else {
            description.clone()
        };

        let category = &self.catalog.class_category;
        Offer {
            id: row.id,
            vendor: self.catalog.company_name.clone(),
            price: row.price.unwrap_or(self.catalog.visit_price),
            currency: self.catalog.currency.clone(),
            category_id: category.id,
            picture: category.picture.clone(),
            url: self.link(category, self.overrides.class_link.as_deref()),
            name: truncate(&name, max_len),
            description,
            short_description,
        }
    }

    /// Trial and single visit, then one offer per complete row.
    ///
    /// Rows are expected in price-ascending order; ids follow that order
    /// starting at [`FIRST_PASS_ID`]. Incomplete rows are skipped and do not
    /// consume an id.
    pub fn pass_offers(&self, rows: &[PassRow]) -> Vec<Offer> {
        let mut offers = Vec::with_capacity(rows.len() + 2);
        offers.extend(self.synthetic_passes());

        let mut skipped = 0usize;
        let mut next_id = FIRST_PASS_ID;
        for row in rows {
            let Some(pass) = row.complete() else {
                skipped += 1;
                continue;
            };
            offers.push(self.pass_offer(next_id, pass));
            next_id += 1;
        }

        if skipped > 0 {
            log::debug!("Skipped {} incomplete pass row(s)", skipped);
        }
        offers
    }

    /// The two passes that exist regardless of ticket-type rows.
    pub fn synthetic_passes(&self) -> [Offer; 2] {
        [
            self.simple_pass(
                TRIAL_VISIT_ID,
                "Первое пробное занятие",
                "Первый урок в любом классе",
                self.catalog.first_visit_price,
            ),
            self.simple_pass(
                SINGLE_VISIT_ID,
                "Разовое занятие",
                "Одно часовое посещение в любом классе",
                self.catalog.visit_price,
            ),
        ]
    }

    /// Derive the offer for one complete ticket type.
    pub fn pass_offer(&self, id: i64, pass: CompletePass<'_>) -> Offer {
        let max_len = self.catalog.max_text_len;

        let mut description = pass.description.to_string();
        if pass.lifetime > 0 {
            description.push_str(&format!(" на {}. ", inflect(pass.lifetime, DAYS)));
        }
        if pass.hours > 0 {
            let guests = if pass.guest_visits > 0 {
                format!(" + {} для друзей", inflect(pass.guest_visits, GUEST_VISITS))
            } else {
                String::new()
            };
            description.push_str(&format!(
                "Включено {}{}. ",
                inflect(pass.hours, LESSONS),
                guests
            ));
        }
        if pass.freeze_allowed {
            description.push_str(FREEZE_SENTENCE);
        }

        let short_description = if description.len() > max_len {
            truncate(pass.description, max_len)
        } else {
            description.clone()
        };

        let mut offer = self.pass_template(id, pass.name, pass.price);
        offer.description = description;
        offer.short_description = short_description;
        offer
    }

    fn simple_pass(&self, id: i64, name: &str, description: &str, price: i64) -> Offer {
        let mut offer = self.pass_template(id, name, price);
        offer.description = description.to_string();
        offer.short_description = truncate(description, self.catalog.max_text_len);
        offer
    }

    fn pass_template(&self, id: i64, name: &str, price: i64) -> Offer {
        let category = &self.catalog.pass_category;
        Offer {
            id,
            vendor: self.catalog.company_name.clone(),
            price,
            currency: self.catalog.currency.clone(),
            category_id: category.id,
            picture: category.picture.clone(),
            url: self.link(category, self.overrides.pass_link.as_deref()),
            name: truncate(name, self.catalog.max_text_len),
            description: String::new(),
            short_description: String::new(),
        }
    }

    fn link(&self, category: &CategoryConfig, override_link: Option<&str>) -> String {
        override_link.unwrap_or(&category.url).to_string()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn warn_duplicate_ids(offers: &[Offer]) {
    let mut seen = HashSet::with_capacity(offers.len());
    for offer in offers {
        if !seen.insert(offer.id) {
            log::warn!("Offer id {} appears more than once in the feed", offer.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CatalogConfig {
        CatalogConfig::default()
    }

    fn monthly_pass() -> PassRow {
        PassRow {
            name: "Месяц безлимит".to_string(),
            description: Some("Безлимитное посещение всех классов".to_string()),
            price: Some(4300),
            lifetime: Some(30),
            hours: Some(16),
            freeze_allowed: Some(1),
            guest_visits: Some(2),
        }
    }

    fn salsa() -> ClassRow {
        ClassRow {
            id: 42,
            name: "Сальса".to_string(),
            description: Some("Зажигательный танец".to_string()),
            mon: Some("19:00:00".to_string()),
            wed: Some("19:00:00".to_string()),
            studio_title: Some("на Красной".to_string()),
            price: Some(600),
            ..ClassRow::default()
        }
    }

    #[test]
    fn test_class_offer() {
        let catalog = catalog();
        let overrides = LinkOverrides::default();
        let offer = OfferBuilder::new(&catalog, &overrides).class_offer(&salsa());

        assert_eq!(offer.id, 42);
        assert_eq!(offer.name, "Сальса в студии на Красной");
        assert_eq!(
            offer.description,
            "Зажигательный танец\nПо понедельникам и средам в 19:00"
        );
        assert_eq!(offer.short_description, offer.description);
        assert_eq!(offer.price, 600);
        assert_eq!(offer.category_id, catalog.class_category.id);
        assert_eq!(offer.url, catalog.class_category.url);
        assert_eq!(offer.vendor, catalog.company_name);
        assert_eq!(offer.currency, "RUR");
    }

    #[test]
    fn test_class_falls_back_to_style_and_visit_price() {
        let catalog = catalog();
        let overrides = LinkOverrides::default();
        let row = ClassRow {
            description: Some(String::new()),
            style_description: Some("Латиноамериканский стиль".to_string()),
            studio_title: None,
            price: None,
            ..salsa()
        };
        let offer = OfferBuilder::new(&catalog, &overrides).class_offer(&row);

        assert_eq!(offer.name, "Сальса");
        assert!(offer.description.starts_with("Латиноамериканский стиль\n"));
        assert_eq!(offer.price, catalog.visit_price);
    }

    #[test]
    fn test_class_without_schedule_or_description() {
        let catalog = catalog();
        let overrides = LinkOverrides::default();
        let row = ClassRow {
            id: 5,
            name: "Контемп".to_string(),
            description: Some(String::new()),
            ..ClassRow::default()
        };
        let offer = OfferBuilder::new(&catalog, &overrides).class_offer(&row);

        assert_eq!(offer.description, "");
        assert_eq!(offer.short_description, "");
    }

    #[test]
    fn test_class_schedule_only_has_no_leading_newline() {
        let catalog = catalog();
        let overrides = LinkOverrides::default();
        let row = ClassRow {
            description: None,
            ..salsa()
        };
        let offer = OfferBuilder::new(&catalog, &overrides).class_offer(&row);
        assert_eq!(offer.description, "По понедельникам и средам в 19:00");
    }

    #[test]
    fn test_long_class_keeps_schedule_in_short_description() {
        let catalog = catalog();
        let overrides = LinkOverrides::default();
        let row = ClassRow {
            description: Some("Очень длинное описание. ".repeat(20)),
            ..salsa()
        };
        let offer = OfferBuilder::new(&catalog, &overrides).class_offer(&row);

        assert!(offer.description.len() > 250);
        assert_eq!(offer.short_description, "По понедельникам и средам в 19:00");
    }

    #[test]
    fn test_long_class_name_truncated() {
        let catalog = catalog();
        let overrides = LinkOverrides::default();
        let row = ClassRow {
            name: "Танец ".repeat(60),
            ..salsa()
        };
        let offer = OfferBuilder::new(&catalog, &overrides).class_offer(&row);

        assert!(offer.name.len() <= 250);
        assert!(offer.name.ends_with("..."));
    }

    #[test]
    fn test_pass_description_phrases() {
        let catalog = catalog();
        let overrides = LinkOverrides::default();
        let offers = OfferBuilder::new(&catalog, &overrides).pass_offers(&[monthly_pass()]);

        let offer = &offers[2];
        assert_eq!(offer.id, FIRST_PASS_ID);
        assert!(offer.description.ends_with(
            "на 30 дней. Включено 16 уроков + 2 гостевых для друзей. C возможностью заморозки на месяц."
        ));
        assert!(offer.description.starts_with("Безлимитное посещение всех классов"));
        assert_eq!(offer.price, 4300);
        assert_eq!(offer.category_id, catalog.pass_category.id);
    }

    #[test]
    fn test_pass_phrases_omitted_when_zero() {
        let catalog = catalog();
        let overrides = LinkOverrides::default();
        let row = PassRow {
            lifetime: Some(0),
            hours: Some(1),
            freeze_allowed: Some(0),
            guest_visits: None,
            ..monthly_pass()
        };
        let offers = OfferBuilder::new(&catalog, &overrides).pass_offers(&[row]);
        assert_eq!(
            offers[2].description,
            "Безлимитное посещение всех классовВключено 1 урок. "
        );
    }

    #[test]
    fn test_synthetic_passes_come_first() {
        let catalog = catalog();
        let overrides = LinkOverrides::default();
        let offers = OfferBuilder::new(&catalog, &overrides).pass_offers(&[]);

        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].id, TRIAL_VISIT_ID);
        assert_eq!(offers[0].price, catalog.first_visit_price);
        assert_eq!(offers[1].id, SINGLE_VISIT_ID);
        assert_eq!(offers[1].price, catalog.visit_price);
        assert_eq!(offers[1].short_description, offers[1].description);
    }

    #[test]
    fn test_incomplete_rows_skipped_without_gaps() {
        let catalog = catalog();
        let overrides = LinkOverrides::default();
        let rows = vec![
            PassRow {
                name: "Пробный".to_string(),
                price: Some(1000),
                ..monthly_pass()
            },
            PassRow {
                hours: None,
                ..monthly_pass()
            },
            PassRow {
                name: "Полгода".to_string(),
                price: Some(20000),
                ..monthly_pass()
            },
        ];
        let offers = OfferBuilder::new(&catalog, &overrides).pass_offers(&rows);

        let ids: Vec<i64> = offers.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(offers[3].name, "Полгода");
    }

    #[test]
    fn test_long_pass_short_description_uses_base_only() {
        let catalog = catalog();
        let overrides = LinkOverrides::default();
        let base = "Абонемент на все направления студии. ".repeat(5);
        let row = PassRow {
            description: Some(base.clone()),
            ..monthly_pass()
        };
        let offers = OfferBuilder::new(&catalog, &overrides).pass_offers(&[row]);

        let offer = &offers[2];
        assert!(offer.description.len() > 250);
        assert!(offer.short_description.len() <= 250);
        assert!(base.starts_with(offer.short_description.trim_end_matches("...")));
        assert!(!offer.short_description.contains("Включено"));
    }

    #[test]
    fn test_overrides_apply_per_family() {
        let catalog = catalog();
        let overrides = LinkOverrides::new(
            Some("https://example.com/passes".to_string()),
            Some(String::new()),
        );
        let offers = OfferBuilder::new(&catalog, &overrides).build(&[salsa()], &[monthly_pass()]);

        assert_eq!(offers[0].url, catalog.class_category.url);
        assert!(
            offers[1..]
                .iter()
                .all(|o| o.url == "https://example.com/passes")
        );
    }

    #[test]
    fn test_build_orders_classes_before_passes() {
        let catalog = catalog();
        let overrides = LinkOverrides::default();
        let offers = OfferBuilder::new(&catalog, &overrides).build(&[salsa()], &[monthly_pass()]);

        let ids: Vec<i64> = offers.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![42, 1, 2, 3]);
    }

    #[test]
    fn test_colliding_class_id_is_kept() {
        let catalog = catalog();
        let overrides = LinkOverrides::default();
        let row = ClassRow {
            id: TRIAL_VISIT_ID,
            ..salsa()
        };
        let offers = OfferBuilder::new(&catalog, &overrides).build(&[row], &[]);

        // Both offers are published; the collision is only logged.
        let ids: Vec<i64> = offers.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![TRIAL_VISIT_ID, TRIAL_VISIT_ID, SINGLE_VISIT_ID]);
        assert_eq!(offers[0].category_id, catalog.class_category.id);
        assert_eq!(offers[1].category_id, catalog.pass_category.id);
    }
}
