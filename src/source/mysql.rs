//! MySQL catalog source.

use async_trait::async_trait;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

use crate::error::Result;
use crate::models::{ClassRow, DatabaseConfig, PassRow};
use crate::source::CatalogSource;

/// Integer columns are cast to SIGNED and time columns to CHAR so every row
/// decodes into the plain `Option` fields of [`ClassRow`]; time parsing is
/// left to the schedule merger.
const CLASSES_QUERY: &str = r#"
SELECT
    CAST(c.id AS SIGNED) AS id,
    c.string AS name,
    c.description AS description,
    (
        SELECT st.description
        FROM styles_classes AS sc
        JOIN styles AS st ON st.id = sc.style_id
        WHERE sc.class_id = c.id
        ORDER BY sc.id DESC, st.id DESC
        LIMIT 1
    ) AS style_description,
    CAST(c.mon AS CHAR) AS mon,
    CAST(c.tue AS CHAR) AS tue,
    CAST(c.wed AS CHAR) AS wed,
    CAST(c.thu AS CHAR) AS thu,
    CAST(c.fri AS CHAR) AS fri,
    CAST(c.sat AS CHAR) AS sat,
    CAST(c.sun AS CHAR) AS sun,
    s.studio_title AS studio_title,
    CAST(c.price_rate AS SIGNED) AS price
FROM classes AS c
JOIN studios AS s ON c.studio_id = s.id
WHERE c.hidden IS NULL
  AND c.deleted IS NULL
  AND c.string IS NOT NULL
  AND (c.start_date IS NULL OR c.start_date <= NOW())
  AND (c.end_date IS NULL OR c.end_date >= NOW())
ORDER BY c.id
"#;

/// `default_periods` counts half-hour units; two make one lesson.
const PASSES_QUERY: &str = r#"
SELECT
    t.ticket_type_name AS name,
    t.description AS description,
    CAST(t.default_price AS SIGNED) AS price,
    CAST(t.default_period AS SIGNED) AS lifetime,
    CAST(t.default_periods / 2 AS SIGNED) AS hours,
    CAST(t.default_frosts AS SIGNED) AS freeze_allowed,
    CAST(t.default_guests AS SIGNED) AS guest_visits
FROM ticket_types AS t
WHERE t.ticket_type_active = 1
  AND t.description IS NOT NULL
ORDER BY t.default_price ASC
"#;

/// Catalog source backed by the studio's MySQL database.
#[derive(Clone)]
pub struct MySqlSource {
    pool: MySqlPool,
}

impl MySqlSource {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Open a pool and check the connection once.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options())
            .await?;
        log::info!(
            "Connected to MySQL at {}:{}/{}",
            config.host,
            config.port,
            config.name
        );
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CatalogSource for MySqlSource {
    async fn fetch_classes(&self) -> Result<Vec<ClassRow>> {
        let rows = sqlx::query_as::<_, ClassRow>(CLASSES_QUERY)
            .fetch_all(&self.pool)
            .await?;
        log::debug!("Fetched {} class row(s)", rows.len());
        Ok(rows)
    }

    async fn fetch_passes(&self) -> Result<Vec<PassRow>> {
        let rows = sqlx::query_as::<_, PassRow>(PASSES_QUERY)
            .fetch_all(&self.pool)
            .await?;
        log::debug!("Fetched {} pass row(s)", rows.len());
        Ok(rows)
    }
}
