//! Usage statistics service.

use std::sync::Arc;

use crate::domain::entities::ShortLink;
use crate::domain::store::LinkStore;
use crate::error::AppError;

/// How many links the leaderboard reports.
const TOP_LINKS_LIMIT: i64 = 5;

/// Aggregated usage numbers for the whole instance.
#[derive(Debug, Clone)]
pub struct StatsOverview {
    /// Total number of stored links.
    pub total_links: i64,
    /// Sum of access counts across all links.
    pub total_accesses: i64,
    /// Most accessed links, busiest first.
    pub top: Vec<ShortLink>,
}

/// Service producing aggregate statistics over the link store.
pub struct StatsService {
    store: Arc<dyn LinkStore>,
}

impl StatsService {
    /// Creates a new stats service.
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }

    /// Collects the current usage overview.
    ///
    /// The three aggregates are independent queries issued concurrently.
    /// They are not a consistent snapshot: traffic arriving mid-collection
    /// may show up in one number and not another.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if any of the queries fails.
    pub async fn overview(&self) -> Result<StatsOverview, AppError> {
        let (total_links, total_accesses, top) = tokio::try_join!(
            self.store.count(),
            self.store.sum_access(),
            self.store.top_accessed(TOP_LINKS_LIMIT),
        )?;

        Ok(StatsOverview {
            total_links,
            total_accesses,
            top,
        })
    }
}
