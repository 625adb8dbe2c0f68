//! DTOs for the usage statistics endpoint.

use serde::Serialize;

use crate::application::services::StatsOverview;
use crate::domain::entities::ShortLink;

/// Aggregated service statistics.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Total number of shortened URLs.
    pub total_urls: i64,
    /// Total redirects served across all links.
    pub total_clicks: i64,
    /// Most visited links, busiest first.
    pub top_urls: Vec<TopUrlItem>,
    /// Which instance answered, for load-balanced deployments.
    pub instance_id: String,
}

/// One entry of the most-visited leaderboard.
#[derive(Debug, Serialize)]
pub struct TopUrlItem {
    pub short_code: String,
    pub long_url: String,
    pub access_count: i64,
}

impl From<ShortLink> for TopUrlItem {
    fn from(link: ShortLink) -> Self {
        Self {
            short_code: link.code,
            long_url: link.long_url,
            access_count: link.access_count,
        }
    }
}

impl StatsResponse {
    /// Builds the response from a collected overview.
    pub fn from_overview(overview: StatsOverview, instance_id: String) -> Self {
        Self {
            total_urls: overview.total_links,
            total_clicks: overview.total_accesses,
            top_urls: overview.top.into_iter().map(TopUrlItem::from).collect(),
            instance_id,
        }
    }
}
