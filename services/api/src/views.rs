use district_score::scoring::{
    round_display, CategoryKey, MetricComparison, RankedEntry, RankedList,
};
use district_score::table::IndicatorTable;
use serde::Serialize;

pub(crate) const NORMALIZED_UNIT: &str = "normalized score (higher is better)";

#[derive(Debug, Serialize)]
pub(crate) struct RecommendResponse {
    pub(crate) result: RankedList,
}

/// One ranked district with display rounding and pass-through coordinates.
#[derive(Debug, Serialize)]
pub(crate) struct RankedItem {
    pub(crate) rank: usize,
    pub(crate) name: String,
    pub(crate) score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) longitude: Option<f64>,
}

impl RankedItem {
    pub(crate) fn from_entry(table: &IndicatorTable, entry: RankedEntry) -> Self {
        let district = table.district(&entry.district);
        Self {
            rank: entry.rank,
            score: round_display(entry.score),
            latitude: district.and_then(|district| district.latitude),
            longitude: district.and_then(|district| district.longitude),
            name: entry.district,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TopicResponse {
    pub(crate) title: &'static str,
    pub(crate) unit: &'static str,
    pub(crate) category: CategoryKey,
    pub(crate) items: Vec<RankedItem>,
}

impl TopicResponse {
    pub(crate) fn new(
        table: &IndicatorTable,
        category: CategoryKey,
        unit: &'static str,
        ranked: RankedList,
    ) -> Self {
        Self {
            title: category.category().title,
            unit,
            category,
            items: ranked
                .into_iter()
                .map(|entry| RankedItem::from_entry(table, entry))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FriendlyItem {
    #[serde(flatten)]
    pub(crate) item: RankedItem,
    pub(crate) metric_data: Vec<MetricComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) info: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FriendlyResponse {
    pub(crate) title: &'static str,
    pub(crate) unit: &'static str,
    pub(crate) items: Vec<FriendlyItem>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SummaryResponse {
    pub(crate) district: String,
    pub(crate) category: CategoryKey,
    pub(crate) summary: String,
}
