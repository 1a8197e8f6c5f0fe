use serde::Serialize;
use std::collections::HashMap;

use super::SearchResult;

/// Daily units the API serves for free
pub const FREE_QUERIES_PER_DAY: u64 = 100;

/// Price per paid query in USD ($5 per 1000)
pub const COST_PER_QUERY_USD: f64 = 0.005;

/// How many results in a ranking came from one domain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainShare {
    pub domain: String,
    pub count: usize,
    /// Share of all results, e.g. `"25.0%"`
    pub percentage: String,
}

/// Count results per domain, most frequent first (ties by name).
pub fn analyze_domains(results: &[SearchResult]) -> Vec<DomainShare> {
    if results.is_empty() {
        return Vec::new();
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for result in results {
        *counts.entry(domain_of(result)).or_default() += 1;
    }

    let mut shares: Vec<DomainShare> = counts
        .into_iter()
        .map(|(domain, count)| DomainShare {
            percentage: format!("{:.1}%", count as f64 / results.len() as f64 * 100.0),
            domain,
            count,
        })
        .collect();

    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.domain.cmp(&b.domain)));
    shares
}

/// Domain for grouping: the engine's display link, or the URL host.
fn domain_of(result: &SearchResult) -> String {
    if !result.display_link.is_empty() {
        return result.display_link.to_lowercase();
    }

    let without_scheme = result
        .url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(&result.url);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("");
    let host = host.rsplit_once('@').map(|(_, h)| h).unwrap_or(host);
    let host = host.split(':').next().unwrap_or(host);

    if host.is_empty() {
        "unknown".to_string()
    } else {
        host.to_lowercase()
    }
}

/// Cost of running `queries` API queries in one day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub total_queries: u64,
    pub free_queries: u64,
    pub paid_queries: u64,
    pub estimated_cost: String,
    /// Same daily volume over 30 days
    pub monthly_cost: String,
}

pub fn estimate_cost(queries: u64) -> CostEstimate {
    let free_queries = queries.min(FREE_QUERIES_PER_DAY);
    let paid_queries = queries - free_queries;
    let cost = paid_queries as f64 * COST_PER_QUERY_USD;

    CostEstimate {
        total_queries: queries,
        free_queries,
        paid_queries,
        estimated_cost: format!("${:.2}", cost),
        monthly_cost: format!("${:.2}", cost * 30.0),
    }
}
