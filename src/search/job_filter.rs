//! Heuristics for job-search mode.
//!
//! Keeps pages where a company recruits directly and drops job boards,
//! staffing agencies, blog platforms and listicles. All rules are data tables
//! below; every function is pure.

use regex::RegexSet;
use serde::Serialize;
use std::sync::LazyLock;

use super::SearchResult;

/// Job boards, staffing agencies, aggregators and blog platforms
const JOB_SITE_BLOCKLIST: &[&str] = &[
    // Job boards
    "indeed.com",
    "indeed.jp",
    "rikunabi.com",
    "mynavi.jp",
    "doda.jp",
    "doda.com",
    "en-japan.com",
    "type.jp",
    "bizreach.jp",
    "bizreach.com",
    "pasona.co.jp",
    "recruit.co.jp",
    "recruitagent.co.jp",
    "careerconnection.jp",
    "workport.co.jp",
    "careercross.com",
    "daijob.com",
    "jobs.jp",
    "jinzai-bank.com",
    "jaic-g.com",
    "uzuz.jp",
    "jac-recruitment.jp",
    "randstad.co.jp",
    "persol-career.co.jp",
    "rs-lab.jp",
    "r-agent.com",
    "miidas.jp",
    "openwork.jp",
    "vorkers.com",
    "wantedly.com",
    "green-japan.com",
    // Blog platforms and portals
    "note.com",
    "note.mu",
    "hatenablog.com",
    "hatena.ne.jp",
    "qiita.com",
    "zenn.dev",
    "medium.com",
    "ameblo.jp",
    "fc2.com",
    "livedoor.jp",
    "yahoo.co.jp",
    "goo.ne.jp",
    // Temp staffing and part-time
    "baitoru.com",
    "townwork.net",
    "hatalike.jp",
    "jinzaibank.com",
    "staffservice.co.jp",
];

/// URL shapes of a company's own hiring pages
const DIRECT_HIRING_URL_PATTERNS: &[&str] = &[
    r"(?i)/recruit",
    r"(?i)/careers?",
    r"(?i)/jobs?",
    r"/採用",
    r"(?i)/employment",
    r"(?i)/join",
    r"/人材募集",
    r"/新卒採用",
    r"/中途採用",
    r"/キャリア",
    r"(?i)hiring",
];

/// URL shapes of blog posts and news articles
const BLOG_ARTICLE_URL_PATTERNS: &[&str] = &[
    r"(?i)/blog/",
    r"(?i)/article/",
    r"(?i)/post/",
    r"(?i)/entry/",
    r"(?i)/news/",
    r"(?i)/column/",
    r"(?i)/media/",
    r"(?i)/magazine/",
    r"まとめ",
];

/// Listicle / roundup vocabulary in titles and snippets
const SUMMARY_KEYWORDS: &[&str] = &["まとめ", "選", "比較", "ランキング", "一覧", "おすすめ"];

/// Vocabulary of job postings in titles and descriptions
const JOB_KEYWORDS: &[&str] = &[
    "採用",
    "募集",
    "キャリア",
    "求人",
    "新卒",
    "中途",
    "career",
    "recruit",
    "hiring",
    "job opening",
    "employment",
];

static DIRECT_HIRING_URLS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(DIRECT_HIRING_URL_PATTERNS).expect("direct hiring patterns are valid")
});

static BLOG_ARTICLE_URLS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(BLOG_ARTICLE_URL_PATTERNS).expect("blog article patterns are valid")
});

/// What the heuristics concluded about one result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobClassification {
    pub is_job_posting: bool,
    pub has_structured_data: bool,
    pub is_direct_hiring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

impl JobClassification {
    /// Higher is more clearly a direct job posting
    pub fn relevance_score(&self) -> u32 {
        let mut score = 0;
        if self.has_structured_data {
            score += 10;
        }
        if self.is_direct_hiring {
            score += 5;
        }
        if self.is_job_posting {
            score += 3;
        }
        score
    }
}

/// A result that survived job filtering, with its classification
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    #[serde(flatten)]
    pub result: SearchResult,
    pub job_info: JobClassification,
}

pub fn is_job_site_domain(display_link: &str) -> bool {
    let domain = display_link.to_lowercase();
    JOB_SITE_BLOCKLIST
        .iter()
        .any(|blocked| domain.contains(blocked))
}

pub fn is_direct_hiring_url(url: &str) -> bool {
    DIRECT_HIRING_URLS.is_match(url)
}

pub fn is_blog_or_article(url: &str, title: &str, snippet: &str) -> bool {
    if BLOG_ARTICLE_URLS.is_match(url) {
        return true;
    }

    let title = title.to_lowercase();
    let snippet = snippet.to_lowercase();
    SUMMARY_KEYWORDS
        .iter()
        .any(|keyword| title.contains(keyword) || snippet.contains(keyword))
}

/// Page metadata marks the page as a job posting (`og:type` or keywords).
pub fn has_job_metadata(result: &SearchResult) -> bool {
    let Some(meta) = &result.meta else {
        return false;
    };

    let og_type = meta.og_type.as_deref().unwrap_or("").to_lowercase();
    let description = non_empty(meta.og_description.as_deref())
        .or(non_empty(meta.description.as_deref()))
        .unwrap_or("")
        .to_lowercase();
    let title = meta
        .og_title
        .as_deref()
        .unwrap_or(&result.title)
        .to_lowercase();

    og_type.contains("job")
        || JOB_KEYWORDS
            .iter()
            .any(|keyword| title.contains(keyword) || description.contains(keyword))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn classify(result: &SearchResult) -> JobClassification {
    let has_structured_data = has_job_metadata(result);
    let is_direct_hiring = is_direct_hiring_url(&result.url);

    JobClassification {
        is_job_posting: has_structured_data || is_direct_hiring,
        has_structured_data,
        is_direct_hiring,
        company_name: is_direct_hiring
            .then(|| company_name(&result.display_link))
            .flatten(),
    }
}

/// First label of the host, skipping a leading `www.`
fn company_name(display_link: &str) -> Option<String> {
    let host = display_link.trim().to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    host.split('.')
        .next()
        .filter(|label| !label.is_empty())
        .map(str::to_string)
}

/// Keep only direct hiring pages, dropping job sites and articles.
pub fn filter_job_results(results: Vec<SearchResult>) -> Vec<JobResult> {
    results
        .into_iter()
        .filter_map(|result| {
            if is_job_site_domain(&result.display_link) {
                tracing::debug!(domain = %result.display_link, "job filter: excluded job site");
                return None;
            }

            if is_blog_or_article(&result.url, &result.title, &result.snippet) {
                tracing::debug!(url = %result.url, "job filter: excluded blog or article");
                return None;
            }

            let job_info = classify(&result);
            if !job_info.is_job_posting {
                tracing::debug!(url = %result.url, "job filter: excluded, not a job posting");
                return None;
            }

            tracing::debug!(url = %result.url, "job filter: kept");
            Some(JobResult { result, job_info })
        })
        .collect()
}

/// Stable sort, most relevant first
pub fn sort_by_job_relevance(results: &mut [JobResult]) {
    results.sort_by_key(|r| std::cmp::Reverse(r.job_info.relevance_score()));
}
