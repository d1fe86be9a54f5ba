//! Stealth browser strategy.
//!
//! Drives headless Chrome configured to minimise bot-detection signals and
//! walks an ordered list of likely staff-directory paths under the target's
//! base URL. The browser library is blocking, so every navigation runs under
//! `spawn_blocking`; the human-like dwell between navigation and content
//! extraction happens inside that blocking section.
//!
//! One browser process is reused across targets within a batch. Every
//! navigation opens a fresh tab that is closed on success and failure paths
//! alike via a drop guard.

use std::ffi::OsStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions, Tab};

use crate::error::ScrapeError;
use crate::extract::extract_staff_records;
use crate::pacing::Pacer;
use crate::retry::retry_with_backoff;
use crate::strategy::StrategyYield;
use crate::types::{AcquisitionMethod, RawContent, Target};

/// Candidate staff-directory paths, tried in order relative to the target's
/// base URL. The empty path (the base URL itself) comes last.
const STAFF_PATHS: &[&str] = &[
    "/staff-directory",
    "/coaches",
    "/coaching-staff",
    "/staff",
    "/athletics/staff",
    "/athletics/coaches",
    "/about/staff",
    "",
];

/// Heuristic DOM signal that a staff/roster listing has rendered. Waiting
/// for it is bounded and non-fatal: some directories render without any of
/// these containers.
const STAFF_SIGNAL_SELECTOR: &str = "table, .staff, .roster, .coaches, .directory";
const SIGNAL_WAIT_SECS: u64 = 3;

pub struct StealthScraper {
    user_agent: String,
    nav_timeout: Duration,
    max_retries: u32,
    backoff_base_ms: u64,
    pacer: Pacer,
    browser: Arc<Mutex<Option<Browser>>>,
}

impl StealthScraper {
    #[must_use]
    pub fn new(
        user_agent: &str,
        nav_timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        pacer: Pacer,
    ) -> Self {
        Self {
            user_agent: user_agent.to_owned(),
            nav_timeout: Duration::from_secs(nav_timeout_secs),
            max_retries,
            backoff_base_ms,
            pacer,
            browser: Arc::new(Mutex::new(None)),
        }
    }

    /// Walk the candidate staff paths and return the first one that yields at
    /// least one staff record.
    ///
    /// Each navigation is retried with back-off before moving to the next
    /// path.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::AllPathsExhausted`] carrying the last error
    /// when no path produces records.
    pub async fn extract_staff(&self, target: &Target) -> Result<StrategyYield, ScrapeError> {
        let mut last_error: Option<String> = None;

        for path in STAFF_PATHS {
            let url = join_staff_url(&target.base_url, path);
            tracing::debug!(target = %target.slug, url = %url, "stealth navigation attempt");

            let fetched = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
                self.fetch_page(url.clone())
            })
            .await;

            match fetched {
                Ok(text) if !text.trim().is_empty() => {
                    let content = RawContent {
                        source_url: url.clone(),
                        text,
                        method: AcquisitionMethod::StealthBrowser,
                    };
                    let records = extract_staff_records(&content);
                    if !records.is_empty() {
                        tracing::info!(
                            target = %target.slug,
                            url = %url,
                            count = records.len(),
                            "stealth extraction succeeded"
                        );
                        return Ok(StrategyYield {
                            records,
                            source_url: url,
                        });
                    }
                    tracing::debug!(url = %url, "page loaded but no staff records extracted");
                    last_error = Some(format!("no staff records extracted from {url}"));
                }
                Ok(_) => {
                    last_error = Some(format!("empty content at {url}"));
                }
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "navigation failed after retries");
                    last_error = Some(e.to_string());
                }
            }

            // Politeness pause before the next candidate path.
            self.pacer.pause().await;
        }

        Err(ScrapeError::AllPathsExhausted {
            base_url: target.base_url.clone(),
            last_error: last_error
                .unwrap_or_else(|| "no candidate paths attempted".to_owned()),
        })
    }

    async fn fetch_page(&self, url: String) -> Result<String, ScrapeError> {
        let slot = Arc::clone(&self.browser);
        let user_agent = self.user_agent.clone();
        let nav_timeout = self.nav_timeout;
        let dwell = self.pacer.next_delay();

        tokio::task::spawn_blocking(move || {
            fetch_page_blocking(&slot, &url, &user_agent, nav_timeout, dwell)
        })
        .await
        .map_err(|e| ScrapeError::Browser(format!("blocking task panicked: {e}")))?
    }
}

/// A tab that closes itself on every exit path.
struct TabGuard(Arc<Tab>);

impl Drop for TabGuard {
    fn drop(&mut self) {
        let _ = self.0.close(true);
    }
}

fn fetch_page_blocking(
    slot: &Mutex<Option<Browser>>,
    url: &str,
    user_agent: &str,
    nav_timeout: Duration,
    dwell: Duration,
) -> Result<String, ScrapeError> {
    let browser = acquire_browser(slot)?;

    let tab = match browser.new_tab() {
        Ok(tab) => TabGuard(tab),
        Err(e) => {
            // The browser process likely died; drop the shared handle so the
            // next attempt relaunches.
            if let Ok(mut guard) = slot.lock() {
                *guard = None;
            }
            return Err(ScrapeError::Browser(format!("could not open tab: {e}")));
        }
    };

    tab.0.set_default_timeout(nav_timeout);
    tab.0
        .set_user_agent(user_agent, Some("en-US,en;q=0.9"), Some("Linux x86_64"))
        .map_err(|e| ScrapeError::Browser(format!("could not set user agent: {e}")))?;

    tab.0
        .navigate_to(url)
        .map_err(|e| ScrapeError::Navigation {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
    tab.0
        .wait_until_navigated()
        .map_err(|e| ScrapeError::Navigation {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

    // Bounded, non-fatal wait for a staff/roster container.
    let _ = tab
        .0
        .wait_for_element_with_custom_timeout(
            STAFF_SIGNAL_SELECTOR,
            Duration::from_secs(SIGNAL_WAIT_SECS),
        );

    // Human-like dwell between navigation and content extraction.
    if !dwell.is_zero() {
        std::thread::sleep(dwell);
    }

    let html = tab
        .0
        .get_content()
        .map_err(|e| ScrapeError::Browser(format!("could not read page content: {e}")))?;

    Ok(html_to_text(&html))
}

fn acquire_browser(slot: &Mutex<Option<Browser>>) -> Result<Browser, ScrapeError> {
    let mut guard = slot
        .lock()
        .map_err(|_| ScrapeError::Browser("browser mutex poisoned".to_owned()))?;
    if let Some(browser) = guard.as_ref() {
        return Ok(browser.clone());
    }
    let browser = launch_browser()?;
    *guard = Some(browser.clone());
    Ok(browser)
}

fn launch_browser() -> Result<Browser, ScrapeError> {
    let options = LaunchOptions::default_builder()
        .headless(true)
        .window_size(Some((1920, 1080)))
        .args(vec![
            OsStr::new("--disable-blink-features=AutomationControlled"),
            OsStr::new("--disable-infobars"),
            OsStr::new("--no-first-run"),
            OsStr::new("--lang=en-US"),
        ])
        // Keep the process alive across inter-target pauses.
        .idle_browser_timeout(Duration::from_secs(300))
        .build()
        .map_err(|e| ScrapeError::Browser(format!("invalid launch options: {e}")))?;

    Browser::new(options).map_err(|e| ScrapeError::Browser(format!("could not launch browser: {e}")))
}

fn join_staff_url(base_url: &str, path: &str) -> String {
    if path.is_empty() {
        base_url.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), path)
    }
}

// ---------------------------------------------------------------------------
// HTML flattening
// ---------------------------------------------------------------------------

/// Flatten rendered HTML into the line/pipe text structure the extraction
/// cascade expects: table rows become `| cell | cell |` lines, block
/// elements become line breaks, scripts and styles disappear.
fn html_to_text(html: &str) -> String {
    let html = strip_tag_blocks(html, "script");
    let html = strip_tag_blocks(&html, "style");

    let mut out = String::with_capacity(html.len() / 2);
    let mut rest = html.as_str();

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let after = &rest[lt + 1..];
        let Some(gt) = after.find('>') else {
            rest = "";
            break;
        };
        let tag = after[..gt].trim().to_ascii_lowercase();
        let closing = tag.starts_with('/');
        let name = tag
            .trim_start_matches('/')
            .split([' ', '\t', '\n', '/'])
            .next()
            .unwrap_or("");

        if closing {
            match name {
                "td" | "th" => out.push_str(" |"),
                "tr" | "p" | "div" | "li" | "ul" | "ol" | "table" | "section" | "article"
                | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => out.push('\n'),
                _ => {}
            }
        } else {
            match name {
                "tr" => out.push_str("\n|"),
                "td" | "th" => out.push(' '),
                "br" => out.push('\n'),
                "li" => out.push_str("\n- "),
                _ => {}
            }
        }
        rest = &after[gt + 1..];
    }
    out.push_str(rest);

    collapse_blank_lines(&decode_entities(&out))
}

/// Remove `<tag …>…</tag>` blocks wholesale. Case-insensitive on ASCII tag
/// names; byte offsets stay valid because `to_ascii_lowercase` preserves
/// length.
fn strip_tag_blocks(html: &str, tag: &str) -> String {
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let lower = html.to_ascii_lowercase();

    let mut out = String::with_capacity(html.len());
    let mut idx = 0;
    while let Some(start_rel) = lower[idx..].find(&open) {
        let start = idx + start_rel;
        out.push_str(&html[idx..start]);
        let Some(end_rel) = lower[start..].find(&close) else {
            return out;
        };
        let end = start + end_rel;
        let Some(gt_rel) = lower[end..].find('>') else {
            return out;
        };
        idx = end + gt_rel + 1;
    }
    out.push_str(&html[idx..]);
    out
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&ndash;", "–")
        .replace("&mdash;", "—")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;
    for line in text.lines() {
        let trimmed = line.trim_end();
        if trimmed.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
            out.push('\n');
        } else {
            blank_run = 0;
            out.push_str(trimmed);
            out.push('\n');
        }
    }
    out
}
