//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Validating configuration and opening the output document
//! - Managing the breadth-first frontier
//! - Coordinating fetching, extraction, and link admission
//! - Enforcing guardrails and handling Ctrl-C
//! - Finalizing the document and building the run report

use crate::config::{resolve_output_path, validate, Config};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{CrawlTarget, Frontier};
use crate::crawler::guardrail::{GuardrailState, StopReason};
use crate::crawler::parser::{check_content_type, Extractor};
use crate::output::{open_document, CrawlReport, DocumentWriter, OutputError, PageRecord, RunStatus, Section};
use crate::state::{CrawlPhase, PageStatus};
use crate::url::{normalize_url, UrlScope};
use crate::{ConfigError, ScribeError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use url::Url;

/// Pages between progress log lines
const PROGRESS_INTERVAL: u32 = 10;

/// Shared flag asking a running crawl to stop
///
/// The crawl loop checks it once per iteration, before picking the next
/// page, so the page in flight is always finished first.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the crawl to stop at the next loop iteration
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Spawns a task that sets this signal on Ctrl-C
    pub fn listen_for_ctrl_c(&self) -> JoinHandle<()> {
        let signal = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Ctrl-C received, stopping after the current page");
                    signal.request();
                }
                Err(e) => tracing::warn!("Failed to listen for Ctrl-C: {}", e),
            }
        })
    }
}

/// All mutable state of one crawl run
#[derive(Debug)]
struct CrawlState {
    frontier: Frontier,
    guardrails: GuardrailState,
    pages: Vec<PageRecord>,
}

/// Main crawler structure
pub struct Crawler {
    seed: Url,
    scope: UrlScope,
    include_subdomains: bool,
    fetcher: Fetcher,
    extractor: Extractor,
    document: Box<dyn DocumentWriter + Send>,
    output_path: PathBuf,
    phase: CrawlPhase,
    shutdown: ShutdownSignal,
    state: CrawlState,
}

impl Crawler {
    /// Creates a new crawler with the seed admitted at depth 0
    ///
    /// The configuration is validated and the output document is created
    /// here, before any network access, so a bad configuration or an
    /// unwritable output path never costs a request.
    ///
    /// # Arguments
    ///
    /// * `config` - The final (merged) configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run, in the `Idle` phase
    /// * `Err(ScribeError)` - Invalid configuration or unwritable output
    pub fn new(config: Config) -> Result<Self, ScribeError> {
        validate(&config)?;

        let seed = normalize_url(&config.crawler.start_url)?;
        let scope = UrlScope::from_seed(&seed, config.crawler.include_subdomains)?;
        let guardrails = GuardrailState::from_config(&config.crawler);
        let fetcher = Fetcher::from_config(&config, guardrails.delay)?;
        let extractor = Extractor::new(scope.clone());

        let output_path = resolve_output_path(&config);
        let document = open_document(&output_path, config.output.format, seed.as_str())
            .map_err(|e| unwritable_output(&output_path, e))?;

        let mut frontier = Frontier::new(config.crawler.max_depth);
        frontier.admit(CrawlTarget::seed(seed.clone()));

        tracing::debug!(
            "Crawler ready: seed {}, scope {}, output {}",
            seed,
            scope.pattern(),
            output_path.display()
        );

        Ok(Self {
            seed,
            scope,
            include_subdomains: config.crawler.include_subdomains,
            fetcher,
            extractor,
            document,
            output_path,
            phase: CrawlPhase::Idle,
            shutdown: ShutdownSignal::new(),
            state: CrawlState {
                frontier,
                guardrails,
                pages: Vec::new(),
            },
        })
    }

    /// Replaces the crawler's shutdown signal with a shared one
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// A handle that stops this crawler when requested
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Runs the crawl to completion
    ///
    /// This method:
    /// 1. Checks for a shutdown request
    /// 2. Checks the guardrails
    /// 3. Pops the next target and fetches it
    /// 4. Extracts text and links
    /// 5. Appends the section and records the visit
    /// 6. Admits the discovered links
    ///
    /// Aborts (cancellation, unreachable seed, output failure) are reported
    /// through the returned report's status. An `Err` means the crawler was
    /// not in a runnable phase.
    pub async fn run(&mut self) -> Result<CrawlReport, ScribeError> {
        self.transition(CrawlPhase::Running)?;
        self.state.guardrails.started_at = Instant::now();

        tracing::info!(
            "Starting crawl of {} (max {} pages, depth {})",
            self.seed,
            self.state.guardrails.max_pages,
            self.state.frontier.max_depth()
        );

        let mut status = loop {
            if self.shutdown.is_requested() {
                break self.abort(ScribeError::Cancelled);
            }

            if let Some(reason) = self
                .state
                .guardrails
                .should_stop(self.state.frontier.is_empty())
            {
                tracing::info!("Stopping crawl: {}", reason);
                break RunStatus::Done(reason);
            }

            let Some(target) = self.state.frontier.pop_next() else {
                break RunStatus::Done(StopReason::FrontierExhausted);
            };

            if let Err(error) = self.visit(&target).await {
                break self.abort(error);
            }

            let visited = self.state.guardrails.pages_visited;
            if visited % PROGRESS_INTERVAL == 0 {
                let elapsed = self.state.guardrails.elapsed();
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier, {} sections written, {:.1}s elapsed",
                    visited,
                    self.state.frontier.len(),
                    self.document.sections_written(),
                    elapsed.as_secs_f64()
                );
            }
        };

        if let Err(error) = self.document.finalize(&status) {
            let error = ScribeError::Output(error);
            if status.is_done() {
                status = self.abort(error);
            } else {
                tracing::error!("{}", error);
            }
        }
        self.transition(status.phase())?;

        let report = CrawlReport {
            status,
            pages_visited: self.state.guardrails.pages_visited,
            sections_written: self.document.sections_written(),
            pages: std::mem::take(&mut self.state.pages),
            elapsed: self.state.guardrails.elapsed(),
            output_path: self.output_path.clone(),
        };

        tracing::info!("{}", report.summary_line());
        Ok(report)
    }

    /// Visits one target: fetch, extract, append, admit
    ///
    /// Per-page failures are recorded and swallowed; only an unreachable
    /// seed or an output failure is returned as an error.
    async fn visit(&mut self, target: &CrawlTarget) -> Result<(), ScribeError> {
        tracing::info!("Crawling {} (depth {})", target.url, target.depth);

        let fetched = self.fetcher.fetch(&target.url).await;
        self.state.frontier.mark_visited(&target.url);
        self.state.guardrails.record_visit();

        let page = match fetched {
            Ok(page) => page,
            Err(error) => {
                tracing::warn!("Skipping {}: {}", target.url, error);
                self.record(target, PageStatus::FetchError(error.clone()));
                if target.is_seed() {
                    return Err(ScribeError::SeedUnreachable {
                        url: target.url.to_string(),
                        source: error,
                    });
                }
                return Ok(());
            }
        };

        let Some(base_url) = self.follow_redirect(target, &page.final_url) else {
            tracing::warn!(
                "Skipping {}: redirected to {}",
                target.url,
                page.final_url
            );
            self.record(target, PageStatus::Redirected(page.final_url.to_string()));
            return Ok(());
        };

        let extracted = check_content_type(page.content_type.as_deref())
            .and_then(|()| self.extractor.extract(&page.body, &base_url));

        let (section, links, status) = match extracted {
            Ok(parsed) => (
                Section {
                    url: target.url.to_string(),
                    page_title: parsed.title,
                    depth: target.depth,
                    text: parsed.text,
                },
                parsed.links,
                PageStatus::Ok,
            ),
            Err(error) => {
                tracing::warn!("No text extracted from {}: {}", target.url, error);
                (
                    Section {
                        url: target.url.to_string(),
                        page_title: None,
                        depth: target.depth,
                        text: String::new(),
                    },
                    Vec::new(),
                    PageStatus::ExtractError(error),
                )
            }
        };

        self.document.append_section(&section)?;
        self.record(target, status);

        let mut admitted = 0;
        for link in links {
            if self.state.frontier.admit(target.child(link)) {
                admitted += 1;
            }
        }
        if admitted > 0 {
            tracing::debug!("Admitted {} new links from {}", admitted, target.url);
        }

        Ok(())
    }

    /// Decides which URL a fetched page's links resolve against
    ///
    /// Returns `None` when the response came from outside the scope or from
    /// a page already visited under its own URL. A seed that redirects to
    /// another host (`example.com` to `www.example.com`) moves the scope to
    /// where it landed.
    fn follow_redirect(&mut self, target: &CrawlTarget, final_url: &Url) -> Option<Url> {
        if *final_url == target.url {
            return Some(target.url.clone());
        }

        let landed = normalize_url(final_url.as_str()).ok()?;
        if landed == target.url {
            return Some(landed);
        }

        if target.is_seed() && !self.scope.contains(&landed) {
            self.rescope(&landed);
        }

        if let Err(e) = self.scope.check(&landed) {
            tracing::debug!("Redirect from {} rejected: {}", target.url, e);
            return None;
        }

        if self.state.frontier.is_visited(&landed) {
            tracing::debug!("Redirect from {} lands on visited {}", target.url, landed);
            return None;
        }

        self.state.frontier.mark_visited(&landed);
        Some(landed)
    }

    /// Re-anchors the crawl scope on the URL the seed redirected to
    fn rescope(&mut self, landed: &Url) {
        match UrlScope::from_seed(landed, self.include_subdomains) {
            Ok(scope) => {
                tracing::info!(
                    "Start URL redirected to {}, crawl scope is now {}",
                    landed,
                    scope.pattern()
                );
                self.extractor = Extractor::new(scope.clone());
                self.scope = scope;
            }
            Err(e) => tracing::debug!("Cannot scope crawl on {}: {}", landed, e),
        }
    }

    fn record(&mut self, target: &CrawlTarget, status: PageStatus) {
        self.state.pages.push(PageRecord {
            url: target.url.to_string(),
            depth: target.depth,
            status,
        });
    }

    fn abort(&self, error: ScribeError) -> RunStatus {
        tracing::error!("Aborting crawl: {}", error);
        RunStatus::Aborted(error.to_string())
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), ScribeError> {
        if !self.phase.can_transition_to(next) {
            return Err(ScribeError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

fn unwritable_output(path: &Path, error: OutputError) -> ScribeError {
    match error {
        OutputError::Io(source) => ScribeError::Config(ConfigError::UnwritableOutput {
            path: path.display().to_string(),
            source,
        }),
        other => ScribeError::Output(other),
    }
}
