//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives a whole crawl:
//! - Walking pages depth-first from the seed, following absolute links until the
//!   remaining depth reaches zero
//! - Claiming every page exactly once
//! - Creating a folder per page, running the image pipeline, removing empty folders
//! - Writing the results file once the walk is over

use crate::config::{validate, Config};
use crate::crawler::fetcher::{ExpectedKind, FetchGate};
use crate::crawler::parser::ParsedPage;
use crate::crawler::pipeline::ImagePipeline;
use crate::output::{CrawlStatistics, ResultRecord, ResultRecorder};
use crate::state::{CrawlState, PageOutcome};
use crate::storage::{folder_name, FsStorage, Storage};
use crate::url::is_well_formed_url;
use crate::ScrapeError;
use std::path::PathBuf;
use std::sync::Arc;

/// What a finished crawl produced
#[derive(Debug)]
pub struct CrawlReport {
    /// One record per downloaded image, in download order
    pub records: Vec<ResultRecord>,

    pub statistics: CrawlStatistics,

    /// Where the records were written
    pub results_path: PathBuf,
}

/// A unit of work on the crawl stack
#[derive(Debug)]
enum Task {
    /// Claim and fetch a page, then schedule its links and its own image step
    Visit {
        url: String,
        depth: u32,
        from_link: bool,
    },

    /// Download the images of an already fetched page
    Finish {
        url: String,
        depth: u32,
        page: ParsedPage,
    },
}

/// Everything that lives for exactly one `execute` call
struct Session {
    state: CrawlState,
    recorder: ResultRecorder,
    stats: CrawlStatistics,
}

/// Main crawler structure
pub struct Crawler {
    config: Arc<Config>,
    gate: FetchGate,
    storage: Box<dyn Storage + Send>,
}

impl Crawler {
    /// Creates a crawler storing images under `config.output.download_dir`
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(ScrapeError)` - Invalid configuration or HTTP client setup failure
    pub fn new(config: Config) -> Result<Self, ScrapeError> {
        let storage = FsStorage::new(&config.output.download_dir);
        Self::with_storage(config, Box::new(storage))
    }

    /// Creates a crawler with a custom storage backend
    pub fn with_storage(
        config: Config,
        storage: Box<dyn Storage + Send>,
    ) -> Result<Self, ScrapeError> {
        validate(&config)?;
        let gate = FetchGate::from_config(&config.http)?;

        Ok(Self {
            config: Arc::new(config),
            gate,
            storage,
        })
    }

    /// Runs a complete crawl from `url` and writes the results file
    ///
    /// `depth` is the number of link hops to follow from the seed; 0 processes only the
    /// seed page itself. A negative depth is rejected before any request is made.
    /// Failures of individual pages or images never fail the crawl.
    pub async fn execute(&mut self, url: &str, depth: i64) -> Result<CrawlReport, ScrapeError> {
        let depth = u32::try_from(depth).map_err(|_| {
            ScrapeError::InvalidInput(format!(
                "depth must be a non-negative integer no larger than {}, got {}",
                u32::MAX,
                depth
            ))
        })?;

        let mut session = Session {
            state: CrawlState::new(&self.config.cache),
            recorder: ResultRecorder::new(),
            stats: CrawlStatistics::new(),
        };

        tracing::info!("Starting crawl from {} with depth {}", url, depth);
        self.crawl(&mut session, url, depth).await;
        session.stats.finish();

        tracing::info!(
            "Crawl completed: {} pages visited, {} images downloaded",
            session.state.visited_count(),
            session.recorder.len()
        );

        let results_path = PathBuf::from(&self.config.output.results_path);
        let records = session.recorder.flush(&results_path)?;

        Ok(CrawlReport {
            records,
            statistics: session.stats,
            results_path,
        })
    }

    /// Walks the link graph from `seed`
    ///
    /// The walk is a pre-order depth-first traversal on an explicit stack. When a page
    /// is fetched, its `Finish` task is pushed below its links, so the page's images are
    /// downloaded only after every linked page (and everything below it) is done.
    async fn crawl(&mut self, session: &mut Session, seed: &str, depth: u32) {
        let mut stack = vec![Task::Visit {
            url: seed.to_string(),
            depth,
            from_link: false,
        }];

        while let Some(task) = stack.pop() {
            match task {
                Task::Visit {
                    url,
                    depth,
                    from_link,
                } => {
                    if from_link && !self.should_follow(session, &url) {
                        continue;
                    }

                    let Some(mut page) = self.visit(session, &url).await else {
                        continue;
                    };

                    let links = if depth > 0 {
                        std::mem::take(&mut page.links)
                    } else {
                        Vec::new()
                    };

                    stack.push(Task::Finish {
                        url,
                        depth,
                        page,
                    });

                    // Reversed so the first link on the page is explored first
                    for link in links.into_iter().rev() {
                        stack.push(Task::Visit {
                            url: link,
                            depth: depth - 1,
                            from_link: true,
                        });
                    }
                }
                Task::Finish { url, depth, page } => {
                    let outcome = self.finish_page(session, &url, depth, &page).await;
                    session.stats.record_page(&outcome);
                }
            }
        }
    }

    /// Decides whether a discovered link is worth a page fetch
    fn should_follow(&self, session: &mut Session, link: &str) -> bool {
        if session.state.negative.invalid_html.contains(link) {
            tracing::debug!(
                "Link: {} was already detected as not valid HTML site, skipping this link",
                link
            );
            session.stats.links_skipped_cached += 1;
            return false;
        }

        if !is_well_formed_url(link) {
            tracing::debug!("Link: {:?} is not an absolute URL, skipping this link", link);
            session.stats.links_skipped_invalid += 1;
            return false;
        }

        true
    }

    /// Claims a page and fetches it
    ///
    /// Returns None if the page was already claimed or the fetch was rejected.
    async fn visit(&mut self, session: &mut Session, url: &str) -> Option<ParsedPage> {
        if !session.state.mark_visited(url) {
            tracing::debug!("Already visited {}", url);
            session.stats.record_page(&PageOutcome::AlreadyVisited);
            return None;
        }

        match self
            .gate
            .fetch(url, ExpectedKind::Page, &mut session.state.negative)
            .await
            .into_page()
        {
            Ok(page) => {
                tracing::info!(
                    "Fetched {} ({} links, {} images)",
                    url,
                    page.links.len(),
                    page.images.len()
                );
                Some(page)
            }
            Err(reason) => {
                session.stats.record_page(&PageOutcome::Rejected(reason));
                None
            }
        }
    }

    /// Downloads the images of a fetched page into its own folder
    async fn finish_page(
        &mut self,
        session: &mut Session,
        url: &str,
        depth: u32,
        page: &ParsedPage,
    ) -> PageOutcome {
        if page.images.is_empty() {
            tracing::info!("Website page {} doesn't have any pictures in it", url);
            return PageOutcome::NoImages;
        }

        let Some(name) = folder_name(url, self.config.naming.max_folder_name_length) else {
            tracing::warn!("Can't derive a folder name from {}, skipping its images", url);
            return PageOutcome::FolderFailed;
        };

        let folder = match self.storage.ensure_dir(&name) {
            Ok(folder) => folder,
            Err(e) => {
                tracing::warn!("Halting image scraping for {}: {}", url, e);
                return PageOutcome::FolderFailed;
            }
        };

        let mut pipeline = ImagePipeline {
            gate: &self.gate,
            storage: &mut *self.storage,
            state: &mut session.state,
            recorder: &mut session.recorder,
            stats: &mut session.stats,
            max_file_name_length: self.config.naming.max_file_name_length,
        };
        let downloaded = pipeline
            .download_images(&page.images, url, depth, &folder)
            .await;

        match self.storage.remove_if_empty(&folder) {
            Ok(true) => {
                session.stats.folders_removed += 1;
                tracing::info!(
                    "Didn't download any photo for {}, deleting folder: {}",
                    url,
                    name
                );
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Could not clean up folder {}: {}", folder.display(), e);
            }
        }

        if downloaded == 0 {
            PageOutcome::NothingDownloaded
        } else {
            tracing::info!("Done downloading {} images from {}", downloaded, url);
            PageOutcome::Downloaded(downloaded)
        }
    }
}

/// Runs a complete crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use sumi_scrape::config::Config;
/// use sumi_scrape::crawler::run_scrape;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_scrape(Config::default(), "http://example.com/", 1).await?;
/// println!("{} images downloaded", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config, url: &str, depth: i64) -> Result<CrawlReport, ScrapeError> {
    let mut crawler = Crawler::new(config)?;
    crawler.execute(url, depth).await
}
