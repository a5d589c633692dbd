//! End-to-end crawl tests
//!
//! Each test mounts pages and images on one or more mock servers, runs a crawl into a
//! temporary directory and checks the folders, files and results it left behind.

use std::path::PathBuf;
use sumi_scrape::config::{Config, OutputConfig};
use sumi_scrape::crawler::Crawler;
use sumi_scrape::storage::folder_name;
use sumi_scrape::ResultRecord;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Temporary directories for one crawl: images in `downloads`, results next to it
struct Workspace {
    _root: TempDir,
    downloads: PathBuf,
    results: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let downloads = root.path().join("downloads");
        let results = root.path().join("results.json");
        Self {
            _root: root,
            downloads,
            results,
        }
    }

    fn config(&self) -> Config {
        Config {
            output: OutputConfig {
                results_path: self.results.to_string_lossy().into_owned(),
                download_dir: self.downloads.to_string_lossy().into_owned(),
            },
            ..Config::default()
        }
    }

    fn folder_for(&self, page_url: &str) -> PathBuf {
        self.downloads
            .join(folder_name(page_url, 100).expect("Page URL should give a folder name"))
    }

    fn folders(&self) -> Vec<String> {
        match std::fs::read_dir(&self.downloads) {
            Ok(entries) => {
                let mut names: Vec<String> = entries
                    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                    .collect();
                names.sort();
                names
            }
            Err(_) => Vec::new(),
        }
    }

    fn written_results(&self) -> Vec<ResultRecord> {
        let content = std::fs::read_to_string(&self.results).expect("results.json missing");
        serde_json::from_str(&content).expect("results.json is not valid JSON")
    }

    async fn crawl(&self, url: &str, depth: i64) -> sumi_scrape::CrawlReport {
        let mut crawler = Crawler::new(self.config()).expect("Failed to create crawler");
        crawler.execute(url, depth).await.expect("Crawl failed")
    }
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_raw(
            format!(
                "<html><head><title>Test</title></head><body>{}</body></html>",
                body
            ),
            "text/html; charset=utf-8",
        )
}

fn png(bytes: &[u8]) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(bytes.to_vec())
        .insert_header("content-type", "image/png")
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

fn assert_records_on_disk(records: &[ResultRecord]) {
    for record in records {
        assert!(
            record.stored_at.is_file(),
            "Missing file {} for {}",
            record.stored_at.display(),
            record.image_url
        );
    }
}

#[tokio::test]
async fn test_single_image_and_dead_link() {
    let site_a = MockServer::start().await;
    let site_b = MockServer::start().await;
    let seed = format!("{}/", site_a.uri());
    let link_b = format!("{}/", site_b.uri());

    mount(
        &site_a,
        "/",
        html_page(&format!(
            r#"<img src="/x.png" alt="cat"><a href="{}">B</a>"#,
            link_b
        )),
        1,
    )
    .await;
    mount(&site_a, "/x.png", png(b"cat-bytes"), 1).await;
    mount(&site_b, "/", ResponseTemplate::new(404), 1).await;

    let ws = Workspace::new();
    let report = ws.crawl(&seed, 1).await;

    let folder_a = ws.folder_for(&seed);
    assert_eq!(
        std::fs::read(folder_a.join("cat.jpeg")).unwrap(),
        b"cat-bytes"
    );
    assert_eq!(ws.folders(), vec![folder_name(&seed, 100).unwrap()]);
    assert!(!ws.folder_for(&link_b).exists());

    let written = ws.written_results();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].source_url, seed);
    assert_eq!(written[0].image_url, format!("{}/x.png", site_a.uri()));
    assert_eq!(written[0].depth, 1);

    let raw = std::fs::read_to_string(&ws.results).unwrap();
    assert!(raw.contains("\"sourceURL\""));
    assert!(raw.contains("\"imageURL\""));
    assert!(raw.contains("\"depth\""));

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.statistics.count_for("http_error"), 1);
    assert_records_on_disk(&report.records);
}

#[tokio::test]
async fn test_depth_limit_stops_link_following() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/a", html_page(&format!(r#"<a href="{}/b">B</a>"#, base)), 1).await;
    mount(&server, "/b", html_page(&format!(r#"<a href="{}/c">C</a>"#, base)), 1).await;
    mount(&server, "/c", html_page("leaf"), 0).await;

    let ws = Workspace::new();
    let report = ws.crawl(&format!("{}/a", base), 1).await;

    assert!(report.records.is_empty());
    assert_eq!(report.statistics.count_for("no_images"), 2);
    assert!(ws.folders().is_empty());
    assert!(ws.written_results().is_empty());
}

#[tokio::test]
async fn test_depth_zero_downloads_seed_images_only() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/",
        html_page(&format!(
            r#"<img src="/seed.png" alt="seed"><a href="{}/next">next</a>"#,
            base
        )),
        1,
    )
    .await;
    mount(&server, "/seed.png", png(b"seed"), 1).await;
    mount(&server, "/next", html_page(r#"<img src="/next.png">"#), 0).await;
    mount(&server, "/next.png", png(b"next"), 0).await;

    let ws = Workspace::new();
    let seed = format!("{}/", base);
    let report = ws.crawl(&seed, 0).await;

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].depth, 0);
    assert!(ws.folder_for(&seed).join("seed.jpeg").is_file());
}

#[tokio::test]
async fn test_cycles_fetch_each_page_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    // a -> a, a -> b, b -> a, b -> b
    mount(
        &server,
        "/a",
        html_page(&format!(
            r#"<a href="{base}/a">self</a><a href="{base}/b">b</a>"#,
            base = base
        )),
        1,
    )
    .await;
    mount(
        &server,
        "/b",
        html_page(&format!(
            r#"<a href="{base}/a">a</a><a href="{base}/b">self</a>"#,
            base = base
        )),
        1,
    )
    .await;

    let ws = Workspace::new();
    let report = ws.crawl(&format!("{}/a", base), 10).await;

    assert_eq!(report.statistics.pages_processed(), 2);
    assert_eq!(report.statistics.count_for("already_visited"), 3);
}

#[tokio::test]
async fn test_converging_paths_fetch_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Two routes to /shared: directly from the seed and via /middle
    mount(
        &server,
        "/",
        html_page(&format!(
            r#"<a href="{base}/middle">m</a><a href="{base}/shared">s</a>"#,
            base = base
        )),
        1,
    )
    .await;
    mount(
        &server,
        "/middle",
        html_page(&format!(r#"<a href="{}/shared">s</a>"#, base)),
        1,
    )
    .await;
    mount(
        &server,
        "/shared",
        html_page(&format!(r#"<img src="{}/shared.png" alt="shared">"#, base)),
        1,
    )
    .await;
    mount(&server, "/shared.png", png(b"shared"), 1).await;

    let ws = Workspace::new();
    let report = ws.crawl(&format!("{}/", base), 2).await;

    assert_eq!(report.records.len(), 1);
    // Reached first through /middle, one hop deeper than the direct link
    assert_eq!(report.records[0].depth, 0);
}

#[tokio::test]
async fn test_linked_pages_finish_before_parent_images() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/parent",
        html_page(&format!(
            r#"<img src="{base}/parent.png" alt="parent">
               <a href="{base}/first">1</a>
               <a href="{base}/second">2</a>"#,
            base = base
        )),
        1,
    )
    .await;
    mount(
        &server,
        "/first",
        html_page(&format!(r#"<img src="{}/first.png" alt="first">"#, base)),
        1,
    )
    .await;
    mount(
        &server,
        "/second",
        html_page(&format!(r#"<img src="{}/second.png" alt="second">"#, base)),
        1,
    )
    .await;
    mount(&server, "/parent.png", png(b"p"), 1).await;
    mount(&server, "/first.png", png(b"1"), 1).await;
    mount(&server, "/second.png", png(b"2"), 1).await;

    let ws = Workspace::new();
    let report = ws.crawl(&format!("{}/parent", base), 1).await;

    let order: Vec<String> = report
        .records
        .iter()
        .map(|r| r.image_url.trim_start_matches(&base).to_string())
        .collect();
    assert_eq!(order, vec!["/first.png", "/second.png", "/parent.png"]);

    let written: Vec<(String, u32)> = ws
        .written_results()
        .into_iter()
        .map(|r| (r.image_url, r.depth))
        .collect();
    let reported: Vec<(String, u32)> = report
        .records
        .iter()
        .map(|r| (r.image_url.clone(), r.depth))
        .collect();
    assert_eq!(written, reported);
    assert_eq!(written[2].1, 1);
    assert_eq!(written[0].1, 0);
    assert_records_on_disk(&report.records);
}

#[tokio::test]
async fn test_non_image_url_fetched_once_across_pages() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/",
        html_page(&format!(
            r#"<img src="/banner" alt="banner"><img src="/logo.png" alt="logo">
               <a href="{}/other">other</a>"#,
            base
        )),
        1,
    )
    .await;
    mount(
        &server,
        "/other",
        html_page(&format!(r#"<img src="{}/banner" alt="banner">"#, base)),
        1,
    )
    .await;
    mount(&server, "/banner", html_page("not an image"), 1).await;
    mount(&server, "/logo.png", png(b"logo"), 1).await;

    let ws = Workspace::new();
    let seed = format!("{}/", base);
    let report = ws.crawl(&seed, 1).await;

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.statistics.images_skipped_cached, 1);
    assert_eq!(
        report.statistics.images_rejected.get("wrong_content_type"),
        Some(&1)
    );
    // The page whose only image was not an image leaves no folder behind
    assert!(!ws.folder_for(&format!("{}/other", base)).exists());
    assert!(ws.folder_for(&seed).join("logo.jpeg").is_file());
}

#[tokio::test]
async fn test_non_html_link_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/",
        html_page(&format!(
            r#"<a href="{base}/doc.pdf">pdf</a><a href="{base}/next">next</a><a href="{base}/doc.pdf">again</a>"#,
            base = base
        )),
        1,
    )
    .await;
    mount(
        &server,
        "/next",
        html_page(&format!(r#"<a href="{}/doc.pdf">pdf</a>"#, base)),
        1,
    )
    .await;
    mount(
        &server,
        "/doc.pdf",
        ResponseTemplate::new(200)
            .set_body_bytes(b"%PDF-1.4".to_vec())
            .insert_header("content-type", "application/pdf"),
        1,
    )
    .await;

    let ws = Workspace::new();
    let report = ws.crawl(&format!("{}/", base), 2).await;

    assert_eq!(report.statistics.count_for("wrong_content_type"), 1);
    assert_eq!(report.statistics.links_skipped_cached, 2);
}

#[tokio::test]
async fn test_all_images_failing_leaves_no_folder() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/gallery",
        html_page(r#"<img src="gone.png" alt="gone"><img src="/moved.png" alt="moved"><img src="">"#),
        1,
    )
    .await;
    // Relative sources are joined onto the page URL as written
    mount(&server, "/gallery/gone.png", ResponseTemplate::new(404), 1).await;
    mount(
        &server,
        "/gallery/moved.png",
        ResponseTemplate::new(302).insert_header("location", format!("{}/elsewhere.png", base).as_str()),
        1,
    )
    .await;
    mount(&server, "/elsewhere.png", png(b"never"), 0).await;

    let ws = Workspace::new();
    let page = format!("{}/gallery", base);
    let report = ws.crawl(&page, 0).await;

    assert!(report.records.is_empty());
    assert_eq!(report.statistics.count_for("nothing_downloaded"), 1);
    assert_eq!(report.statistics.folders_removed, 1);
    assert!(!ws.folder_for(&page).exists());
    assert!(ws.written_results().is_empty());
}

#[tokio::test]
async fn test_redirected_seed_not_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/",
        ResponseTemplate::new(301).insert_header("location", format!("{}/landing", base).as_str()),
        1,
    )
    .await;
    mount(&server, "/landing", html_page(r#"<img src="/x.png">"#), 0).await;

    let ws = Workspace::new();
    let report = ws.crawl(&format!("{}/", base), 2).await;

    assert!(report.records.is_empty());
    assert_eq!(report.statistics.count_for("redirected"), 1);
    assert!(ws.written_results().is_empty());
}

#[tokio::test]
async fn test_relative_links_not_followed() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/",
        html_page(r#"<a href="/relative">rel</a><a href="mailto:a@b.test">mail</a>"#),
        1,
    )
    .await;
    mount(&server, "/relative", html_page("never"), 0).await;

    let ws = Workspace::new();
    let report = ws.crawl(&format!("{}/", server.uri()), 3).await;

    assert_eq!(report.statistics.links_skipped_invalid, 2);
    assert_eq!(report.statistics.pages_processed(), 1);
}

#[tokio::test]
async fn test_folder_conflict_skips_only_that_page() {
    let server = MockServer::start().await;
    let base = server.uri();
    let seed = format!("{}/", base);
    let child = format!("{}/child", base);

    mount(
        &server,
        "/",
        html_page(&format!(r#"<img src="/seed.png" alt="seed"><a href="{}">c</a>"#, child)),
        1,
    )
    .await;
    mount(
        &server,
        "/child",
        html_page(&format!(r#"<img src="{}/child.png" alt="child">"#, base)),
        1,
    )
    .await;
    mount(&server, "/seed.png", png(b"seed"), 0).await;
    mount(&server, "/child.png", png(b"child"), 1).await;

    let ws = Workspace::new();
    std::fs::create_dir_all(&ws.downloads).unwrap();
    std::fs::write(ws.folder_for(&seed), b"a file where the folder should go").unwrap();

    let report = ws.crawl(&seed, 1).await;

    assert_eq!(report.statistics.count_for("folder_failed"), 1);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].source_url, child);
    assert!(ws.folder_for(&child).join("child.jpeg").is_file());
    assert!(ws.folder_for(&seed).is_file());
}

#[tokio::test]
async fn test_existing_folder_is_reused() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount(&server, "/", html_page(r#"<img src="/x.png" alt="x">"#), 2).await;
    mount(&server, "/x.png", png(b"x"), 2).await;

    let ws = Workspace::new();
    let first = ws.crawl(&seed, 0).await;
    let second = ws.crawl(&seed, 0).await;

    assert_eq!(first.records.len(), 1);
    assert_eq!(second.records.len(), 1);
    assert!(ws.folder_for(&seed).join("x.jpeg").is_file());
    assert_eq!(ws.written_results().len(), 1);
}

#[tokio::test]
async fn test_negative_depth_makes_no_requests() {
    let server = MockServer::start().await;
    mount(&server, "/", html_page("never"), 0).await;

    let ws = Workspace::new();
    let mut crawler = Crawler::new(ws.config()).unwrap();
    let result = crawler.execute(&format!("{}/", server.uri()), -3).await;

    assert!(result.is_err());
    assert!(!ws.results.exists());
}
