//! End-to-end runs over temporary project trees.
//!
//! Crawl pages come from a JSON fixture, PDFs go through a scripted extractor
//! so no real PDF files are needed.

use std::path::Path;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use docprep::{
    ConversionRun, DocprepConfig, Error, PdfExtractor, RawPdfExtract, RepairSweep, Result,
};

/// Returns canned text keyed by file name
struct ScriptedExtractor;

impl PdfExtractor for ScriptedExtractor {
    fn extract(&self, filename: &str, _data: &[u8]) -> Result<RawPdfExtract> {
        let body = match filename {
            "hyrox_rulebook-en.pdf" => long_body('p', "\n\n1\n\nPage 2 of 9\n\n"),
            "tiny.pdf" => "Cover page only.".to_string(),
            _ => return Err(Error::file_parse(filename, "unreadable xref table")),
        };
        Ok(RawPdfExtract {
            body,
            page_count: 9,
            source_filename: filename.to_string(),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Seven 998-char paragraphs: too long for one 3000-char section
fn long_body(c: char, separator: &str) -> String {
    let paragraph: String = std::iter::repeat(c).take(998).collect();
    vec![paragraph; 7].join(separator)
}

fn setup(root: &Path) -> DocprepConfig {
    let config = DocprepConfig::default().with_root(root);
    std::fs::create_dir_all(&config.paths.crawl_input_dir).unwrap();
    std::fs::create_dir_all(&config.paths.pdf_input_dir).unwrap();
    config
}

fn write_crawl(config: &DocprepConfig, name: &str, pages: serde_json::Value) {
    let body = serde_json::json!({ "success": true, "data": pages });
    std::fs::write(config.paths.crawl_input_dir.join(name), body.to_string()).unwrap();
}

fn record_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn crawl_run_uses_latest_file_and_splits_long_pages() {
    let root = tempfile::tempdir().unwrap();
    let config = setup(root.path());

    write_crawl(
        &config,
        "hyrox-crawl-2024-01-01T00-00-00-000Z.json",
        serde_json::json!([{ "markdown": "Old crawl content that should never be read at all.",
                             "metadata": { "sourceURL": "https://hyrox.com/old/" } }]),
    );
    write_crawl(
        &config,
        "hyrox-crawl-2024-06-01T00-00-00-000Z.json",
        serde_json::json!([
            { "markdown": long_body('r', "\n\n"),
              "metadata": { "sourceURL": "https://hyrox.com/rules/", "title": "Race Rules",
                            "publishedTime": "2024-05-30T10:00:00Z" } },
            { "markdown": "Tiny.",
              "metadata": { "url": "https://hyrox.com/tiny/" } },
            { "markdown": "We use cookies and similar technologies.\n\nEssential\nMarketing\n\n## Divisions\n\nSingles, doubles and relay divisions are available.",
              "metadata": { "url": "https://hyrox.com/divisions/" } }
        ]),
    );

    let at = Utc.with_ymd_and_hms(2024, 6, 2, 8, 0, 0).unwrap();
    let summary = ConversionRun::at(&config, at).convert_crawl().await.unwrap();

    assert_eq!(summary.sources_seen, 3);
    assert_eq!(summary.sources_converted, 2);
    assert_eq!(summary.sources_skipped, 1);
    assert_eq!(summary.records_written, 4);
    assert!(!summary.has_failures());

    let out = &config.paths.crawl_output_dir;
    assert_eq!(
        record_names(out),
        vec![
            "hyrox-divisions.mdx",
            "hyrox-rules-part-1.mdx",
            "hyrox-rules-part-2.mdx",
            "hyrox-rules-part-3.mdx",
        ]
    );

    let part = std::fs::read_to_string(out.join("hyrox-rules-part-2.mdx")).unwrap();
    assert!(part.contains("# Race Rules - Part 2 of 3"));
    assert!(part.contains("\"totalParts\": 3"));
    assert!(part.contains("\"publishedDate\": \"2024-05-30T10:00:00Z\""));
    assert!(part.ends_with("*Crawled on: 2024-06-02*\n"));

    let divisions = std::fs::read_to_string(out.join("hyrox-divisions.mdx")).unwrap();
    assert!(divisions.contains("## Divisions"));
    assert!(!divisions.contains("cookies"));
    assert!(divisions.contains("# Hyrox Page 3"));
}

#[tokio::test]
async fn rerun_overwrites_instead_of_duplicating() {
    let root = tempfile::tempdir().unwrap();
    let config = setup(root.path());
    write_crawl(
        &config,
        "crawl.json",
        serde_json::json!([{ "markdown": "A page about training plans, pacing and race day preparation.",
                             "metadata": { "sourceURL": "https://hyrox.com/training/" } }]),
    );

    let at = Utc.with_ymd_and_hms(2024, 6, 2, 8, 0, 0).unwrap();
    ConversionRun::at(&config, at).convert_crawl().await.unwrap();
    let first = std::fs::read_to_string(config.paths.crawl_output_dir.join("hyrox-training.mdx")).unwrap();

    ConversionRun::at(&config, at).convert_crawl().await.unwrap();
    let second = std::fs::read_to_string(config.paths.crawl_output_dir.join("hyrox-training.mdx")).unwrap();

    assert_eq!(first, second);
    assert_eq!(record_names(&config.paths.crawl_output_dir).len(), 1);
}

#[tokio::test]
async fn pdf_run_tallies_each_source() {
    let root = tempfile::tempdir().unwrap();
    let config = setup(root.path());
    for name in ["hyrox_rulebook-en.pdf", "tiny.pdf", "broken.pdf", "readme.txt"] {
        std::fs::write(config.paths.pdf_input_dir.join(name), b"%PDF-1.4").unwrap();
    }

    let run = ConversionRun::new(&config);
    let summary = run.convert_pdfs(Arc::new(ScriptedExtractor)).await.unwrap();

    assert_eq!(summary.sources_seen, 3);
    assert_eq!(summary.sources_converted, 1);
    assert_eq!(summary.sources_skipped, 1);
    assert_eq!(summary.sources_failed, 1);
    assert_eq!(summary.records_written, 3);

    let out = &config.paths.pdf_output_dir;
    assert_eq!(
        record_names(out),
        vec![
            "pdf-hyrox-rulebook-en-part-1.mdx",
            "pdf-hyrox-rulebook-en-part-2.mdx",
            "pdf-hyrox-rulebook-en-part-3.mdx",
        ]
    );

    let part = std::fs::read_to_string(out.join("pdf-hyrox-rulebook-en-part-1.mdx")).unwrap();
    assert!(part.contains("# HYROX Rulebook EN - Part 1 of 3"));
    assert!(part.contains("*Part 1 of 3 from hyrox_rulebook-en.pdf (9 pages total)*"));
    assert!(!part.contains("Page 2 of 9\n"));
    assert!(part.contains("*Total Pages: 9*"));
}

#[tokio::test]
async fn missing_inputs_abort_before_writing() {
    let root = tempfile::tempdir().unwrap();
    let config = DocprepConfig::default().with_root(root.path());
    let run = ConversionRun::new(&config);

    let err = run.convert_crawl().await.unwrap_err();
    assert!(matches!(err, Error::SourceMissing(_)));

    let err = run.convert_pdfs(Arc::new(ScriptedExtractor)).await.unwrap_err();
    assert!(matches!(err, Error::SourceMissing(_)));

    assert!(!config.paths.crawl_output_dir.exists());
    assert!(!config.paths.pdf_output_dir.exists());
}

#[tokio::test]
async fn repair_sweep_cleans_converted_records() {
    let root = tempfile::tempdir().unwrap();
    let config = setup(root.path());
    write_crawl(
        &config,
        "crawl.json",
        serde_json::json!([{ "markdown": "Strength &amp; endurance in one race.\n\n<>\n\nEight runs, eight workout stations.",
                             "metadata": { "sourceURL": "https://hyrox.com/about/" } }]),
    );
    ConversionRun::new(&config).convert_crawl().await.unwrap();

    let sweep = RepairSweep::new(
        vec![config.paths.crawl_output_dir.clone(), config.paths.pdf_output_dir.clone()],
        &config.output.extension,
    );
    let summary = sweep.run().await.unwrap();
    assert_eq!(summary.files_fixed, 1);
    assert_eq!(summary.directories_missing, 1);

    let text = std::fs::read_to_string(config.paths.crawl_output_dir.join("hyrox-about.mdx")).unwrap();
    assert!(text.contains("Strength & endurance in one race."));
    assert!(!text.lines().any(|l| l.trim() == "<>"));

    let again = sweep.run().await.unwrap();
    assert_eq!(again.files_fixed, 0);
    assert_eq!(again.files_unchanged, 1);
}
