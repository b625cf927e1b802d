use oami::error::ErrorKind;
use oami::{Config, Summary, run};
use oami_compress::Compression;
use oami_extract::MediaFilter;
use oami_transfer::MockServer;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

const FIRST: &str = "pub/pmc/articles.A-B.tar.gz";
const SECOND: &str = "pub/pmc/articles.C-H.tar.gz";
const MISSING: &str = "pub/pmc/articles.I-N.tar.gz";

fn article(pmc: &str, body: &str) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE article PUBLIC "-//NLM//DTD Journal Archiving and Interchange DTD v2.3 20070202//EN" "archivearticle.dtd">
<article xmlns:xlink="http://www.w3.org/1999/xlink" article-type="research-article">
  <front><article-meta>
    <article-id pub-id-type="pmid">17000000</article-id>
    <article-id pub-id-type="pmc">{pmc}</article-id>
  </article-meta></front>
  <body>{body}</body>
</article>"#
    )
    .into_bytes()
}

fn supplementary(rid: &str, mimetype: &str, href: &str) -> String {
    format!(
        r#"<p><xref ref-type="supplementary-material" rid="{rid}">Supplementary {rid}</xref></p>
           <supplementary-material id="{rid}" content-type="local-data">
             <media mimetype="{mimetype}" xlink:href="{href}"/>
           </supplementary-material>"#
    )
}

fn tar_gz(members: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut compressed = Vec::new();
    {
        let mut builder = tar::Builder::new(Compression::Gzip.wrap_writer(&mut compressed));
        for (name, data) in members {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            builder.append_data(&mut header, name, data.as_slice()).unwrap();
        }
        builder.into_inner().unwrap().flush().unwrap();
    }
    compressed
}

fn server() -> MockServer {
    let first = tar_gz(&[
        // No supplementary material; stored before the article that has some.
        ("Cell/PMC2/cell2.nxml", article("2", "<p>Nothing here.</p>")),
        ("Cell/PMC2/cell2.pdf", b"%PDF-1.4".to_vec()),
        ("Cell/PMC1/cell1.nxml", article("1", &supplementary("SD1", "video", "cell1-movie.avi"))),
        ("Cell/PMC9/broken.nxml", b"<article><front></article>".to_vec()),
    ]);
    let second = tar_gz(&[(
        "Nature/PMC3/nature3.nxml",
        article(
            "3",
            &format!(
                r#"{}<xref ref-type="supplementary-material" rid="gone"/>{}"#,
                supplementary("S1", "application", "tables.xls"),
                supplementary("S2", "audio", "call.wav"),
            ),
        ),
    )]);
    MockServer::with_files([(FIRST, first), (SECOND, second)]).with_chunk_size(1024)
}

fn config(cache_dir: &Path, remote_paths: &[&str]) -> Config {
    Config {
        server: "mock".to_string(),
        remote_paths: remote_paths.iter().map(|path| path.to_string()).collect(),
        cache_dir: cache_dir.to_path_buf(),
        ..Config::default()
    }
}

fn lines(out: &[u8]) -> Vec<String> {
    String::from_utf8(out.to_vec()).unwrap().lines().map(str::to_string).collect()
}

#[test]
fn test_full_pipeline() {
    let dir = tempdir().unwrap();
    let server = server();
    let config = config(&dir.path().join("cache"), &[FIRST, MISSING, SECOND]);
    let mut out = Vec::new();
    let summary = run(&config, server.clone(), &mut out).unwrap();
    assert_eq!(
        lines(&out),
        [
            "http://www.ncbi.nlm.nih.gov/pmc/articles/PMC1/bin/cell1-movie.avi",
            "http://www.ncbi.nlm.nih.gov/pmc/articles/PMC3/bin/tables.xls",
            "http://www.ncbi.nlm.nih.gov/pmc/articles/PMC3/bin/call.wav",
        ]
    );
    assert_eq!(
        summary,
        Summary {
            synced: 2,
            failed: 1,
            scanned: 2,
            documents: 3,
            skipped: 1,
            links: 3,
        }
    );
    assert_eq!(server.fetched(), [FIRST, SECOND]);
    assert!(dir.path().join("cache").join("articles.A-B.tar.gz").is_file());
    assert!(!dir.path().join("cache").join("articles.I-N.tar.gz").exists());
}

#[test]
fn test_second_run_transfers_nothing() {
    let dir = tempdir().unwrap();
    let server = server();
    let config = config(dir.path(), &[FIRST, SECOND]);
    let mut first = Vec::new();
    run(&config, server.clone(), &mut first).unwrap();

    let again = MockServer::default();
    for remote in [FIRST, SECOND] {
        let data = fs::read(dir.path().join(oami_transfer::local_name(remote).unwrap())).unwrap();
        again.put(remote, data);
    }
    let mut second = Vec::new();
    run(&config, again.clone(), &mut second).unwrap();
    assert!(again.fetched().is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_audio_video_only() {
    let dir = tempdir().unwrap();
    let config = Config {
        media_filter: MediaFilter::AudioVideo,
        ..config(dir.path(), &[FIRST, SECOND])
    };
    let mut out = Vec::new();
    let summary = run(&config, server(), &mut out).unwrap();
    assert_eq!(
        lines(&out),
        [
            "http://www.ncbi.nlm.nih.gov/pmc/articles/PMC1/bin/cell1-movie.avi",
            "http://www.ncbi.nlm.nih.gov/pmc/articles/PMC3/bin/call.wav",
        ]
    );
    assert_eq!(summary.links, 2);
}

#[test]
fn test_unreachable_server_still_completes() {
    let dir = tempdir().unwrap();
    let server = server().offline();
    let mut out = Vec::new();
    let summary = run(&config(dir.path(), &[FIRST, SECOND]), server.clone(), &mut out).unwrap();
    assert!(out.is_empty());
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.synced, 0);
    assert!(server.calls().is_empty());
}

#[test]
fn test_unusable_cache_dir_aborts_before_transfer() {
    let dir = tempdir().unwrap();
    let cache_dir = dir.path().join("cache");
    fs::write(&cache_dir, b"a file, not a directory").unwrap();
    let server = server();
    let mut out = Vec::new();
    let err = run(&config(&cache_dir, &[FIRST]), server.clone(), &mut out).unwrap_err();
    assert_eq!(*err, ErrorKind::Setup);
    assert!(server.calls().is_empty());
}

#[test]
fn test_corrupt_download_is_skipped() {
    let dir = tempdir().unwrap();
    let server = server();
    server.put(FIRST, vec![b'x'; 2048]);
    let mut out = Vec::new();
    let summary = run(&config(dir.path(), &[FIRST, SECOND]), server, &mut out).unwrap();
    assert_eq!(summary.scanned, 1);
    assert_eq!(summary.links, 2);
    assert_eq!(lines(&out).len(), 2);
}

struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_closed_output_aborts() {
    let dir = tempdir().unwrap();
    let err = run(&config(dir.path(), &[FIRST, SECOND]), server(), &mut ClosedPipe).unwrap_err();
    assert_eq!(*err, ErrorKind::Output);
}

#[test]
fn test_plain_tar_under_compressed_name() {
    let dir = tempdir().unwrap();
    let mut plain = Vec::new();
    {
        let mut builder = tar::Builder::new(&mut plain);
        let data = article("5", &supplementary("S1", "video", "plain.avi"));
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, "J/PMC5/j5.nxml", data.as_slice()).unwrap();
        builder.finish().unwrap();
    }
    let server = MockServer::with_files([(FIRST, plain)]);
    let mut out = Vec::new();
    let summary = run(&config(dir.path(), &[FIRST]), server, &mut out).unwrap();
    assert_eq!(lines(&out), ["http://www.ncbi.nlm.nih.gov/pmc/articles/PMC5/bin/plain.avi"]);
    assert_eq!(summary.scanned, 1);
}
