//! Fetch and site file tests against a local HTTP listener
#![cfg(feature = "fetch")]

use std::time::Duration;

use aiscout_core::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <title>Heat Pump Basics</title>
    <meta name="description" content="How heat pumps move heat and what they cost to run.">
    <link rel="canonical" href="/page">
</head>
<body>
    <main>
        <h1>Heat Pump Basics</h1>
        <h2>What is a heat pump?</h2>
        <p>A heat pump refers to a device that moves heat instead of burning fuel.</p>
    </main>
</body>
</html>"#;

type Route = fn(&str) -> (u16, &'static str);

/// Paths a typical small site answers: robots.txt exists, sitemap.xml errors
/// and llms.txt is missing.
fn partial_site(path: &str) -> (u16, &'static str) {
    match path {
        "/page" | "/slow" => (200, PAGE),
        "/robots.txt" => (200, "User-agent: *\nAllow: /\n"),
        "/sitemap.xml" => (500, "boom"),
        "/blank" => (200, "   \n"),
        _ => (404, "not found"),
    }
}

fn complete_site(path: &str) -> (u16, &'static str) {
    match path {
        "/page" => (200, PAGE),
        "/robots.txt" => (200, "User-agent: *\nDisallow:\n"),
        "/sitemap.xml" => (200, r#"<?xml version="1.0"?><urlset><url><loc>/page</loc></url></urlset>"#),
        "/llms.txt" => (200, "# Heat Pump Basics\n"),
        _ => (404, "not found"),
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        _ => "Internal Server Error",
    }
}

/// Serves `route` over HTTP/1.1 on an ephemeral port and returns its origin.
/// `/slow` answers after three seconds.
async fn serve(route: Route) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                if path == "/slow" {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                }

                let (status, body) = route(&path);
                let response = format!(
                    "HTTP/1.1 {status} {}\r\ncontent-type: text/html; charset=utf-8\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    reason(status),
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}

fn client() -> HttpProbe {
    HttpProbe::new(&ProbeConfig { timeout: 2, ..ProbeConfig::default() }).unwrap()
}

#[tokio::test]
async fn test_fetch_url_returns_body() {
    let origin = serve(partial_site).await;
    let html = fetch_url(&format!("{origin}/page"), &FetchConfig::default()).await.unwrap();
    assert!(html.contains("<title>Heat Pump Basics</title>"));
}

#[tokio::test]
async fn test_fetch_url_non_success_status() {
    let origin = serve(partial_site).await;

    let missing = fetch_url(&format!("{origin}/missing"), &FetchConfig::default()).await;
    assert!(matches!(missing, Err(AiscoutError::HttpError(_))));

    let broken = fetch_url(&format!("{origin}/sitemap.xml"), &FetchConfig::default()).await;
    match broken {
        Err(AiscoutError::HttpError(e)) => assert_eq!(e.status().map(|s| s.as_u16()), Some(500)),
        other => panic!("expected an HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_url_blank_body() {
    let origin = serve(partial_site).await;
    let result = fetch_url(&format!("{origin}/blank"), &FetchConfig::default()).await;
    assert!(matches!(result, Err(AiscoutError::EmptyDocument(_))));
}

#[tokio::test]
async fn test_fetch_url_timeout() {
    let origin = serve(partial_site).await;
    let config = FetchConfig::builder().timeout(1).build();

    let result = fetch_url(&format!("{origin}/slow"), &config).await;
    assert!(matches!(result, Err(AiscoutError::Timeout { timeout: 1 })), "{result:?}");
}

#[tokio::test]
async fn test_site_file_request_reports_status_and_body() {
    let origin = serve(partial_site).await;
    let client = client();

    let robots = client.get(&format!("{origin}/robots.txt")).await.unwrap();
    assert_eq!(robots, ProbeResponse::new(200, "User-agent: *\nAllow: /\n"));

    let llms = client.get(&format!("{origin}/llms.txt")).await.unwrap();
    assert_eq!(llms.status, 404);
}

#[tokio::test]
async fn test_refused_connection_counts_as_absent() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client();
    assert_eq!(client.get(&format!("http://{addr}/robots.txt")).await, None);

    let files = discover_site_files(&client, &format!("http://{addr}/page")).await;
    assert_eq!(files, SiteFiles::default());
}

#[tokio::test]
async fn test_discover_partial_site() {
    let origin = serve(partial_site).await;
    let files = discover_site_files(&client(), &format!("{origin}/docs/page")).await;

    assert_eq!(files, SiteFiles { robots_txt: true, sitemap_xml: false, llms_txt: false });
}

#[tokio::test]
async fn test_discover_complete_site() {
    let origin = serve(complete_site).await;
    let files = discover_site_files(&client(), &format!("{origin}/page")).await;

    assert_eq!(files, SiteFiles { robots_txt: true, sitemap_xml: true, llms_txt: true });
}

#[tokio::test]
async fn test_fetch_and_report_over_http() {
    let origin = serve(partial_site).await;
    let url = format!("{origin}/page");

    let report = Analyzer::new().fetch_and_report(&url).await.unwrap();
    assert_eq!(report.url, url);
    assert_eq!(report.structure.title, "Heat Pump Basics");
    assert!(report.structure.robots_txt);
    assert!(!report.structure.sitemap_xml);
    assert!(!report.structure.llms_txt);

    let missing_sitemap = report.score.penalties.iter().find(|p| p.name == "Missing sitemap.xml").unwrap();
    assert!(missing_sitemap.applied);
    let missing_robots = report.score.penalties.iter().find(|p| p.name == "Missing robots.txt").unwrap();
    assert!(!missing_robots.applied);

    let files = SiteFiles { robots_txt: true, sitemap_xml: false, llms_txt: false };
    let offline = Analyzer::new();
    let expected = offline.score(&offline.analyze_with_site_files(PAGE, &url, files));
    assert_eq!(report.score.final_score, expected.final_score);
}

#[tokio::test]
async fn test_fetch_and_report_skips_site_files_when_disabled() {
    let origin = serve(complete_site).await;
    let analyzer = Analyzer::with_config(AnalyzerConfig::builder().probe_site_files(false).build());

    let report = analyzer.fetch_and_report(&format!("{origin}/page")).await.unwrap();
    assert!(!report.structure.robots_txt);
    assert!(!report.structure.sitemap_xml);
    assert!(!report.structure.llms_txt);
}

#[tokio::test]
async fn test_fetch_and_report_missing_page() {
    let origin = serve(partial_site).await;
    let result = Analyzer::new().fetch_and_report(&format!("{origin}/gone")).await;
    assert!(matches!(result, Err(AiscoutError::HttpError(_))));
}

#[tokio::test]
async fn test_compare_over_http_reports_each_page() {
    let origin = serve(complete_site).await;
    let inputs = vec![format!("{origin}/page"), format!("{origin}/gone"), String::new()];

    let entries = Analyzer::new().compare::<_, StaticAdvisor>(&inputs, None).await;
    assert_eq!(entries.len(), 2);

    let host = origin.trim_start_matches("http://");
    assert!(entries.iter().all(|e| e.domain == host));

    let analysis = entries[0].analysis().unwrap();
    let files = SiteFiles { robots_txt: true, sitemap_xml: true, llms_txt: true };
    let offline = Analyzer::new();
    let expected = offline.score(&offline.analyze_with_site_files(PAGE, &inputs[0], files));
    assert_eq!(analysis.ai_optimization_score, expected.final_score);

    match &entries[1].outcome {
        ComparisonOutcome::Failed { error } => assert!(error.contains("404"), "{error}"),
        other => panic!("expected a failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rewrites_over_http_with_advisor() {
    let origin = serve(partial_site).await;
    let reply = r#"{"rewrites": [{"section": "intro", "original": "A heat pump refers to a device",
        "rewritten": "A heat pump is a device that moves 3 to 4 units of heat per unit of electricity",
        "reasoning": "Adds a measurable claim", "impact": "medium"}],
        "overall_strategy": "Quantify efficiency claims"}"#;
    let advisor = StaticAdvisor::new(reply);

    let report = Analyzer::new().rewrites(&format!("{origin}/page"), Some(&advisor)).await.unwrap();
    assert_eq!(report.rewrites.rewrites.len(), 1);
    assert_eq!(report.rewrites.overall_strategy, "Quantify efficiency claims");
    // The same reply is not a strategic analysis, so the derived one is kept.
    let files = SiteFiles { robots_txt: true, sitemap_xml: false, llms_txt: false };
    let derived = Analyzer::new().strategic_analysis(PAGE, &report.url, files);
    assert_eq!(report.strategic_analysis, derived);
}
