//! End-to-end harvest tests against mock portals.

use orgtree::acquisition::http_client::HttpClient;
use orgtree::config::{HarvestConfig, Source};
use orgtree::error::{DiscoveryError, FetchError, HarvestError};
use orgtree::harvest;
use orgtree::render::chart;
use orgtree::tree::flatten::TreeIndex;
use orgtree::tree::layout;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cp1251(text: &str) -> Vec<u8> {
    encoding_rs::WINDOWS_1251.encode(text).0.into_owned()
}

/// Mount the three-page chain a real portal serves: a landing page whose
/// anchor text marks the listing page, the listing page with a `.csv` link,
/// and the file itself.
async fn mount_portal(server: &MockServer, landing_html: Vec<u8>, csv_bytes: Vec<u8>) {
    let uri = server.uri();
    let listing = format!(r#"<html><body><a href="{uri}/files/orgs.csv">скачать</a></body></html>"#);

    Mock::given(method("GET"))
        .and(path("/opendata/"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(landing_html))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/podved"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/orgs.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(csv_bytes))
        .mount(server)
        .await;
}

fn landing_with(server: &MockServer, phrase: &str) -> String {
    format!(
        r#"<html><body><a href="{}/podved">{phrase}</a></body></html>"#,
        server.uri()
    )
}

#[tokio::test]
async fn full_chain_with_one_degrading_source() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    // First portal: UTF-8 landing page, cp1251 semicolon-delimited CSV
    mount_portal(
        &first,
        landing_with(&first, "Перечень подведомственных организаций").into_bytes(),
        cp1251("Код;Наименование\n1;Федеральное казначейство\n2;Налоговая служба\n"),
    )
    .await;

    // Second portal: cp1251 landing page using the fallback phrase, and a
    // CSV that defeats every encoding/delimiter combination
    let mut garbage = b"junk".to_vec();
    garbage.push(0x98);
    garbage.extend_from_slice(b"junk\nrow\n");
    mount_portal(
        &second,
        cp1251(&landing_with(&second, "Организации, находящиеся в ведении агентства")),
        garbage,
    )
    .await;

    let downloads = tempfile::tempdir().unwrap();
    let config = HarvestConfig {
        ministry: "МинФин".to_string(),
        sources: vec![
            Source {
                name: "ФК".to_string(),
                url: format!("{}/opendata/", first.uri()),
            },
            Source {
                name: "ФТС".to_string(),
                url: format!("{}/opendata/", second.uri()),
            },
        ],
        download_dir: downloads.path().to_path_buf(),
        concurrency: 1,
        ..Default::default()
    };

    let client = HttpClient::default();
    let dataset = harvest::harvest_sources(&client, &config).await.unwrap();

    assert_eq!(dataset.label(), "МинФин");
    let agencies = dataset.children();
    assert_eq!(agencies.len(), 2);

    assert_eq!(agencies[0].label(), "ФК");
    let orgs: Vec<_> = agencies[0].children().iter().map(|n| n.label()).collect();
    assert_eq!(orgs, vec!["Федеральное казначейство", "Налоговая служба"]);

    // The defeated CSV degrades to a childless agency, not a failed run
    assert_eq!(agencies[1].label(), "ФТС");
    assert!(agencies[1].children().is_empty());

    // Downloaded file is left behind as a cache
    assert!(downloads.path().join("127.0.0.1.csv").exists());

    // The rest of the pipeline runs through to an HTML chart
    let tree = TreeIndex::from_root(&dataset);
    assert_eq!(tree.records.len(), 5);
    assert_eq!(tree.edges.len(), 4);

    let positions = layout::layered_positions(&tree);
    let plot = chart::build_figure(&tree, &positions, &config.title);
    let out = downloads.path().join("tree.html");
    chart::present(&plot, Some(&out)).unwrap();
    assert!(std::fs::read_to_string(&out).unwrap().contains("plotly"));
}

#[tokio::test]
async fn missing_listing_link_aborts_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/opendata/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><a href="/about">О сайте</a></body></html>"#),
        )
        .mount(&server)
        .await;

    let downloads = tempfile::tempdir().unwrap();
    let config = HarvestConfig {
        sources: vec![Source {
            name: "ФК".to_string(),
            url: format!("{}/opendata/", server.uri()),
        }],
        download_dir: downloads.path().to_path_buf(),
        ..Default::default()
    };

    let client = HttpClient::default();
    let err = harvest::harvest_sources(&client, &config).await.unwrap_err();
    assert!(matches!(
        err,
        HarvestError::Discovery(DiscoveryError::ListingLinkNotFound { .. })
    ));
}

#[tokio::test]
async fn http_error_aborts_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/opendata/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let downloads = tempfile::tempdir().unwrap();
    let config = HarvestConfig {
        sources: vec![Source {
            name: "ФК".to_string(),
            url: format!("{}/opendata/", server.uri()),
        }],
        download_dir: downloads.path().to_path_buf(),
        ..Default::default()
    };

    let client = HttpClient::default();
    let err = harvest::harvest_sources(&client, &config).await.unwrap_err();
    assert!(matches!(
        err,
        HarvestError::Fetch(FetchError::Status { status: 500, .. })
    ));
}

#[test]
fn offline_harvest_from_downloaded_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("roskazna.ru.csv"),
        "id,name\n1,Org A\n2,Org B\n",
    )
    .unwrap();
    // No file for the second source

    let config = HarvestConfig {
        ministry: "МинФин".to_string(),
        sources: vec![
            Source {
                name: "ФК".to_string(),
                url: "http://roskazna.ru/opendata/".to_string(),
            },
            Source {
                name: "ФНС".to_string(),
                url: "http://nalog.ru/opendata/".to_string(),
            },
        ],
        ..Default::default()
    };

    let dataset = harvest::harvest_offline(&config, dir.path()).unwrap();
    let agencies = dataset.children();
    assert_eq!(agencies.len(), 2);
    let orgs: Vec<_> = agencies[0].children().iter().map(|n| n.label()).collect();
    assert_eq!(orgs, vec!["Org A", "Org B"]);
    assert!(agencies[1].children().is_empty());
}
