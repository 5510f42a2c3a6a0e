use node_mirror::{LaunchOptions, MirrorStats, PageDocument, host::HostDocument, mirror};

fn data_url(html: &str) -> String {
    format!("data:text/html,{}", urlencoding::encode(html))
}

#[tokio::test]
#[ignore] // Requires Chrome to be installed
async fn test_page_mirror() {
    let mut page = PageDocument::launch(LaunchOptions::new().headless(true))
        .expect("Failed to launch browser")
        .with_url(data_url("<html><body><button id='go'>Go</button><p>Text</p></body></html>"));

    page.load_all().await.expect("Failed to load page");
    let tree = mirror::build(page.root().unwrap()).expect("Failed to build mirror");

    assert_eq!(tree.node_type, "#document");
    let json = tree.to_json().unwrap();
    assert!(json.contains(r#""type":"BUTTON""#));
    assert!(json.contains(r#""name":"button""#));
    assert!(json.contains(r##""type":"#text""##));

    println!("Page stats: {:?}", MirrorStats::of(&tree));
    page.close().unwrap();
}

#[tokio::test]
#[ignore]
async fn test_page_mirror_is_idempotent() {
    let mut page = PageDocument::launch(LaunchOptions::new().headless(true))
        .expect("Failed to launch browser")
        .with_url(data_url("<html><body><ul><li>One</li><li>Two</li></ul></body></html>"));

    page.load_all().await.expect("Failed to load page");
    let first = mirror::build(page.root().unwrap()).unwrap().to_json().unwrap();
    let second = mirror::build(page.root().unwrap()).unwrap().to_json().unwrap();
    assert_eq!(first, second);

    assert_eq!(first.matches(r#""name":"li""#).count(), 2);
    page.close().unwrap();
}
