use divulgaimob::{models::materials::MaterialFiles, services::materials_service::MaterialsService};
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn reads_the_manifest_from_the_advertiser_folder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/imob/CA2598/manifest.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "videos": ["abertura.mp4"],
            "narration": "narracao.mp3",
            "music": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = MaterialsService::new(&format!("{}/imob", server.uri())).unwrap();
    let folder = service.folder_url(Some("CA2598"));
    assert_eq!(folder, format!("{}/imob/CA2598/", server.uri()));

    let files = service.fetch_files(&folder).await;
    assert_eq!(files.videos, ["abertura.mp4"]);
    assert_eq!(files.narration, ["narracao.mp3"]);
    assert!(files.music.is_empty());

    let urls = files.resolved(&folder);
    assert_eq!(urls.videos, [format!("{folder}abertura.mp4")]);
}

#[tokio::test]
async fn missing_manifest_yields_empty_lists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let service = MaterialsService::new(&server.uri()).unwrap();
    let files = service.fetch_files(&service.folder_url(Some("CA1"))).await;
    assert_eq!(files, MaterialFiles::default());
}

#[tokio::test]
async fn invalid_manifest_json_yields_empty_lists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>não é json</html>"))
        .mount(&server)
        .await;

    let service = MaterialsService::new(&server.uri()).unwrap();
    let files = service.fetch_files(&service.folder_url(Some("CA1"))).await;
    assert_eq!(files, MaterialFiles::default());
}
