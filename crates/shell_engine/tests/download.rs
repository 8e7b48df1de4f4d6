mod common;

use std::sync::Arc;

use common::{init_logging, Fakes, RecordingSink};
use pretty_assertions::assert_eq;
use shell_core::Notice;
use shell_engine::{
    DownloadHandler, DownloadOutcome, EngineEvent, FetchSettings, ReqwestDownloader,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(server: &MockServer, route: &str, body: &[u8], content_type: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_vec(), content_type))
        .mount(server)
        .await;
}

fn handler(fakes: &Fakes, documents: &TempDir, require_permission: bool) -> DownloadHandler {
    DownloadHandler::new(
        Arc::new(ReqwestDownloader::new(FetchSettings::default())),
        fakes.services(),
        documents.path().to_path_buf(),
        require_permission,
    )
}

#[tokio::test]
async fn image_download_goes_to_gallery_not_share() {
    init_logging();
    let server = MockServer::start().await;
    serve(&server, "/img.png", b"\x89PNG", "image/png").await;

    let fakes = Fakes::new();
    let documents = TempDir::new().unwrap();
    let sink = RecordingSink::new();
    let url = format!("{}/img.png", server.uri());

    let outcome = handler(&fakes, &documents, true)
        .download(1, &url, &sink)
        .await
        .unwrap();

    let expected = documents.path().join("img.png");
    assert_eq!(outcome, DownloadOutcome::SavedToGallery(expected.clone()));
    assert_eq!(fakes.saved_to_gallery(), vec![expected]);
    assert!(fakes.shared().is_empty());
    assert_eq!(
        sink.notices(),
        vec![Notice::download_started(), Notice::image_saved()]
    );
}

#[tokio::test]
async fn document_download_is_shared_not_saved_to_gallery() {
    init_logging();
    let server = MockServer::start().await;
    serve(&server, "/doc.pdf", b"%PDF", "application/pdf").await;

    let fakes = Fakes::new();
    let documents = TempDir::new().unwrap();
    let sink = RecordingSink::new();
    let url = format!("{}/doc.pdf", server.uri());

    let outcome = handler(&fakes, &documents, true)
        .download(2, &url, &sink)
        .await
        .unwrap();

    let expected = documents.path().join("doc.pdf");
    assert_eq!(outcome, DownloadOutcome::Shared(expected.clone()));
    assert!(fakes.saved_to_gallery().is_empty());
    let shared = fakes.shared();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].path, expected);
    assert_eq!(shared[0].contents.as_deref(), Some(&b"%PDF"[..]));
    assert_eq!(shared[0].options.mime_type.as_deref(), Some("application/pdf"));
    assert_eq!(sink.notices(), vec![Notice::download_started()]);

    let finished = sink.take().into_iter().find_map(|event| match event {
        EngineEvent::DownloadFinished { task_id, result } => Some((task_id, result)),
        _ => None,
    });
    assert_eq!(finished, Some((2, Ok(expected))));
}

#[tokio::test]
async fn denied_permission_aborts_before_any_download() {
    init_logging();
    let server = MockServer::start().await;
    serve(&server, "/doc.pdf", b"%PDF", "application/pdf").await;

    let fakes = Fakes::new().deny_permission();
    let documents = TempDir::new().unwrap();
    let sink = RecordingSink::new();
    let url = format!("{}/doc.pdf", server.uri());

    let outcome = handler(&fakes, &documents, true)
        .download(3, &url, &sink)
        .await
        .unwrap();

    assert_eq!(outcome, DownloadOutcome::PermissionDenied);
    assert_eq!(sink.notices(), vec![Notice::permission_required()]);
    assert!(!documents.path().join("doc.pdf").exists());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn permission_is_skipped_when_not_required() {
    init_logging();
    let server = MockServer::start().await;
    serve(&server, "/doc.pdf", b"%PDF", "application/pdf").await;

    let fakes = Fakes::new().deny_permission();
    let documents = TempDir::new().unwrap();
    let sink = RecordingSink::new();
    let url = format!("{}/doc.pdf", server.uri());

    let outcome = handler(&fakes, &documents, false)
        .download(4, &url, &sink)
        .await
        .unwrap();

    assert!(matches!(outcome, DownloadOutcome::Shared(_)));
    assert_eq!(*fakes.permissions.requests.lock().unwrap(), 0);
}

#[tokio::test]
async fn url_without_segment_falls_back_to_location_notice() {
    init_logging();
    let server = MockServer::start().await;
    serve(&server, "/", b"payload", "application/octet-stream").await;

    let fakes = Fakes::new().with_share(false, None);
    let documents = TempDir::new().unwrap();
    let sink = RecordingSink::new();
    let url = format!("{}/", server.uri());

    let outcome = handler(&fakes, &documents, true)
        .download(5, &url, &sink)
        .await
        .unwrap();

    let path = match outcome {
        DownloadOutcome::Stored(path) => path,
        other => panic!("expected stored outcome, got {other:?}"),
    };
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("download_"), "{name}");
    assert!(fakes.saved_to_gallery().is_empty());
    assert_eq!(
        sink.notices().last(),
        Some(&Notice::file_downloaded(&path.display().to_string()))
    );
}

#[tokio::test]
async fn failed_download_shows_generic_notice() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.pdf"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fakes = Fakes::new();
    let documents = TempDir::new().unwrap();
    let sink = RecordingSink::new();
    let url = format!("{}/gone.pdf", server.uri());

    let result = handler(&fakes, &documents, true)
        .download(6, &url, &sink)
        .await;

    assert!(result.is_err());
    assert_eq!(
        sink.notices(),
        vec![Notice::download_started(), Notice::download_failed()]
    );
    assert!(fakes.shared().is_empty());
    assert!(!documents.path().join("gone.pdf").exists());
}
