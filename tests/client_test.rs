//! Tests for DriveClient with mocked HTTP responses.

use std::io::Write;

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use tempfile::NamedTempFile;

use gdrive_provider::models::{DriveFile, FOLDER_MIME_TYPE};
use gdrive_provider::{
    Authenticator, DriveApi, DriveClient, DriveError, FileConfig, FileResource, Media,
};

const TOKEN: &str = "test-token";

fn client_for(server: &ServerGuard) -> DriveClient {
    DriveClient::with_base_urls(
        Authenticator::from_access_token(TOKEN),
        server.url(),
        format!("{}/upload/", server.url()),
    )
}

fn query(pairs: &[(&str, &str)]) -> Matcher {
    Matcher::AllOf(
        pairs
            .iter()
            .map(|(k, v)| Matcher::UrlEncoded(k.to_string(), v.to_string()))
            .collect(),
    )
}

mod get_file {
    use super::*;

    #[tokio::test]
    async fn requests_fields_with_shared_drive_support() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/files/abc123")
            .match_query(query(&[
                ("supportsAllDrives", "true"),
                ("fields", "id, parents, mimeType, md5Checksum"),
            ]))
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": "abc123",
                    "parents": ["p1"],
                    "mimeType": "text/plain",
                    "md5Checksum": "5d41402abc4b2a76b9719d911017c592"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let file = client_for(&server)
            .get_file("abc123", "id, parents, mimeType, md5Checksum")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(file.id, "abc123");
        assert_eq!(file.parents, vec!["p1".to_string()]);
        assert_eq!(
            file.md5_checksum.as_deref(),
            Some("5d41402abc4b2a76b9719d911017c592")
        );
    }

    #[tokio::test]
    async fn google_error_body_is_surfaced() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/files/missing")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(
                json!({"error": {"code": 404, "message": "File not found: missing."}}).to_string(),
            )
            .create_async()
            .await;

        let err = client_for(&server).get_file("missing", "id").await.unwrap_err();

        match err {
            DriveError::ApiError { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "File not found: missing.");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn plain_error_body_is_kept() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/files/abc123")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("backend error")
            .create_async()
            .await;

        let err = client_for(&server).get_file("abc123", "id").await.unwrap_err();

        assert!(matches!(
            err,
            DriveError::ApiError { status: 500, ref message } if message == "backend error"
        ));
    }
}

mod create_file {
    use super::*;

    #[tokio::test]
    async fn metadata_only_posts_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/files")
            .match_query(query(&[("supportsAllDrives", "true"), ("fields", "id")]))
            .match_header("authorization", "Bearer test-token")
            .match_body(Matcher::Json(json!({
                "name": "reports",
                "mimeType": FOLDER_MIME_TYPE,
                "parents": ["0AParent"]
            })))
            .with_status(200)
            .with_body(json!({"id": "new1"}).to_string())
            .create_async()
            .await;

        let metadata = DriveFile {
            name: "reports".to_string(),
            mime_type: Some(FOLDER_MIME_TYPE.to_string()),
            parents: vec!["0AParent".to_string()],
            ..Default::default()
        };
        let created = client_for(&server)
            .create_file(&metadata, None, "id")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(created.id, "new1");
    }

    #[tokio::test]
    async fn content_is_uploaded_as_multipart_related() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/upload/files")
            .match_query(query(&[
                ("uploadType", "multipart"),
                ("supportsAllDrives", "true"),
                ("fields", "id"),
            ]))
            .match_header(
                "content-type",
                Matcher::Regex(r"^multipart/related; boundary=gdrive_provider_[0-9a-f]{32}$".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#""name":"example.txt""#.to_string()),
                Matcher::Regex(
                    r"Content-Type: text/plain; charset=utf-8\r\n\r\nhello\r\n--gdrive_provider_[0-9a-f]{32}--$"
                        .to_string(),
                ),
            ]))
            .with_status(200)
            .with_body(json!({"id": "upload1"}).to_string())
            .create_async()
            .await;

        let mut source = NamedTempFile::new().unwrap();
        source.write_all(b"hello").unwrap();
        let file = tokio::fs::File::open(source.path()).await.unwrap();

        let metadata = DriveFile {
            name: "example.txt".to_string(),
            mime_type: Some("text/plain; charset=utf-8".to_string()),
            ..Default::default()
        };
        let created = client_for(&server)
            .create_file(
                &metadata,
                Some(Media::new(file, "text/plain; charset=utf-8")),
                "id",
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(created.id, "upload1");
    }
}

mod delete_file {
    use super::*;

    #[tokio::test]
    async fn deletes_once() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/files/abc123")
            .match_query(query(&[("supportsAllDrives", "true")]))
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        client_for(&server).delete_file("abc123").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn not_found_is_an_error() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/files/abc123")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(json!({"error": {"code": 404, "message": "File not found: abc123."}}).to_string())
            .create_async()
            .await;

        let err = client_for(&server).delete_file("abc123").await.unwrap_err();
        assert!(matches!(err, DriveError::ApiError { status: 404, .. }));
    }
}

mod item_ids {
    use super::*;

    #[tokio::test]
    async fn path_like_id_never_reaches_the_server() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", Matcher::Any)
            .match_query(Matcher::Any)
            .with_status(204)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.delete_file("a/../other").await.unwrap_err();
        assert!(matches!(err, DriveError::InvalidUrlOrId(_)));
        assert!(client.delete_file("..").await.is_err());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn query_and_fragment_characters_are_rejected() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"id": "other"}).to_string())
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        for id in ["abc?alt=media", "abc#frag", ""] {
            let err = client.get_file(id, "id").await.unwrap_err();
            assert!(matches!(err, DriveError::InvalidUrlOrId(_)), "{id}");
        }

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn api_base_path_is_kept() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/drive/v3/files/abc123")
            .match_query(Matcher::Any)
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let client = DriveClient::with_base_urls(
            Authenticator::from_access_token(TOKEN),
            format!("{}/drive/v3/", server.url()),
            server.url(),
        );
        client.delete_file("abc123").await.unwrap();

        mock.assert_async().await;
    }
}

mod end_to_end {
    use super::*;

    #[tokio::test]
    async fn create_from_source_then_read_back() {
        let mut server = Server::new_async().await;
        let upload = server
            .mock("POST", "/upload/files")
            .match_query(Matcher::Any)
            .match_body(Matcher::Regex(
                r#""mimeType":"text/plain; charset=utf-8""#.to_string(),
            ))
            .with_status(200)
            .with_body(json!({"id": "file1"}).to_string())
            .expect(1)
            .create_async()
            .await;
        let read = server
            .mock("GET", "/files/file1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({
                    "id": "file1",
                    "parents": ["root"],
                    "mimeType": "text/plain; charset=utf-8",
                    "md5Checksum": "5d41402abc4b2a76b9719d911017c592"
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let mut source = NamedTempFile::new().unwrap();
        source.write_all(b"hello").unwrap();
        let config = FileConfig::from_value(&json!({
            "name": "example.txt",
            "source": source.path(),
        }))
        .unwrap();

        let client = client_for(&server);
        let state = FileResource::new(&client).create(&config).await.unwrap();

        upload.assert_async().await;
        read.assert_async().await;
        assert_eq!(state.id, "file1");
        assert_eq!(state.real_id, "file1");
        assert_eq!(state.real_parents, vec!["root".to_string()]);
        assert_eq!(
            state.md5_checksum.as_deref(),
            Some(gdrive_provider::content::file_md5_checksum(source.path())
                .unwrap()
                .as_str())
        );
    }
}
