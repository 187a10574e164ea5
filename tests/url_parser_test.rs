//! Tests for extracting item IDs from URLs.

use gdrive_provider::url_parser::extract_id;

mod drive_urls {
    use super::*;

    #[test]
    fn folder_url() {
        let url = "https://drive.google.com/drive/folders/1abc123XYZ-_def456";
        assert_eq!(extract_id(url).unwrap(), "1abc123XYZ-_def456");
    }

    #[test]
    fn folder_url_with_account_index() {
        let url = "https://drive.google.com/drive/u/3/folders/1abc123XYZ?usp=sharing";
        assert_eq!(extract_id(url).unwrap(), "1abc123XYZ");
    }

    #[test]
    fn file_url() {
        let url = "http://drive.google.com/file/d/1abc123XYZ/view?usp=drive_link";
        assert_eq!(extract_id(url).unwrap(), "1abc123XYZ");
    }

    #[test]
    fn open_url() {
        let url = "https://drive.google.com/open?id=1abc123XYZ";
        assert_eq!(extract_id(url).unwrap(), "1abc123XYZ");
    }
}

mod docs_urls {
    use super::*;

    #[test]
    fn document() {
        let url = "https://docs.google.com/document/d/1DocID-abc/edit";
        assert_eq!(extract_id(url).unwrap(), "1DocID-abc");
    }

    #[test]
    fn presentation() {
        let url = "https://docs.google.com/presentation/d/1Slides_9/present";
        assert_eq!(extract_id(url).unwrap(), "1Slides_9");
    }
}

mod raw_ids {
    use super::*;

    #[test]
    fn shared_drive_id() {
        assert_eq!(extract_id("0ASharedDriveRoot").unwrap(), "0ASharedDriveRoot");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(extract_id("\t1abc-123_XYZ \n").unwrap(), "1abc-123_XYZ");
    }
}

mod invalid_inputs {
    use super::*;

    #[test]
    fn empty() {
        assert!(extract_id("").is_err());
        assert!(extract_id(" \t ").is_err());
    }

    #[test]
    fn foreign_or_incomplete_url() {
        assert!(extract_id("https://example.com/folder/123").is_err());
        assert!(extract_id("https://drive.google.com/drive/").is_err());
        assert!(extract_id("https://docs.google.com/document/").is_err());
    }

    #[test]
    fn characters_outside_id_alphabet() {
        assert!(extract_id("abc 123").is_err());
        assert!(extract_id("abc/123").is_err());
        assert!(extract_id("abc@123").is_err());
    }
}
