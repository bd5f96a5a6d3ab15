/// Integration tests for EPUB metadata reading
///
/// Each test writes a small EPUB archive into a temp dir and reads it back.
use shelf_core::{Author, ErrorKind, MetadataExtractor};
use shelf_metadata::EpubMetadataExtractor;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const CONTAINER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

const EPUB2_OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="id">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
    <dc:title>Emma</dc:title>
    <dc:creator opf:role="aut" opf:file-as="Austen, Jane">Jane Austen</dc:creator>
    <meta name="cover" content="cover-img"/>
  </metadata>
  <manifest>
    <item id="cover-img" href="images/cover.png" media-type="image/png"/>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
</package>"#;

const COVER: &[u8] = b"\x89PNG\r\n\x1a\nfake-cover";

fn write_epub(dir: &Path, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    writer.start_file("mimetype", options).unwrap();
    writer.write_all(b"application/epub+zip").unwrap();
    for (entry, contents) in files {
        writer.start_file(*entry, options).unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap();

    path
}

fn standard_epub(dir: &Path) -> PathBuf {
    write_epub(
        dir,
        "emma.epub",
        &[
            ("META-INF/container.xml", CONTAINER.as_bytes()),
            ("OEBPS/content.opf", EPUB2_OPF.as_bytes()),
            ("OEBPS/images/cover.png", COVER),
        ],
    )
}

#[test]
fn read_epub2_title_author_and_cover() {
    let dir = TempDir::new().unwrap();
    let path = standard_epub(dir.path());

    let metadata = EpubMetadataExtractor::new().extract(&path).unwrap();

    assert_eq!(metadata.title.as_deref(), Some("Emma"));
    assert_eq!(metadata.author, Author::new("Jane", "Austen"));
    assert_eq!(metadata.cover.as_deref(), Some(COVER));
}

#[test]
fn read_epub3_cover_image_property() {
    let dir = TempDir::new().unwrap();
    let opf = r#"<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
      <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
        <dc:title>Germinal</dc:title>
        <dc:creator>Émile Zola</dc:creator>
      </metadata>
      <manifest>
        <item id="img1" href="../art/front.png" media-type="image/png" properties="cover-image"/>
      </manifest>
    </package>"#;

    let path = write_epub(
        dir.path(),
        "germinal.epub",
        &[
            ("META-INF/container.xml", CONTAINER.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
            ("art/front.png", COVER),
        ],
    );

    let metadata = EpubMetadataExtractor::new().extract(&path).unwrap();

    assert_eq!(metadata.title.as_deref(), Some("Germinal"));
    assert_eq!(metadata.author, Author::new("Émile", "Zola"));
    assert_eq!(metadata.cover.as_deref(), Some(COVER));
}

#[test]
fn missing_title_is_none() {
    let dir = TempDir::new().unwrap();
    let opf = r#"<package><metadata xmlns:dc="http://purl.org/dc/elements/1.1/"/></package>"#;
    let path = write_epub(
        dir.path(),
        "untitled.epub",
        &[
            ("META-INF/container.xml", CONTAINER.as_bytes()),
            ("OEBPS/content.opf", opf.as_bytes()),
        ],
    );

    let metadata = EpubMetadataExtractor::new().extract(&path).unwrap();

    assert!(metadata.title.is_none());
    assert!(metadata.author.is_empty());
    assert!(metadata.cover.is_none());
    assert_eq!(metadata.title_or_file_stem(&path), "untitled");
}

#[test]
fn oversized_cover_is_dropped_by_default() {
    let dir = TempDir::new().unwrap();
    let path = standard_epub(dir.path());

    let metadata = EpubMetadataExtractor::new()
        .with_max_cover_bytes(4)
        .extract(&path)
        .unwrap();

    assert_eq!(metadata.title.as_deref(), Some("Emma"));
    assert!(metadata.cover.is_none());
}

#[test]
fn oversized_cover_can_be_fatal() {
    let dir = TempDir::new().unwrap();
    let path = standard_epub(dir.path());

    let err = EpubMetadataExtractor::new()
        .with_max_cover_bytes(4)
        .fail_on_oversized_cover(true)
        .extract(&path)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
}

#[test]
fn not_a_zip_is_metadata_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.epub");
    std::fs::write(&path, b"this is not an archive").unwrap();

    let err = EpubMetadataExtractor::new().extract(&path).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Metadata);
}

#[test]
fn missing_container_is_metadata_error() {
    let dir = TempDir::new().unwrap();
    let path = write_epub(dir.path(), "bare.epub", &[("OEBPS/content.opf", EPUB2_OPF.as_bytes())]);

    let err = EpubMetadataExtractor::new().extract(&path).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Metadata);
    assert!(err.to_string().contains("META-INF/container.xml"));
}

#[test]
fn missing_file_is_metadata_error() {
    let err = EpubMetadataExtractor::new()
        .extract(Path::new("/definitely/not/here.epub"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Metadata);
    assert!(err.to_string().contains("not found"));
}
