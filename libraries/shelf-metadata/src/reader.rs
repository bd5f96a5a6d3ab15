/// EPUB metadata extraction
use crate::error::{MetadataError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use shelf_core::{Author, BookMetadata, MetadataExtractor};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Default cover size limit (8 MiB)
pub const DEFAULT_MAX_COVER_BYTES: u64 = 8 * 1024 * 1024;

/// Reads title, author and cover from the OPF package of an EPUB
///
/// Covers larger than the limit are dropped with a warning, or rejected as
/// resource exhaustion when `fail_on_oversized_cover` is set.
#[derive(Debug, Clone)]
pub struct EpubMetadataExtractor {
    max_cover_bytes: u64,
    fail_on_oversized_cover: bool,
}

impl EpubMetadataExtractor {
    pub fn new() -> Self {
        Self {
            max_cover_bytes: DEFAULT_MAX_COVER_BYTES,
            fail_on_oversized_cover: false,
        }
    }

    pub fn with_max_cover_bytes(mut self, limit: u64) -> Self {
        self.max_cover_bytes = limit;
        self
    }

    pub fn fail_on_oversized_cover(mut self, fail: bool) -> Self {
        self.fail_on_oversized_cover = fail;
        self
    }

    /// Read metadata from an EPUB file
    pub fn read(&self, path: &Path) -> Result<BookMetadata> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;
        self.read_archive(&mut archive)
    }

    fn read_archive<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<BookMetadata> {
        let container = read_entry_string(archive, CONTAINER_PATH)?;
        let opf_path = rootfile_path(&container)?;
        let opf = read_entry_string(archive, &opf_path)?;
        let package = Package::parse(&opf)?;

        let cover = match package.cover_href() {
            Some(href) => self.read_cover(archive, &resolve_href(&opf_path, href))?,
            None => None,
        };

        Ok(BookMetadata {
            title: package.title.clone(),
            author: package.author(),
            cover,
        })
    }

    fn read_cover<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        name: &str,
    ) -> Result<Option<Vec<u8>>> {
        let mut entry = match archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                tracing::debug!("Cover {} is listed but missing from the archive", name);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let size = entry.size();
        if size > self.max_cover_bytes {
            if self.fail_on_oversized_cover {
                return Err(MetadataError::CoverTooLarge {
                    size,
                    limit: self.max_cover_bytes,
                });
            }
            tracing::warn!(
                "Skipping cover {} ({} bytes, limit {})",
                name,
                size,
                self.max_cover_bytes
            );
            return Ok(None);
        }

        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(usize::try_from(size).unwrap_or(usize::MAX))
            .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
        (&mut entry)
            .take(self.max_cover_bytes)
            .read_to_end(&mut bytes)?;

        Ok(Some(bytes))
    }
}

impl Default for EpubMetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataExtractor for EpubMetadataExtractor {
    fn extract(&self, path: &Path) -> shelf_core::Result<BookMetadata> {
        let metadata = self.read(path)?;
        tracing::debug!(
            "Read {}: title={:?} author={}",
            path.display(),
            metadata.title,
            metadata.author
        );
        Ok(metadata)
    }
}

fn read_entry_string<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut entry = archive.by_name(name).map_err(|e| match e {
        ZipError::FileNotFound => MetadataError::InvalidContainer(format!("missing {}", name)),
        other => other.into(),
    })?;

    let mut text = String::new();
    entry.read_to_string(&mut text)?;
    Ok(text)
}

/// Locate the OPF package document named by `META-INF/container.xml`
fn rootfile_path(container: &str) -> Result<String> {
    let mut reader = Reader::from_str(container);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"rootfile" => {
                if let Some(path) = attribute(&e, b"full-path")? {
                    return Ok(path);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Err(MetadataError::InvalidContainer(
        "container.xml names no rootfile".to_string(),
    ))
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes().flatten() {
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[derive(Debug, Default)]
struct Package {
    title: Option<String>,
    creators: Vec<Creator>,
    refinements: Vec<Refinement>,
    cover_id: Option<String>,
    items: Vec<ManifestItem>,
}

#[derive(Debug, Default)]
struct Creator {
    id: Option<String>,
    name: String,
    file_as: Option<String>,
    role: Option<String>,
}

/// EPUB 3 `<meta refines="#id" property="...">`
#[derive(Debug)]
struct Refinement {
    target: String,
    property: String,
    value: String,
}

#[derive(Debug)]
struct ManifestItem {
    id: String,
    href: String,
    media_type: String,
    properties: String,
}

enum Capture {
    Title,
    Creator(Creator),
    Refine { target: String, property: String },
}

impl Package {
    fn parse(opf: &str) -> Result<Self> {
        let mut reader = Reader::from_str(opf);
        let mut package = Self::default();
        let mut capture: Option<(Capture, String)> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"title" if package.title.is_none() => {
                        capture = Some((Capture::Title, String::new()));
                    }
                    b"creator" => {
                        let creator = Creator {
                            id: attribute(&e, b"id")?,
                            file_as: attribute(&e, b"file-as")?,
                            role: attribute(&e, b"role")?,
                            name: String::new(),
                        };
                        capture = Some((Capture::Creator(creator), String::new()));
                    }
                    b"meta" => {
                        let refines = attribute(&e, b"refines")?;
                        let property = attribute(&e, b"property")?;
                        match (refines, property) {
                            (Some(target), Some(property)) => {
                                let target = target.trim_start_matches('#').to_string();
                                capture = Some((Capture::Refine { target, property }, String::new()));
                            }
                            _ => package.read_meta(&e)?,
                        }
                    }
                    b"item" => package.read_item(&e)?,
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"meta" => package.read_meta(&e)?,
                    b"item" => package.read_item(&e)?,
                    _ => {}
                },
                Event::Text(t) => {
                    if let Some((_, text)) = capture.as_mut() {
                        text.push_str(&t.unescape()?);
                    }
                }
                Event::CData(c) => {
                    if let Some((_, text)) = capture.as_mut() {
                        text.push_str(&String::from_utf8_lossy(&c));
                    }
                }
                Event::End(_) => {
                    if let Some((field, text)) = capture.take() {
                        package.finish(field, text.trim());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(package)
    }

    fn finish(&mut self, field: Capture, text: &str) {
        if text.is_empty() {
            return;
        }
        match field {
            Capture::Title => self.title = Some(text.to_string()),
            Capture::Creator(mut creator) => {
                creator.name = text.to_string();
                self.creators.push(creator);
            }
            Capture::Refine { target, property } => self.refinements.push(Refinement {
                target,
                property,
                value: text.to_string(),
            }),
        }
    }

    /// EPUB 2 `<meta name="cover" content="item-id"/>`
    fn read_meta(&mut self, element: &BytesStart<'_>) -> Result<()> {
        if self.cover_id.is_none() && attribute(element, b"name")?.as_deref() == Some("cover") {
            self.cover_id = attribute(element, b"content")?;
        }
        Ok(())
    }

    fn read_item(&mut self, element: &BytesStart<'_>) -> Result<()> {
        let (Some(id), Some(href)) = (attribute(element, b"id")?, attribute(element, b"href")?)
        else {
            return Ok(());
        };

        self.items.push(ManifestItem {
            id,
            href,
            media_type: attribute(element, b"media-type")?.unwrap_or_default(),
            properties: attribute(element, b"properties")?.unwrap_or_default(),
        });
        Ok(())
    }

    fn refined(&self, creator: &Creator, property: &str) -> Option<String> {
        let id = creator.id.as_deref()?;
        self.refinements
            .iter()
            .find(|r| r.target == id && r.property == property)
            .map(|r| r.value.clone())
    }

    /// The first creator with the author role (or no role at all)
    fn author(&self) -> Author {
        let creator = self
            .creators
            .iter()
            .find(|c| {
                c.role
                    .clone()
                    .or_else(|| self.refined(c, "role"))
                    .map_or(true, |role| role == "aut")
            })
            .or_else(|| self.creators.first());

        let Some(creator) = creator else {
            return Author::default();
        };

        match creator.file_as.clone().or_else(|| self.refined(creator, "file-as")) {
            Some(sort_name) if sort_name.contains(',') => Author::from_full_name(&sort_name),
            _ => Author::from_full_name(&creator.name),
        }
    }

    fn cover_href(&self) -> Option<&str> {
        self.items
            .iter()
            .find(|i| i.properties.split_whitespace().any(|p| p == "cover-image"))
            .or_else(|| {
                let id = self.cover_id.as_deref()?;
                self.items.iter().find(|i| i.id == id)
            })
            .or_else(|| {
                self.items.iter().find(|i| {
                    i.media_type.starts_with("image/") && i.id.to_ascii_lowercase().contains("cover")
                })
            })
            .map(|i| i.href.as_str())
    }
}

/// Resolve a manifest href against the directory of the OPF document
fn resolve_href(opf_path: &str, href: &str) -> String {
    let href = href.split('#').next().unwrap_or(href);
    let href = percent_decode(href);
    let base = opf_path.rsplit_once('/').map_or("", |(dir, _)| dir);

    let mut parts: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for segment in href.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let decoded = bytes
                .get(i + 1..i + 3)
                .and_then(|hex| std::str::from_utf8(hex).ok())
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(byte) = decoded {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}
