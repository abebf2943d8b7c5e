use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, Utc};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::layout::PagedDocument;
use typst::syntax::{FileId, Source, VirtualPath};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use super::Document;

/// Compiles documents to PDF. Holds the standard library and the embedded
/// fonts so they are loaded once per process.
pub struct PdfRenderer {
    library: LazyHash<Library>,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
}

impl PdfRenderer {
    pub fn new() -> Self {
        let fonts: Vec<Font> = typst_assets::fonts()
            .flat_map(|data| Font::iter(Bytes::new(data)))
            .collect();
        let book = FontBook::from_fonts(&fonts);
        tracing::debug!(fonts = fonts.len(), "loaded embedded document fonts");

        Self {
            library: LazyHash::new(Library::builder().build()),
            book: LazyHash::new(book),
            fonts,
        }
    }

    pub fn render(&self, document: &Document) -> Result<Vec<u8>> {
        let world = DocumentWorld::new(self, document.to_typst(), document.generated_at);

        let compiled: PagedDocument = typst::compile(&world)
            .output
            .map_err(|errors| anyhow!("document compilation failed: {errors:?}"))?;

        typst_pdf::pdf(&compiled, &PdfOptions::default())
            .map_err(|errors| anyhow!("PDF export failed: {errors:?}"))
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-file world: the generated markup is the only source and nothing
/// is read from disk.
struct DocumentWorld<'a> {
    renderer: &'a PdfRenderer,
    main: FileId,
    source: Source,
    today: DateTime<Utc>,
}

impl<'a> DocumentWorld<'a> {
    fn new(renderer: &'a PdfRenderer, markup: String, today: DateTime<Utc>) -> Self {
        let main = FileId::new(None, VirtualPath::new("main.typ"));
        Self {
            renderer,
            main,
            source: Source::new(main, markup),
            today,
        }
    }
}

impl World for DocumentWorld<'_> {
    fn library(&self) -> &LazyHash<Library> {
        &self.renderer.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.renderer.book
    }

    fn main(&self) -> FileId {
        self.main
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main {
            Ok(self.source.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.renderer.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        Datetime::from_ymd(
            self.today.year(),
            self.today.month() as u8,
            self.today.day() as u8,
        )
    }
}
