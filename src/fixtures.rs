//! In-memory PDF builder for unit tests.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

enum FixturePage {
    Text(Vec<String>),
    Blank,
    DanglingContents,
}

/// Builds small PDFs with one text line per `BT`/`ET` block.
#[derive(Default)]
pub(crate) struct PdfFixture {
    pages: Vec<FixturePage>,
    title: Option<String>,
    author: Option<String>,
    mark_info: Option<Object>,
}

impl PdfFixture {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(mut self, lines: &[&str]) -> Self {
        self.pages
            .push(FixturePage::Text(lines.iter().map(|l| l.to_string()).collect()));
        self
    }

    /// A page dictionary with no `/Contents` entry.
    pub(crate) fn blank_page(mut self) -> Self {
        self.pages.push(FixturePage::Blank);
        self
    }

    /// A page whose `/Contents` points at an object that does not exist.
    pub(crate) fn dangling_contents_page(mut self) -> Self {
        self.pages.push(FixturePage::DanglingContents);
        self
    }

    pub(crate) fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub(crate) fn author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    pub(crate) fn marked(mut self, marked: bool) -> Self {
        self.mark_info = Some(Object::Dictionary(dictionary! { "Marked" => marked }));
        self
    }

    pub(crate) fn malformed_mark_info(mut self) -> Self {
        self.mark_info = Some(Object::Dictionary(dictionary! { "Marked" => "Yes" }));
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for spec in &self.pages {
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            };
            if let FixturePage::DanglingContents = spec {
                page.set("Contents", Object::Reference((9999, 0)));
            }
            if let FixturePage::Text(lines) = spec {
                let mut operations = Vec::new();
                for (i, line) in lines.iter().enumerate() {
                    let y = 760 - 16 * i as i64;
                    operations.push(Operation::new("BT", vec![]));
                    operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
                    operations.push(Operation::new("Td", vec![72.into(), y.into()]));
                    operations.push(Operation::new(
                        "Tj",
                        vec![Object::string_literal(line.as_str())],
                    ));
                    operations.push(Operation::new("ET", vec![]));
                }
                let content = Content { operations };
                let stream = Stream::new(dictionary! {}, content.encode().unwrap());
                let content_id = doc.add_object(stream);
                page.set("Contents", content_id);
            }
            kids.push(doc.add_object(page).into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if let Some(mark_info) = self.mark_info {
            catalog.set("MarkInfo", mark_info);
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        if self.title.is_some() || self.author.is_some() {
            let mut info = dictionary! {};
            if let Some(title) = self.title {
                info.set("Title", Object::string_literal(title));
            }
            if let Some(author) = self.author {
                info.set("Author", Object::string_literal(author));
            }
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", info_id);
        }

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }
}
