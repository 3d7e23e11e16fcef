//! YML document assembly.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::{AppError, Result};
use crate::models::{Category, Offer};

/// XML declaration written before the catalog element.
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Everything the wire document needs besides the offers themselves.
#[derive(Debug, Clone, Copy)]
pub struct FeedHeader<'a> {
    pub shop_name: &'a str,
    pub company_name: &'a str,
    /// Formatted publish date
    pub date: &'a str,
    pub categories: &'a [Category],
}

/// Serialize the catalog, declaration included, with two-space indentation.
///
/// Offers keep the order given. Text always sits on the same line as its
/// tags, so category names and offer fields carry no padding.
pub fn render_feed(header: &FeedHeader<'_>, offers: &[Offer]) -> Result<String> {
    let mut feed = FeedWriter::new();

    feed.start("yml_catalog", &[("date", header.date)])?;
    feed.start("shop", &[])?;

    feed.start("categories", &[])?;
    for category in header.categories {
        let id = category.id.to_string();
        feed.text_element("category", &[("id", &id)], &category.name)?;
    }
    feed.end("categories")?;

    feed.start("offers", &[])?;
    for offer in offers {
        feed.offer(offer)?;
    }
    feed.end("offers")?;

    feed.end("shop")?;
    feed.text_element("name", &[], header.shop_name)?;
    feed.text_element("company", &[], header.company_name)?;
    feed.end("yml_catalog")?;

    feed.finish()
}

/// Event writer over an in-memory buffer that starts with [`XML_HEADER`].
struct FeedWriter {
    writer: Writer<Vec<u8>>,
}

impl FeedWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(XML_HEADER.as_bytes().to_vec(), b' ', 2),
        }
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut tag = BytesStart::new(name);
        for &attribute in attributes {
            tag.push_attribute(attribute);
        }
        self.write(name, Event::Start(tag))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.write(name, Event::End(BytesEnd::new(name)))
    }

    /// `<name attrs>text</name>` on one line.
    fn text_element(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attributes)?;
        self.write(name, Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    /// Children in the order the aggregator expects.
    fn offer(&mut self, offer: &Offer) -> Result<()> {
        let id = offer.id.to_string();
        self.start("offer", &[("id", &id)])?;
        self.text_element("vendor", &[], &offer.vendor)?;
        self.text_element("price", &[], &offer.price.to_string())?;
        self.text_element("currencyId", &[], &offer.currency)?;
        self.text_element("categoryId", &[], &offer.category_id.to_string())?;
        self.text_element("picture", &[], &offer.picture)?;
        self.text_element("url", &[], &offer.url)?;
        self.text_element("name", &[], &offer.name)?;
        self.text_element("description", &[], &offer.description)?;
        self.text_element("shortDescription", &[], &offer.short_description)?;
        self.end("offer")
    }

    fn write(&mut self, context: &str, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| AppError::feed(context, e))
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner()).map_err(|e| AppError::feed("yml_catalog", e))
    }
}
