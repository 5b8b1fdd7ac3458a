//! Integration tests for parsing and record detection.

use xtab_ingest::{LocateOptions, LocateStrategy, element_path, locate_records, parse_document};

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ns:AppErrMsg xmlns:ns="urn:example:errors">
  <ns:Shipment>
    <ns:TrnspCtrId>BL001</ns:TrnspCtrId>
    <ns:ErrTxtDoc seq="1"><ns:TxtEN>Weight missing</ns:TxtEN></ns:ErrTxtDoc>
    <ns:ErrTxtDoc seq="2"><ns:TxtEN>Port unknown</ns:TxtEN></ns:ErrTxtDoc>
  </ns:Shipment>
  <ns:Shipment>
    <ns:TrnspCtrId>BL002</ns:TrnspCtrId>
    <ns:ErrTxtDoc seq="1"><ns:TxtEN>Seal number invalid</ns:TxtEN></ns:ErrTxtDoc>
  </ns:Shipment>
</ns:AppErrMsg>"#;

const CATALOG: &str = r#"<Catalog>
  <Meta><Owner>ops</Owner></Meta>
  <Books>
    <Book id="1"><Title>A</Title><Year>2001</Year></Book>
    <Book id="2"><Title>B</Title><Year>2002</Year></Book>
    <Book id="3"><Title>C</Title><Year>2003</Year></Book>
  </Books>
</Catalog>"#;

#[test]
fn preferred_tag_selects_error_texts() {
    let doc = parse_document(FEED).expect("parse feed");
    let selection = locate_records(&doc, &LocateOptions::new());
    assert_eq!(selection.strategy, LocateStrategy::Preferred);
    assert_eq!(selection.len(), 3);
    assert_eq!(selection.path, "AppErrMsg/Shipment/ErrTxtDoc");
    assert_eq!(selection.tag.as_deref(), Some("ErrTxtDoc"));
}

#[test]
fn heuristic_picks_repeated_dense_element() {
    let doc = parse_document(CATALOG).expect("parse catalog");
    let selection = locate_records(&doc, &LocateOptions::new());
    assert_eq!(selection.strategy, LocateStrategy::Detected);
    assert_eq!(selection.path, "Catalog/Books/Book");
    assert_eq!(selection.len(), 3);
    // (avg fields 3 + 1) * 3 records
    assert_eq!(selection.score, Some(12.0));
    for node in &selection.elements {
        assert_eq!(element_path(&doc, *node), "Catalog/Books/Book");
    }
}

#[test]
fn manual_tag_overrides_detection() {
    let doc = parse_document(CATALOG).expect("parse catalog");
    let options = LocateOptions::new().with_record_tag(Some("title".to_string()));
    let selection = locate_records(&doc, &options);
    assert_eq!(selection.strategy, LocateStrategy::ManualTag);
    assert_eq!(selection.len(), 3);
}

#[test]
fn blank_manual_tag_is_ignored() {
    let doc = parse_document(CATALOG).expect("parse catalog");
    let options = LocateOptions::new().with_record_tag(Some("   ".to_string()));
    assert_eq!(
        locate_records(&doc, &options).strategy,
        LocateStrategy::Detected
    );
}
