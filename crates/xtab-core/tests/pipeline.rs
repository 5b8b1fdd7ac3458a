//! End-to-end tests from XML text to projected views.

use xtab_core::{LoadOptions, TableSession, ViewLayout, extract_rows};
use xtab_ingest::LocateStrategy;
use xtab_model::{FilterToken, ViewState};

const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ns:AppErrMsg xmlns:ns="urn:example:errors">
  <ns:Shipment>
    <ns:TrnspCtrId>BL10</ns:TrnspCtrId>
    <ns:AppErrInfDoc><ns:CodeLstId>E</ns:CodeLstId><ns:ErrCodeAgy>X</ns:ErrCodeAgy></ns:AppErrInfDoc>
    <ns:ErrTxtDoc seq="1"><ns:TxtPT>Peso ausente</ns:TxtPT><ns:TxtEN>Weight missing</ns:TxtEN></ns:ErrTxtDoc>
    <ns:ErrTxtDoc seq="2"><ns:TxtEN>Port unknown</ns:TxtEN></ns:ErrTxtDoc>
  </ns:Shipment>
  <ns:Shipment>
    <ns:TrnspCtrId>BL2</ns:TrnspCtrId>
    <ns:AppErrInfHdr><ns:CodeLstId>S</ns:CodeLstId></ns:AppErrInfHdr>
    <ns:ErrTxtDoc seq="1"><ns:TxtEN>Accepted</ns:TxtEN></ns:ErrTxtDoc>
  </ns:Shipment>
  <ns:Shipment>
    <ns:AppErrInfDoc><ns:CodeLstId>W</ns:CodeLstId></ns:AppErrInfDoc>
    <ns:ErrTxtDoc seq="1"><ns:TxtEN>Seal, "number" invalid</ns:TxtEN></ns:ErrTxtDoc>
  </ns:Shipment>
</ns:AppErrMsg>"#;

const CATALOG: &str = r#"<Catalog>
  <Book id="1"><Title>Alpha</Title><Tag>x</Tag><Tag>y</Tag></Book>
  <Book id="2"><Title>Beta</Title><Note/></Book>
</Catalog>"#;

fn loaded(view: ViewState) -> TableSession {
    let mut session = TableSession::new(view);
    session
        .load_xml(REPORT, &LoadOptions::new())
        .expect("load report");
    session
}

#[test]
fn error_report_rows() {
    let extraction = extract_rows(REPORT, &LoadOptions::new()).expect("extract");
    assert_eq!(extraction.summary.strategy, LocateStrategy::Preferred);
    assert_eq!(extraction.summary.path, "AppErrMsg/Shipment/ErrTxtDoc");
    assert_eq!(extraction.rows.len(), 4);

    let first = &extraction.rows[0];
    assert_eq!(first.value("@seq"), "1");
    assert_eq!(first.value("ErrorMessage"), "Peso ausente");
    assert_eq!(first.value("BL"), "BL10");
    assert_eq!(first.value("AppErrInfDoc.CodeLstId"), "E");

    // Header-level codes are stored under the document-level column.
    assert_eq!(extraction.rows[2].value("AppErrInfDoc.CodeLstId"), "S");
    // The third shipment has no id of its own; the search climbs to the
    // document root and takes the first id found there.
    assert_eq!(extraction.rows[3].value("BL"), "BL10");
    assert_eq!(extraction.rows[3].value("AppErrInfDoc.CodeLstId"), "W");
}

#[test]
fn simple_view_and_status_filter() {
    let session = loaded(ViewState::default());
    assert_eq!(session.columns(), ["BL", "ErrorMessage"]);

    let view = session.project();
    assert_eq!(view.total_rows, 4);
    assert_eq!(view.visible_rows, 3);
    assert!(view.is_filtered());
    assert_eq!(view.bl_summary(), "Selected BLs: 1");

    let ViewLayout::Grouped(groups) = &view.layout else {
        panic!("expected grouped layout");
    };
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "BL10");
    assert_eq!(groups[0].count_label(), "3 Message(s)");
    assert!(groups[0].collapsed && !groups[0].checked);
}

#[test]
fn full_view_hides_blocklisted_columns() {
    let mut session = TableSession::new(ViewState::default().with_simple_view(false));
    let options = LoadOptions::new().with_record_tag(Some("shipment".to_string()));
    session.load_xml(REPORT, &options).expect("load shipments");

    let columns = session.columns();
    assert_eq!(&columns[..2], ["BL", "ErrorMessage"]);
    assert!(columns.iter().any(|c| c == "TrnspCtrId"));
    assert!(!columns.iter().any(|c| c == "AppErrInfDoc.ErrCodeAgy"));
    assert!(!columns.iter().any(|c| c == "ErrTxtDoc.TxtEN"));

    let first = &session.rows()[0];
    assert_eq!(first.value("ErrTxtDoc.TxtEN"), "Weight missing; Port unknown");
    assert_eq!(first.value("ErrorMessage"), "Peso ausente");
}

#[test]
fn record_path_below_the_root() {
    let options = LoadOptions::new().with_record_path(Some("Shipment/ErrTxtDoc".to_string()));
    let extraction = extract_rows(REPORT, &options).expect("extract");
    assert_eq!(extraction.summary.strategy, LocateStrategy::Path);
    assert_eq!(extraction.summary.path, "Shipment/ErrTxtDoc");
    assert_eq!(extraction.rows.len(), 4);
    assert_eq!(extraction.rows[1].value("ErrorMessage"), "Port unknown");

    let full = LoadOptions::new().with_record_path(Some("AppErrMsg/Shipment/ErrTxtDoc".to_string()));
    assert_eq!(extract_rows(REPORT, &full).expect("extract").rows.len(), 4);
}

#[test]
fn filters_and_sorting() {
    let mut session = loaded(ViewState::default().with_hide_status_s(false));
    session.apply(|view| view.toggle_sort("BL"));
    let rows = session.project().rows();
    let bls: Vec<&str> = rows.iter().map(|row| row.value("BL")).collect();
    assert_eq!(bls, vec!["BL2", "BL10", "BL10", "BL10"]);

    session.apply(|view| {
        view.toggle_filter(
            "ErrorMessage",
            FilterToken::Value("Seal, \"number\" invalid".to_string()),
        )
    });
    let export = session.export_rows();
    assert_eq!(export.len(), 1);
    assert_eq!(export[0].value("AppErrInfDoc.CodeLstId"), "W");
}

#[test]
fn filter_menu_values() {
    let mut session = loaded(ViewState::default().with_hide_status_s(false));
    let bl_options = |session: &TableSession| {
        session
            .filter_menus()
            .into_iter()
            .find(|menu| menu.column == "BL")
            .expect("BL menu")
    };
    let menu = bl_options(&session);
    assert_eq!(
        menu.options,
        vec![
            FilterToken::Value("BL2".into()),
            FilterToken::Value("BL10".into())
        ]
    );
    assert_eq!(menu.summary(), "All");

    session.apply(|view| view.select_filter("BL", FilterToken::Value("BL2".into())));
    let menu = bl_options(&session);
    assert_eq!(menu.summary(), "1 selected");
    assert!(menu.is_selected(&FilterToken::Value("BL2".into())));
}

#[test]
fn heuristic_catalog_flattening() {
    let extraction = extract_rows(CATALOG, &LoadOptions::new()).expect("extract");
    assert_eq!(extraction.summary.strategy, LocateStrategy::Detected);
    assert_eq!(extraction.rows[0].value("Tag"), "x; y");
    assert_eq!(extraction.rows[0].value("ErrorMessage"), "");

    let mut session = TableSession::default();
    session
        .load_xml(CATALOG, &LoadOptions::new())
        .expect("load catalog");
    // No BL values, so simple view keeps only the message column, which is
    // empty everywhere and survives because pruning would leave nothing.
    assert_eq!(session.columns(), ["ErrorMessage"]);
}
