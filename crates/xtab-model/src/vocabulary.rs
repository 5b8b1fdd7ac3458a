//! Fixed vocabularies of the error-report feeds.
//!
//! These lists encode what is known about the feeds up front: which elements
//! usually carry one record, which columns are noise, and where the message
//! text lives.

/// Routing identifier column used for grouping.
pub const BL_COLUMN: &str = "BL";

/// Unified message column.
pub const ERROR_MESSAGE_COLUMN: &str = "ErrorMessage";

/// Code-list column under the document-level info block.
pub const CODE_LIST_DOC_COLUMN: &str = "AppErrInfDoc.CodeLstId";

/// Code-list column under the header-level info block.
pub const CODE_LIST_HDR_COLUMN: &str = "AppErrInfHdr.CodeLstId";

/// Column appended when rows are tagged with the file they came from.
pub const SOURCE_FILE_COLUMN: &str = "_source_file";

/// Element carrying the routing identifier.
pub const TRANSPORT_ID_TAG: &str = "TrnspCtrId";

/// Element carrying a status code list.
pub const CODE_LIST_TAG: &str = "CodeLstId";

/// Document-level info block.
pub const DOC_INFO_TAG: &str = "AppErrInfDoc";

/// Header-level info block.
pub const HDR_INFO_TAG: &str = "AppErrInfHdr";

/// Record tags tried before the detection heuristic, in priority order.
pub const PREFERRED_RECORD_TAGS: [&str; 2] = ["ErrTxtDoc", "ErrPntDtlDoc"];

/// Columns removed from every projection.
pub const HIDDEN_COLUMNS: [&str; 8] = [
    "AppErrInfDoc.ErrCodeAgy",
    "ErrPntDetailsDoc.MsgSecCode",
    "ErrPntDetailsDoc.MsgSubItmIdDoc",
    "ErrTxtDoc.RuleCode",
    "ErrTxtDoc.TxtPT",
    "ErrTxtDoc.TxtEN",
    "ErrTxtHdr.TxtPT",
    "ErrTxtHdr.TxtEN",
];

/// Candidate keys for `ErrorMessage`, checked in order.
pub const MESSAGE_KEYS: [&str; 6] = [
    "TxtPT",
    "TxtEN",
    "ErrTxtDoc.TxtPT",
    "ErrTxtDoc.TxtEN",
    "ErrTxtHdr.TxtPT",
    "ErrTxtHdr.TxtEN",
];

/// Columns shown in simple view, and pulled to the front otherwise.
pub const SIMPLE_VIEW_COLUMNS: [&str; 2] = [BL_COLUMN, ERROR_MESSAGE_COLUMN];

/// Group label for rows without a routing identifier.
pub const NO_BL_GROUP: &str = "(no BL)";

/// Separator used when a multi-valued cell is collapsed into one string.
pub const MULTI_VALUE_SEPARATOR: &str = "; ";

/// Status code marking a purely informational row.
pub const STATUS_SUCCESS: &str = "S";

/// Status code marking an error.
pub const STATUS_ERROR: &str = "E";

/// Status code marking a warning.
pub const STATUS_WARNING: &str = "W";

/// Returns true if the column is on the hidden-column blocklist.
pub fn is_hidden_column(column: &str) -> bool {
    HIDDEN_COLUMNS.contains(&column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_columns_are_exact_matches() {
        assert!(is_hidden_column("ErrTxtDoc.RuleCode"));
        assert!(!is_hidden_column("errtxtdoc.rulecode"));
        assert!(!is_hidden_column("ErrTxtDoc.RuleCode.Extra"));
    }

    #[test]
    fn simple_view_pair_is_routing_then_message() {
        assert_eq!(SIMPLE_VIEW_COLUMNS, ["BL", "ErrorMessage"]);
    }
}
