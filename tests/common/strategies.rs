//! Proptest strategies for contract text and amounts

use proptest::prelude::*;

/// Placeholder names as authors write them
pub fn placeholder_name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Z_]{0,15}"
}

/// Placeholders always resolved from the contract and user records
pub fn builtin_name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "USER_NAME",
        "USER_EMAIL",
        "USER_PHONE",
        "TRADING_ID",
        "CONTRACT_NUMBER",
        "CONTRACT_DATE",
        "AMOUNT",
    ])
    .prop_map(str::to_string)
}

/// Values that never contain placeholder syntax
pub fn plain_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,-]{0,30}"
}

/// Body lines mixing headings, subheadings, paragraphs and blanks
pub fn body_line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z ]{1,40}".prop_map(|s| format!("# {s}")),
        "[A-Za-z ]{1,40}".prop_map(|s| format!("## {s}")),
        "[A-Za-z ,.]{0,400}",
        Just(String::new()),
    ]
}

pub fn body_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(body_line_strategy(), 0..60).prop_map(|lines| lines.join("\n"))
}

pub fn amount_strategy() -> impl Strategy<Value = u64> {
    0u64..10_000_000_000_000
}
