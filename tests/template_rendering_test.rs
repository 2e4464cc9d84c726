//! Rendering contract bodies the way the access and signing endpoints do

mod common;

use common::{herman_bindings, CONTRACT_NUMBER};
use kontrak_core::database::seed::DEFAULT_TEMPLATE_CONTENT;
use kontrak_core::rendering::{
    extract_placeholders, unresolved_placeholders, variables_from_json, ContractVariables,
    IndonesianLocale, TemplateRenderer,
};
use serde_json::json;

fn renderer() -> TemplateRenderer {
    TemplateRenderer::new(IndonesianLocale::wib())
}

#[test]
fn test_builtins_are_formatted_for_indonesia() {
    let body = "Nomor {{CONTRACT_NUMBER}} tanggal {{CONTRACT_DATE}} senilai {{AMOUNT}} \
                untuk {{USER_NAME}} ({{TRADING_ID}}, {{USER_EMAIL}}, {{USER_PHONE}})";

    let text = renderer().render(body, &herman_bindings(), &ContractVariables::new());

    assert_eq!(
        text,
        format!(
            "Nomor {CONTRACT_NUMBER} tanggal 15/1/2024 senilai Rp50.000.000 \
             untuk Herman Zaldivar (TRD001, hermanzal@trader.com, +62812-8888-9999)"
        )
    );
}

#[test]
fn test_custom_variables_fill_every_occurrence() {
    let variables = variables_from_json(&json!({
        "USER_ADDRESS": "Jl. Sudirman No. 1, Jakarta",
        "SIGNED_DATE": "16/1/2024"
    }));

    let text = renderer().render(
        "Alamat: {{USER_ADDRESS}}\nDomisili: {{USER_ADDRESS}}\nTanggal: {{SIGNED_DATE}}",
        &herman_bindings(),
        &variables,
    );

    assert_eq!(
        text,
        "Alamat: Jl. Sudirman No. 1, Jakarta\n\
         Domisili: Jl. Sudirman No. 1, Jakarta\n\
         Tanggal: 16/1/2024"
    );
}

#[test]
fn test_builtins_take_precedence_over_custom_values() {
    let variables = variables_from_json(&json!({ "USER_NAME": "Someone Else" }));
    let text = renderer().render("{{USER_NAME}}", &herman_bindings(), &variables);
    assert_eq!(text, "Herman Zaldivar");
}

#[test]
fn test_unknown_placeholders_pass_through() {
    let text = renderer().render(
        "Alamat: {{USER_ADDRESS}}",
        &herman_bindings(),
        &ContractVariables::new(),
    );
    assert_eq!(text, "Alamat: {{USER_ADDRESS}}");
    assert_eq!(unresolved_placeholders(&text), vec!["USER_ADDRESS"]);
}

#[test]
fn test_null_and_numeric_variables() {
    let variables = variables_from_json(&json!({ "NOTE": null, "TERM": 12 }));
    let text = renderer().render("[{{NOTE}}] {{TERM}} bulan", &herman_bindings(), &variables);
    assert_eq!(text, "[] 12 bulan");
}

#[test]
fn test_default_template_renders_completely() {
    let variables = variables_from_json(&json!({
        "USER_ADDRESS": "Jl. Sudirman No. 1, Jakarta",
        "SIGNED_DATE": "16/1/2024",
        "PAYMENT_METHOD": "Transfer Bank",
        "PAYMENT_TERMS": "30 hari",
        "TRANSACTION_FEE": "0,5%",
        "LATE_FEE": "2%"
    }));

    let placeholders = extract_placeholders(DEFAULT_TEMPLATE_CONTENT);
    assert!(placeholders.iter().any(|name| name == "USER_NAME"));
    assert!(placeholders.iter().any(|name| name == "USER_ADDRESS"));

    let text = renderer().render(DEFAULT_TEMPLATE_CONTENT, &herman_bindings(), &variables);
    assert!(text.contains("Herman Zaldivar"));
    assert!(text.contains("Jl. Sudirman No. 1, Jakarta"));
    assert!(unresolved_placeholders(&text).is_empty(), "{:?}", unresolved_placeholders(&text));
}
