use super::*;

// =============================================================
// Parsing
// =============================================================

#[test]
fn parse_standard_format() {
    let s = StyleDeclaration::parse("color: red; font-size: 16px; text-align: center;");
    assert_eq!(s.get("color"), Some("red"));
    assert_eq!(s.get("font-size"), Some("16px"));
    assert_eq!(s.get("text-align"), Some("center"));
    assert_eq!(s.len(), 3);
}

#[test]
fn parse_without_spaces() {
    let s = StyleDeclaration::parse("color:blue;font-weight:bold;text-align:left;");
    assert_eq!(s.get("color"), Some("blue"));
    assert_eq!(s.get("font-weight"), Some("bold"));
    assert_eq!(s.get("text-align"), Some("left"));
}

#[test]
fn parse_with_extra_spaces() {
    let s = StyleDeclaration::parse("  color: green ;  font-style: italic  ; text-align: right ;  ");
    assert_eq!(s.get("color"), Some("green"));
    assert_eq!(s.get("font-style"), Some("italic"));
    assert_eq!(s.get("text-align"), Some("right"));
}

#[test]
fn parse_quoted_family_keeps_quotes() {
    let s = StyleDeclaration::parse("font-family: \"Arial Black\"; color: #333;");
    assert_eq!(s.get("font-family"), Some("\"Arial Black\""));
    assert_eq!(s.get("color"), Some("#333"));
}

#[test]
fn parse_multi_token_value() {
    let s = StyleDeclaration::parse("text-decoration: underline line-through; font-weight: bold");
    assert_eq!(s.get("text-decoration"), Some("underline line-through"));
    assert_eq!(s.get("font-weight"), Some("bold"));
}

#[test]
fn parse_function_value() {
    let s = StyleDeclaration::parse("color: rgb(255, 87, 51); text-align: center");
    assert_eq!(s.get("color"), Some("rgb(255, 87, 51)"));
    assert_eq!(s.get("text-align"), Some("center"));
}

#[test]
fn parse_last_declaration_without_semicolon() {
    let s = StyleDeclaration::parse("font-size: 20px");
    assert_eq!(s.get("font-size"), Some("20px"));
}

#[test]
fn parse_property_names_case_insensitive() {
    let s = StyleDeclaration::parse("Text-Align: right");
    assert_eq!(s.get("text-align"), Some("right"));
    assert_eq!(s.get("TEXT-ALIGN"), Some("right"));
}

#[test]
fn parse_duplicate_later_wins() {
    let s = StyleDeclaration::parse("color: red; color: blue;");
    assert_eq!(s.get("color"), Some("blue"));
    assert_eq!(s.len(), 1);
}

#[test]
fn parse_empty_input() {
    assert!(StyleDeclaration::parse("").is_empty());
    assert!(StyleDeclaration::parse("   ").is_empty());
    assert!(StyleDeclaration::parse(";;;").is_empty());
}

#[test]
fn parse_skips_malformed_keeps_rest() {
    let s = StyleDeclaration::parse("color red; font-weight: bold; : 12px; text-align:; font-style: italic");
    assert_eq!(s.get("color"), None);
    assert_eq!(s.get("font-weight"), Some("bold"));
    assert_eq!(s.get("text-align"), None);
    assert_eq!(s.get("font-style"), Some("italic"));
}

#[test]
fn parse_drops_important_flag() {
    let s = StyleDeclaration::parse("font-weight: bold !important; font-style:italic!IMPORTANT; color: red ! important");
    assert_eq!(s.get("font-weight"), Some("bold"));
    assert_eq!(s.get("font-style"), Some("italic"));
    assert_eq!(s.get("color"), Some("red"));
}

#[test]
fn parse_skips_value_with_stray_bang() {
    let s = StyleDeclaration::parse("font-weight: bold !loud; text-align: center");
    assert_eq!(s.get("font-weight"), None);
    assert_eq!(s.get("text-align"), Some("center"));
}

#[test]
fn parse_garbage_does_not_hang() {
    let s = StyleDeclaration::parse("))) !!! 42; text-align: left");
    assert_eq!(s.get("text-align"), Some("left"));
}

// =============================================================
// Mutation
// =============================================================

#[test]
fn set_appends_new_property() {
    let mut s = StyleDeclaration::new();
    s.set("font-weight", "bold");
    s.set("text-align", "left");
    assert_eq!(s.css_text(), "font-weight: bold; text-align: left;");
}

#[test]
fn set_replaces_in_place() {
    let mut s = StyleDeclaration::parse("color: red; font-size: 12px;");
    s.set("color", "blue");
    assert_eq!(s.css_text(), "color: blue; font-size: 12px;");
}

#[test]
fn set_blank_value_removes() {
    let mut s = StyleDeclaration::parse("color: red; font-size: 12px;");
    s.set("color", "  ");
    assert!(!s.contains("color"));
    assert_eq!(s.len(), 1);
}

#[test]
fn remove_returns_previous_value() {
    let mut s = StyleDeclaration::parse("color: red;");
    assert_eq!(s.remove("color").as_deref(), Some("red"));
    assert_eq!(s.remove("color"), None);
}

#[test]
fn clear_empties() {
    let mut s = StyleDeclaration::parse("color: red; font-size: 12px;");
    s.clear();
    assert!(s.is_empty());
    assert_eq!(s.css_text(), "");
}

#[test]
fn set_css_text_replaces_everything() {
    let mut s = StyleDeclaration::parse("color: red;");
    s.set_css_text("font-weight: bold;");
    assert!(!s.contains("color"));
    assert_eq!(s.get("font-weight"), Some("bold"));
}

#[test]
fn css_text_reparses_to_same_model() {
    let s = StyleDeclaration::parse("font-family: Times; font-size: 20px; color: #FF5733; text-decoration: underline");
    let again = StyleDeclaration::parse(&s.css_text());
    assert_eq!(s, again);
}

#[test]
fn iter_preserves_order() {
    let s = StyleDeclaration::parse("b: 1; a: 2; c: 3");
    let names: Vec<&str> = s.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["b", "a", "c"]);
}
