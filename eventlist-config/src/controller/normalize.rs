use serde_json::Value;

use crate::color::ColorValue;
use crate::config::{
    BOOLEAN_COLOR_FALSE_KEY, BOOLEAN_COLOR_TRUE_KEY, Config, PDF_SETTINGS_KEY,
};

/// Return a copy of `draft` with every color-bearing field in canonical
/// `#rrggbb` form.
///
/// Never fails: values the color codec cannot parse are copied through
/// unchanged, as is everything that is not a color field.
pub fn prepare_for_save(draft: &Config) -> Config {
    let mut normalized = draft.clone();

    for key in [BOOLEAN_COLOR_TRUE_KEY, BOOLEAN_COLOR_FALSE_KEY] {
        if let Some(value) = normalized.get_mut(key) {
            normalize_boolean_color(value);
        }
    }

    if let Some(Value::Object(pdf)) = normalized.get_mut(PDF_SETTINGS_KEY) {
        for (name, value) in pdf.iter_mut() {
            if is_color_setting(name) {
                normalize_pdf_color(value);
            }
        }
    }

    normalized
}

/// PDF settings are color fields when their name mentions "color".
pub fn is_color_setting(name: &str) -> bool {
    name.to_lowercase().contains("color")
}

fn normalize_boolean_color(value: &mut Value) {
    if let Some(color) = ColorValue::from_value(value) {
        *value = color.to_hex().into_value();
    }
}

fn normalize_pdf_color(value: &mut Value) {
    let Some(mut color) = ColorValue::from_value(value) else {
        return;
    };
    if matches!(color, ColorValue::Structured(_)) {
        color = color.to_rgb_text();
    }
    *value = color.to_hex().into_value();
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{is_color_setting, prepare_for_save};
    use crate::config::Config;

    fn config(value: serde_json::Value) -> Config {
        Config::from_value(value).expect("fixture should be an object")
    }

    #[test]
    fn given_rgb_header_color_when_prepared_then_becomes_hex() {
        let draft = config(json!({
            "pdfSettings": { "headerColor": "rgb(255,0,0)" }
        }));

        let normalized = prepare_for_save(&draft);

        assert_eq!(
            normalized.into_value(),
            json!({ "pdfSettings": { "headerColor": "#ff0000" } })
        );
    }

    #[test]
    fn given_structured_boolean_colors_when_prepared_then_become_hex() {
        let draft = config(json!({
            "defaultBooleanColorTrue": { "r": 0, "g": 255, "b": 0, "a": 1 },
            "defaultBooleanColorFalse": "rgba(255, 0, 0, 0.4)",
        }));

        let normalized = prepare_for_save(&draft);

        assert_eq!(
            normalized.get("defaultBooleanColorTrue"),
            Some(&json!("#00ff00"))
        );
        assert_eq!(
            normalized.get("defaultBooleanColorFalse"),
            Some(&json!("#ff0000"))
        );
    }

    #[test]
    fn given_pdf_settings_when_prepared_then_only_color_keys_change() {
        let draft = config(json!({
            "pdfSettings": {
                "textColor": { "r": 16, "g": 32, "b": 48 },
                "TableColorOdd": "#ABCDEF",
                "title": "rgb(1,2,3)",
                "margin": 12,
            }
        }));

        let normalized = prepare_for_save(&draft);

        assert_eq!(
            normalized.into_value(),
            json!({
                "pdfSettings": {
                    "textColor": "#102030",
                    "TableColorOdd": "#abcdef",
                    "title": "rgb(1,2,3)",
                    "margin": 12,
                }
            })
        );
    }

    #[test]
    fn given_unparseable_colors_when_prepared_then_values_pass_through() {
        let draft = config(json!({
            "defaultBooleanColorTrue": "green",
            "defaultBooleanColorFalse": "",
            "pdfSettings": { "lineColor": "rgb(oops)", "fillColor": 7 },
        }));

        let normalized = prepare_for_save(&draft);

        assert_eq!(normalized, draft);
    }

    #[test]
    fn given_missing_or_scalar_pdf_settings_when_prepared_then_no_panic() {
        let without = config(json!({ "other": true }));
        let scalar = config(json!({ "pdfSettings": "disabled" }));

        assert_eq!(prepare_for_save(&without), without);
        assert_eq!(prepare_for_save(&scalar), scalar);
    }

    #[test]
    fn given_draft_when_prepared_then_draft_is_not_mutated() {
        let draft = config(json!({
            "pdfSettings": { "headerColor": "rgb(0,0,255)" }
        }));
        let before = draft.clone();

        let _normalized = prepare_for_save(&draft);

        assert_eq!(draft, before);
    }

    #[test]
    fn given_prepared_config_when_prepared_again_then_unchanged() {
        let draft = config(json!({
            "defaultBooleanColorTrue": "#ABC",
            "pdfSettings": {
                "headerColor": { "rgb": { "r": 9, "g": 8, "b": 7 } },
                "footerColor": "RGB( 10 , 11 , 12 )",
            }
        }));

        let once = prepare_for_save(&draft);
        let twice = prepare_for_save(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn given_setting_names_when_checked_then_match_ignores_case() {
        assert!(is_color_setting("headerColor"));
        assert!(is_color_setting("COLOR"));
        assert!(is_color_setting("colorOdd"));
        assert!(!is_color_setting("colour"));
    }
}
