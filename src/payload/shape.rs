// src/payload/shape.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::BuilderConfig;

/// Qual editor o campo usa. Calculado uma única vez, quando o rascunho é
/// montado; editar o valor depois não reclassifica o campo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldShape {
    /// Lista de URLs de fotos, editada pela seleção de imagens.
    ImageList,
    /// Lista de `{name, value}` (ex: características do imóvel).
    NameValueList,
    /// Qualquer outra lista: editor de texto JSON.
    GenericList,
    /// Objeto aninhado: editor de texto JSON.
    Object,
    /// String longa: textarea.
    LongText,
    /// String curta, número, booleano ou null.
    Scalar,
}

impl FieldShape {
    pub fn classify(key: &str, value: &Value, config: &BuilderConfig) -> Self {
        match value {
            Value::Array(items)
                if key == config.image_list_key && items.iter().all(Value::is_string) =>
            {
                FieldShape::ImageList
            }
            Value::Array(items) if is_name_value_list(items) => FieldShape::NameValueList,
            Value::Array(_) => FieldShape::GenericList,
            Value::Object(_) => FieldShape::Object,
            Value::String(s) if s.chars().count() > config.long_text_threshold => {
                FieldShape::LongText
            }
            _ => FieldShape::Scalar,
        }
    }

    /// Campos cujo editor trabalha com o texto JSON do valor inteiro.
    /// Qualquer formato exceto a lista de fotos aceita esse editor genérico.
    pub fn accepts_json_text(self) -> bool {
        !matches!(self, FieldShape::ImageList)
    }
}

fn is_name_value_list(items: &[Value]) -> bool {
    !items.is_empty()
        && items.iter().all(|item| match item.as_object() {
            Some(obj) => {
                obj.len() == 2
                    && obj.contains_key("name")
                    && obj.contains_key("value")
                    && obj.values().all(|v| !v.is_array() && !v.is_object())
            }
            None => false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify(key: &str, value: Value) -> FieldShape {
        FieldShape::classify(key, &value, &BuilderConfig::default())
    }

    #[test]
    fn image_key_with_strings_is_image_list() {
        assert_eq!(
            classify("carousel_images", json!(["a.webp", "b.webp"])),
            FieldShape::ImageList
        );
    }

    #[test]
    fn image_key_with_mixed_items_falls_back_to_generic_list() {
        assert_eq!(
            classify("carousel_images", json!(["a.webp", 3])),
            FieldShape::GenericList
        );
    }

    #[test]
    fn same_list_under_another_key_is_generic() {
        assert_eq!(classify("photos", json!(["a", "b"])), FieldShape::GenericList);
    }

    #[test]
    fn amenities_are_name_value_rows() {
        let amenities = json!([
            { "name": "floorSize", "value": "82 m²" },
            { "name": "numberOfRooms", "value": "2 quartos" }
        ]);
        assert_eq!(classify("amenities-list", amenities), FieldShape::NameValueList);
    }

    #[test]
    fn rows_with_extra_keys_or_nested_values_are_generic() {
        assert_eq!(
            classify("x", json!([{ "name": "a", "value": "b", "icon": "c" }])),
            FieldShape::GenericList
        );
        assert_eq!(
            classify("x", json!([{ "name": "a", "value": { "nested": true } }])),
            FieldShape::GenericList
        );
        assert_eq!(classify("x", json!([])), FieldShape::GenericList);
    }

    #[test]
    fn objects_strings_and_scalars() {
        assert_eq!(classify("prices", json!({ "Venda": "R$ 455.000" })), FieldShape::Object);
        assert_eq!(classify("title", json!("Casa")), FieldShape::Scalar);
        assert_eq!(classify("price", json!(455000)), FieldShape::Scalar);
        assert_eq!(classify("furnished", json!(true)), FieldShape::Scalar);
        assert_eq!(classify("notes", Value::Null), FieldShape::Scalar);
        assert_eq!(classify("description", json!("x".repeat(121))), FieldShape::LongText);
        assert_eq!(classify("description", json!("x".repeat(120))), FieldShape::Scalar);
    }

    #[test]
    fn threshold_counts_characters_not_bytes() {
        // 120 caracteres acentuados ocupam mais de 120 bytes
        assert_eq!(classify("t", json!("é".repeat(120))), FieldShape::Scalar);
    }
}
