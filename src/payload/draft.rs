// src/payload/draft.rs

use serde::Serialize;
use serde_json::{json, Map, Value};
use utoipa::ToSchema;

use super::{BuilderConfig, BuilderError, FieldShape, ImageSelection, MoveDirection};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DraftField {
    #[schema(example = "title")]
    pub key: String,
    pub shape: FieldShape,
    /// Entra no payload? Padrão: sim.
    pub included: bool,
    #[schema(value_type = Object)]
    pub value: Value,
}

/// Cópia de trabalho de um anúncio na Central de Produção.
///
/// `payload_text` é sempre o payload serializado do estado atual dos campos,
/// a menos que o operador o tenha editado à mão com
/// [`DraftPayload::edit_payload_text`]. A edição manual vale só para o
/// próximo envio/salvamento: qualquer alteração de campo, inclusão ou foto
/// regenera o texto e descarta a edição.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftPayload {
    fields: Vec<DraftField>,
    available_images: Vec<String>,
    selection: ImageSelection,
    image_output_key: String,
    payload_text: String,
}

impl DraftPayload {
    pub fn from_document(
        document: &Map<String, Value>,
        saved_selection: Option<&[String]>,
        config: &BuilderConfig,
    ) -> Self {
        // A ordem dos campos é a ordem das chaves no documento
        let fields: Vec<DraftField> = document
            .iter()
            .filter(|(key, _)| !config.is_reserved(key))
            .map(|(key, value)| DraftField {
                key: key.clone(),
                shape: FieldShape::classify(key, value, config),
                included: true,
                value: value.clone(),
            })
            .collect();

        let available_images: Vec<String> = fields
            .iter()
            .find(|f| f.shape == FieldShape::ImageList)
            .and_then(|f| f.value.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let selection =
            ImageSelection::initial(saved_selection, &available_images, config.selection_cap);

        Self {
            fields,
            available_images,
            selection,
            image_output_key: config.image_output_key.clone(),
            payload_text: String::new(),
        }
        .rendered()
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub fn fields(&self) -> &[DraftField] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&DraftField> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn available_images(&self) -> &[String] {
        &self.available_images
    }

    pub fn selection(&self) -> &ImageSelection {
        &self.selection
    }

    pub fn payload_text(&self) -> &str {
        &self.payload_text
    }

    /// Payload derivado dos campos incluídos, na ordem dos campos.
    pub fn payload(&self) -> Map<String, Value> {
        let selection_wins = self
            .fields
            .iter()
            .any(|f| f.shape == FieldShape::ImageList && f.included);

        let mut out = Map::new();
        for field in self.fields.iter().filter(|f| f.included) {
            match field.shape {
                FieldShape::ImageList => {
                    out.insert(
                        self.image_output_key.clone(),
                        Value::from(self.selection.as_slice().to_vec()),
                    );
                }
                _ if selection_wins && field.key == self.image_output_key => {}
                _ => {
                    out.insert(field.key.clone(), field.value.clone());
                }
            }
        }
        out
    }

    /// O que de fato será enviado/salvo: o texto atual, validado.
    pub fn outgoing_payload(&self) -> Result<Value, BuilderError> {
        parse_payload_text(&self.payload_text)
    }

    // =========================================================================
    //  INCLUSÃO
    // =========================================================================

    pub fn set_included(&self, key: &str, included: bool) -> Result<Self, BuilderError> {
        let index = self.index_of(key)?;
        let mut next = self.clone();
        next.fields[index].included = included;
        Ok(next.rendered())
    }

    pub fn toggle_included(&self, key: &str) -> Result<Self, BuilderError> {
        let index = self.index_of(key)?;
        self.set_included(key, !self.fields[index].included)
    }

    pub fn select_all(&self) -> Self {
        self.with_all_included(true)
    }

    pub fn select_none(&self) -> Self {
        self.with_all_included(false)
    }

    fn with_all_included(&self, included: bool) -> Self {
        let mut next = self.clone();
        for field in &mut next.fields {
            field.included = included;
        }
        next.rendered()
    }

    // =========================================================================
    //  EDIÇÃO DE VALORES
    // =========================================================================

    /// Substitui o valor inteiro. Vale para qualquer campo exceto a lista de
    /// fotos, que é editada pela seleção.
    pub fn set_value(&self, key: &str, value: Value) -> Result<Self, BuilderError> {
        self.update_value(key, FieldShape::accepts_json_text, |_| Ok(value))
    }

    /// Editor de linha/textarea. Números e booleanos mantêm o tipo original.
    pub fn set_text(&self, key: &str, text: &str) -> Result<Self, BuilderError> {
        self.update_value(
            key,
            |shape| matches!(shape, FieldShape::Scalar | FieldShape::LongText),
            |field| coerce_scalar(field, text),
        )
    }

    /// Editor de texto JSON (listas, objetos e o fallback genérico).
    pub fn set_json_text(&self, key: &str, text: &str) -> Result<Self, BuilderError> {
        let value: Value = serde_json::from_str(text)?;
        self.set_value(key, value)
    }

    /// Edita um item de uma lista genérica. O texto é interpretado como JSON;
    /// se não for JSON válido, vira string.
    pub fn set_list_item_text(
        &self,
        key: &str,
        index: usize,
        text: &str,
    ) -> Result<Self, BuilderError> {
        self.update_value(
            key,
            |shape| shape == FieldShape::GenericList,
            |field| {
                let mut items = items_of(field)?;
                let len = items.len();
                let item = items
                    .get_mut(index)
                    .ok_or_else(|| out_of_range(field, index, len))?;
                *item = serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()));
                Ok(Value::Array(items))
            },
        )
    }

    // --- Linhas {name, value} ---

    pub fn set_row_name(&self, key: &str, index: usize, name: &str) -> Result<Self, BuilderError> {
        self.edit_row(key, index, "name", name)
    }

    pub fn set_row_value(&self, key: &str, index: usize, value: &str) -> Result<Self, BuilderError> {
        self.edit_row(key, index, "value", value)
    }

    pub fn remove_row(&self, key: &str, index: usize) -> Result<Self, BuilderError> {
        self.update_value(key, is_name_value, |field| {
            let items = items_of(field)?;
            if index >= items.len() {
                return Err(out_of_range(field, index, items.len()));
            }
            let kept = items
                .into_iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, item)| item)
                .collect();
            Ok(Value::Array(kept))
        })
    }

    pub fn append_row(&self, key: &str) -> Result<Self, BuilderError> {
        self.update_value(key, is_name_value, |field| {
            let mut items = items_of(field)?;
            items.push(json!({ "name": "", "value": "" }));
            Ok(Value::Array(items))
        })
    }

    fn edit_row(
        &self,
        key: &str,
        index: usize,
        column: &str,
        text: &str,
    ) -> Result<Self, BuilderError> {
        self.update_value(key, is_name_value, |field| {
            let mut items = items_of(field)?;
            let len = items.len();
            let row = items
                .get_mut(index)
                .ok_or_else(|| out_of_range(field, index, len))?;
            let mut replaced = row.as_object().cloned().unwrap_or_default();
            replaced.insert(column.to_string(), Value::String(text.to_string()));
            *row = Value::Object(replaced);
            Ok(Value::Array(items))
        })
    }

    // =========================================================================
    //  FOTOS
    // =========================================================================

    pub fn toggle_image(&self, url: &str) -> Self {
        self.with_selection(self.selection.toggle(url))
    }

    pub fn move_image(&self, url: &str, direction: MoveDirection) -> Self {
        self.with_selection(self.selection.move_entry(url, direction))
    }

    pub fn with_selection(&self, selection: ImageSelection) -> Self {
        let mut next = self.clone();
        next.selection = selection;
        next.rendered()
    }

    // =========================================================================
    //  TEXTO DO PAYLOAD
    // =========================================================================

    /// Edição manual do JSON. Não volta para os campos; só o texto muda.
    pub fn edit_payload_text(&self, text: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.payload_text = text.into();
        next
    }

    // =========================================================================
    //  INTERNOS
    // =========================================================================

    fn index_of(&self, key: &str) -> Result<usize, BuilderError> {
        self.fields
            .iter()
            .position(|f| f.key == key)
            .ok_or_else(|| BuilderError::UnknownField(key.to_string()))
    }

    fn update_value<F>(
        &self,
        key: &str,
        allowed: fn(FieldShape) -> bool,
        edit: F,
    ) -> Result<Self, BuilderError>
    where
        F: FnOnce(&DraftField) -> Result<Value, BuilderError>,
    {
        let index = self.index_of(key)?;
        let field = &self.fields[index];
        if !allowed(field.shape) {
            return Err(BuilderError::WrongShape {
                key: field.key.clone(),
                shape: field.shape,
            });
        }
        let value = edit(field)?;

        let mut next = self.clone();
        next.fields[index].value = value;
        Ok(next.rendered())
    }

    fn rendered(mut self) -> Self {
        self.payload_text = format!("{:#}", Value::Object(self.payload()));
        self
    }
}

/// Valida o JSON digitado pelo operador antes de enviar ou salvar.
pub fn parse_payload_text(text: &str) -> Result<Value, BuilderError> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(BuilderError::NotAnObject);
    }
    Ok(value)
}

fn is_name_value(shape: FieldShape) -> bool {
    shape == FieldShape::NameValueList
}

fn items_of(field: &DraftField) -> Result<Vec<Value>, BuilderError> {
    field
        .value
        .as_array()
        .cloned()
        .ok_or_else(|| BuilderError::WrongShape {
            key: field.key.clone(),
            shape: field.shape,
        })
}

fn out_of_range(field: &DraftField, index: usize, len: usize) -> BuilderError {
    BuilderError::IndexOutOfRange {
        key: field.key.clone(),
        index,
        len,
    }
}

fn coerce_scalar(field: &DraftField, text: &str) -> Result<Value, BuilderError> {
    let invalid = || BuilderError::InvalidScalar {
        key: field.key.clone(),
        text: text.to_string(),
    };

    match &field.value {
        Value::Number(_) => {
            let trimmed = text.trim();
            if let Ok(int) = trimmed.parse::<i64>() {
                return Ok(Value::from(int));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(invalid)
        }
        Value::Bool(_) => match text.trim() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        _ => Ok(Value::String(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("fixture must be an object, got {other}"),
        }
    }

    fn config_with_image_key(key: &str) -> BuilderConfig {
        BuilderConfig {
            image_list_key: key.to_string(),
            image_output_key: "images".to_string(),
            reserved_keys: Vec::new(),
            ..BuilderConfig::default()
        }
    }

    fn listing() -> Map<String, Value> {
        doc(json!({
            "id": "abc",
            "carousel_images": ["a.webp", "b.webp", "c.webp"],
            "title": "Casa com 2 Quartos",
            "salePrice": "R$ 455.000",
            "area": 82,
            "prices": { "Venda": "R$ 455.000", "IPTU": "R$ 160" },
            "amenities-list": [
                { "name": "floorSize", "value": "82 m²" },
                { "name": "POOL", "value": "Piscina" }
            ],
            "tags": ["praia", "{\"a\":1}"],
            "updated_at": "2025-01-01"
        }))
    }

    fn draft() -> DraftPayload {
        DraftPayload::from_document(&listing(), None, &BuilderConfig::default())
    }

    #[test]
    fn fields_follow_document_order_minus_reserved_keys() {
        let d = draft();
        let keys: Vec<&str> = d.fields().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(
            keys,
            ["carousel_images", "title", "salePrice", "area", "prices", "amenities-list", "tags"]
        );
    }

    #[test]
    fn fields_are_not_resorted() {
        let d = DraftPayload::from_document(
            &doc(json!({ "zeta": 1, "alpha": 2, "mid": 3 })),
            None,
            &BuilderConfig::default(),
        );
        let keys: Vec<&str> = d.fields().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn scenario_default_payload_keeps_everything() {
        let d = DraftPayload::from_document(
            &doc(json!({ "title": "A", "images": ["x", "y", "z"] })),
            None,
            &config_with_image_key("images"),
        );
        assert_eq!(
            Value::Object(d.payload()),
            json!({ "title": "A", "images": ["x", "y", "z"] })
        );
    }

    #[test]
    fn scenario_excluded_title_is_absent() {
        let d = DraftPayload::from_document(
            &doc(json!({ "title": "A", "images": ["x", "y", "z"] })),
            None,
            &config_with_image_key("images"),
        )
        .set_included("title", false)
        .unwrap();
        assert_eq!(Value::Object(d.payload()), json!({ "images": ["x", "y", "z"] }));
    }

    #[test]
    fn scenario_toggle_moves_image_to_the_end() {
        let d = DraftPayload::from_document(
            &doc(json!({ "title": "A", "images": ["x", "y", "z"] })),
            None,
            &config_with_image_key("images"),
        );
        let d = d.toggle_image("y").toggle_image("y");
        assert_eq!(d.selection().as_slice(), ["x", "z", "y"]);
        assert_eq!(d.payload()["images"], json!(["x", "z", "y"]));
    }

    #[test]
    fn untouched_fields_round_trip_except_the_image_list() {
        let source = listing();
        let d = draft();
        let payload = d.payload();

        for field in d.fields() {
            if field.shape == FieldShape::ImageList {
                continue;
            }
            assert_eq!(payload[&field.key], source[&field.key], "field {}", field.key);
        }
        assert!(!payload.contains_key("carousel_images"));
        assert_eq!(payload["images"], json!(["a.webp", "b.webp", "c.webp"]));
    }

    #[test]
    fn serialized_text_parses_back_to_the_payload() {
        let d = draft()
            .set_included("prices", false)
            .unwrap()
            .set_text("title", "Casa reformada")
            .unwrap();
        let parsed: Value = serde_json::from_str(d.payload_text()).unwrap();
        assert_eq!(parsed, Value::Object(d.payload()));
        assert_eq!(d.outgoing_payload().unwrap(), parsed);
    }

    #[test]
    fn default_selection_is_capped() {
        let images: Vec<String> = (0..15).map(|i| format!("img{i}.webp")).collect();
        let d = DraftPayload::from_document(
            &doc(json!({ "carousel_images": images })),
            None,
            &BuilderConfig::default(),
        );
        assert_eq!(d.available_images().len(), 15);
        assert_eq!(d.selection().len(), 12);
        assert_eq!(d.payload()["images"].as_array().unwrap().len(), 12);
    }

    #[test]
    fn saved_selection_is_used_verbatim() {
        let saved = vec!["c.webp".to_string(), "a.webp".to_string()];
        let d = DraftPayload::from_document(&listing(), Some(&saved), &BuilderConfig::default());
        assert_eq!(d.payload()["images"], json!(["c.webp", "a.webp"]));
    }

    #[test]
    fn excluded_image_field_drops_selection() {
        let d = draft().set_included("carousel_images", false).unwrap();
        assert!(!d.payload().contains_key("images"));
    }

    #[test]
    fn select_none_then_all() {
        let none = draft().select_none();
        assert!(none.payload().is_empty());
        assert_eq!(none.payload_text(), "{}");

        let all = none.select_all();
        assert_eq!(all.payload(), draft().payload());
    }

    #[test]
    fn toggle_included_flips_the_flag() {
        let d = draft().toggle_included("area").unwrap();
        assert!(!d.field("area").unwrap().included);
        let d = d.toggle_included("area").unwrap();
        assert!(d.field("area").unwrap().included);
    }

    #[test]
    fn unknown_field_is_reported() {
        assert!(matches!(
            draft().set_included("nope", false),
            Err(BuilderError::UnknownField(key)) if key == "nope"
        ));
    }

    #[test]
    fn numeric_edits_keep_numeric_type() {
        let d = draft().set_text("area", " 90 ").unwrap();
        assert_eq!(d.payload()["area"], json!(90));
        let d = d.set_text("area", "90.5").unwrap();
        assert_eq!(d.payload()["area"], json!(90.5));
    }

    #[test]
    fn non_numeric_text_on_numeric_field_is_rejected() {
        let original = draft();
        let result = original.set_text("area", "noventa");
        assert!(matches!(result, Err(BuilderError::InvalidScalar { .. })));
        assert_eq!(original.field("area").unwrap().value, json!(82));
    }

    #[test]
    fn text_editor_is_not_available_for_objects() {
        assert!(matches!(
            draft().set_text("prices", "x"),
            Err(BuilderError::WrongShape { shape: FieldShape::Object, .. })
        ));
    }

    #[test]
    fn json_editor_replaces_objects_and_lists() {
        let d = draft()
            .set_json_text("prices", r#"{"Venda": "R$ 400.000"}"#)
            .unwrap();
        assert_eq!(d.payload()["prices"], json!({ "Venda": "R$ 400.000" }));
    }

    #[test]
    fn malformed_json_leaves_the_draft_untouched() {
        let original = draft();
        let result = original.set_json_text("prices", "{ not json");
        assert!(matches!(result, Err(BuilderError::InvalidJson(_))));
        assert_eq!(original, draft());
    }

    #[test]
    fn image_list_is_not_edited_as_a_value() {
        assert!(matches!(
            draft().set_value("carousel_images", json!([])),
            Err(BuilderError::WrongShape { shape: FieldShape::ImageList, .. })
        ));
    }

    #[test]
    fn list_item_edit_parses_json_or_falls_back_to_string() {
        let d = draft().set_list_item_text("tags", 1, r#"{"b": 2}"#).unwrap();
        assert_eq!(d.payload()["tags"], json!(["praia", { "b": 2 }]));

        let d = d.set_list_item_text("tags", 0, "beira mar {").unwrap();
        assert_eq!(d.payload()["tags"], json!(["beira mar {", { "b": 2 }]));

        assert!(matches!(
            d.set_list_item_text("tags", 5, "x"),
            Err(BuilderError::IndexOutOfRange { index: 5, len: 2, .. })
        ));
    }

    #[test]
    fn name_value_rows_are_edited_independently() {
        let d = draft()
            .set_row_value("amenities-list", 0, "90 m²")
            .unwrap()
            .set_row_name("amenities-list", 1, "GRILL")
            .unwrap();
        assert_eq!(
            d.payload()["amenities-list"],
            json!([
                { "name": "floorSize", "value": "90 m²" },
                { "name": "GRILL", "value": "Piscina" }
            ])
        );
    }

    #[test]
    fn rows_can_be_appended_and_removed() {
        let d = draft().append_row("amenities-list").unwrap();
        let rows = d.payload()["amenities-list"].as_array().unwrap().clone();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], json!({ "name": "", "value": "" }));

        let d = d.remove_row("amenities-list", 0).unwrap();
        assert_eq!(
            d.payload()["amenities-list"],
            json!([
                { "name": "POOL", "value": "Piscina" },
                { "name": "", "value": "" }
            ])
        );
        assert!(matches!(
            d.remove_row("amenities-list", 9),
            Err(BuilderError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn row_operations_require_name_value_shape() {
        assert!(matches!(
            draft().append_row("tags"),
            Err(BuilderError::WrongShape { shape: FieldShape::GenericList, .. })
        ));
    }

    #[test]
    fn hand_edit_is_one_way_and_lost_on_next_change() {
        let edited = draft().edit_payload_text(r#"{"only": "this"}"#);
        assert_eq!(edited.outgoing_payload().unwrap(), json!({ "only": "this" }));
        // Campos não mudaram
        assert_eq!(edited.fields(), draft().fields());

        let after_change = edited.set_text("title", "Outro").unwrap();
        let parsed = after_change.outgoing_payload().unwrap();
        assert_eq!(parsed["title"], json!("Outro"));
        assert!(parsed.get("only").is_none());
    }

    #[test]
    fn malformed_hand_edit_is_rejected_on_send() {
        let edited = draft().edit_payload_text("{ \"title\": ");
        assert!(matches!(edited.outgoing_payload(), Err(BuilderError::InvalidJson(_))));
        assert_eq!(edited.fields(), draft().fields());
    }

    #[test]
    fn payload_text_must_be_an_object() {
        assert!(matches!(parse_payload_text("[1, 2]"), Err(BuilderError::NotAnObject)));
        assert!(parse_payload_text(r#"{"a": 1}"#).is_ok());
    }

    #[test]
    fn selection_wins_over_a_plain_field_using_the_output_key() {
        let d = DraftPayload::from_document(
            &doc(json!({
                "images": "legacy",
                "carousel_images": ["a", "b"]
            })),
            None,
            &BuilderConfig::default(),
        );
        assert_eq!(Value::Object(d.payload()), json!({ "images": ["a", "b"] }));

        let d = d.set_included("carousel_images", false).unwrap();
        assert_eq!(Value::Object(d.payload()), json!({ "images": "legacy" }));
    }
}
