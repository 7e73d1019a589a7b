// src/payload/edits.rs

use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::{BuilderError, DraftPayload, MoveDirection};

/// Uma ação do operador na Central de Produção, no formato `{"op": ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DraftEdit {
    SetValue {
        key: String,
        #[schema(value_type = Object)]
        value: Value,
    },
    SetText {
        key: String,
        text: String,
    },
    SetJsonText {
        key: String,
        text: String,
    },
    SetListItem {
        key: String,
        index: usize,
        text: String,
    },
    SetRowName {
        key: String,
        index: usize,
        name: String,
    },
    SetRowValue {
        key: String,
        index: usize,
        value: String,
    },
    RemoveRow {
        key: String,
        index: usize,
    },
    AppendRow {
        key: String,
    },
    SetIncluded {
        key: String,
        included: bool,
    },
    ToggleIncluded {
        key: String,
    },
    SelectAll,
    SelectNone,
    ToggleImage {
        url: String,
    },
    MoveImage {
        url: String,
        direction: MoveDirection,
    },
    EditPayloadText {
        text: String,
    },
}

impl DraftPayload {
    pub fn apply(&self, edit: &DraftEdit) -> Result<Self, BuilderError> {
        match edit {
            DraftEdit::SetValue { key, value } => self.set_value(key, value.clone()),
            DraftEdit::SetText { key, text } => self.set_text(key, text),
            DraftEdit::SetJsonText { key, text } => self.set_json_text(key, text),
            DraftEdit::SetListItem { key, index, text } => self.set_list_item_text(key, *index, text),
            DraftEdit::SetRowName { key, index, name } => self.set_row_name(key, *index, name),
            DraftEdit::SetRowValue { key, index, value } => self.set_row_value(key, *index, value),
            DraftEdit::RemoveRow { key, index } => self.remove_row(key, *index),
            DraftEdit::AppendRow { key } => self.append_row(key),
            DraftEdit::SetIncluded { key, included } => self.set_included(key, *included),
            DraftEdit::ToggleIncluded { key } => self.toggle_included(key),
            DraftEdit::SelectAll => Ok(self.select_all()),
            DraftEdit::SelectNone => Ok(self.select_none()),
            DraftEdit::ToggleImage { url } => Ok(self.toggle_image(url)),
            DraftEdit::MoveImage { url, direction } => Ok(self.move_image(url, *direction)),
            DraftEdit::EditPayloadText { text } => Ok(self.edit_payload_text(text.clone())),
        }
    }

    /// Aplica as ações em ordem. A primeira que falhar interrompe tudo e o
    /// rascunho original fica como estava.
    pub fn apply_all<'a>(&self, edits: impl IntoIterator<Item = &'a DraftEdit>) -> Result<Self, BuilderError> {
        edits
            .into_iter()
            .try_fold(self.clone(), |draft, edit| draft.apply(edit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::BuilderConfig;
    use serde_json::json;

    fn draft() -> DraftPayload {
        let doc = json!({
            "title": "Casa",
            "area": 82,
            "carousel_images": ["a", "b", "c"],
            "amenities-list": [{ "name": "POOL", "value": "Sim" }]
        });
        DraftPayload::from_document(doc.as_object().unwrap(), None, &BuilderConfig::default())
    }

    #[test]
    fn edits_are_parsed_from_tagged_json() {
        let edits: Vec<DraftEdit> = serde_json::from_value(json!([
            { "op": "set_text", "key": "area", "text": "90" },
            { "op": "move_image", "url": "c", "direction": "up" },
            { "op": "select_none" }
        ]))
        .unwrap();
        assert_eq!(edits[2], DraftEdit::SelectNone);
        assert_eq!(
            edits[1],
            DraftEdit::MoveImage {
                url: "c".into(),
                direction: MoveDirection::Up
            }
        );
    }

    #[test]
    fn edits_apply_in_order() {
        let edits = vec![
            DraftEdit::SetText {
                key: "area".into(),
                text: "90".into(),
            },
            DraftEdit::ToggleImage { url: "a".into() },
            DraftEdit::AppendRow {
                key: "amenities-list".into(),
            },
            DraftEdit::SetIncluded {
                key: "title".into(),
                included: false,
            },
        ];
        let payload = draft().apply_all(&edits).unwrap().payload();
        assert_eq!(payload.get("area"), Some(&json!(90)));
        assert_eq!(payload.get("images"), Some(&json!(["b", "c"])));
        assert_eq!(
            payload.get("amenities-list"),
            Some(&json!([{ "name": "POOL", "value": "Sim" }, { "name": "", "value": "" }]))
        );
        assert!(payload.get("title").is_none());
    }

    #[test]
    fn a_failing_edit_stops_the_batch() {
        let edits = vec![
            DraftEdit::SelectNone,
            DraftEdit::RemoveRow {
                key: "amenities-list".into(),
                index: 5,
            },
        ];
        let err = draft().apply_all(&edits).unwrap_err();
        assert!(matches!(err, BuilderError::IndexOutOfRange { index: 5, .. }));
    }
}
